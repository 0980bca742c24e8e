//! Session controller.
//!
//! A [`Session`] owns one transport. `connect` registers an event pump on the
//! transport and opens it; the pump runs the handshake once the transport
//! reports `Connected`, then starts the join scheduler. `disconnect` removes
//! the registration first so frames from the closing connection are not
//! dispatched, stops both background tasks, and closes gracefully.
//!
//! Channel membership outlives connections: every channel in the joined set
//! is queued again during the next handshake. Call
//! [`Session::clear_membership`] to start from nothing.

mod event;
mod membership;
mod pump;
mod scheduler;
mod task;

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::{Mutex, RwLock};
use tmi_proto::{RawMessage, build_message};
use tokio::sync::broadcast;
use tokio_util::sync::CancellationToken;
use tracing::{Instrument, debug, info, trace, warn};
use uuid::Uuid;

pub use event::SessionEvent;
pub use membership::{canonical_channel, normalize_channel};
pub use scheduler::JOIN_POLL_INTERVAL;

use self::membership::Membership;
use self::pump::Pump;
use self::task::TaskHandle;
use crate::config::SessionConfig;
use crate::config::validation::validate_session;
use crate::error::SessionError;
use crate::telemetry::{redacted, spans};
use crate::transport::{CloseMode, Transport, TransportError};

/// Broadcast buffer per subscriber.
const EVENT_CAPACITY: usize = 1024;

/// State shared by the public handle and the background tasks.
pub(crate) struct Inner {
    id: Uuid,
    transport: Arc<dyn Transport>,
    config: RwLock<Arc<SessionConfig>>,
    membership: Membership,
    authorized: AtomicBool,
    events: broadcast::Sender<SessionEvent>,
    pump: Mutex<Option<Pump>>,
    scheduler: Mutex<Option<TaskHandle>>,
    /// Serializes `connect` and `disconnect`.
    lifecycle: tokio::sync::Mutex<()>,
}

impl Inner {
    fn config(&self) -> Arc<SessionConfig> {
        Arc::clone(&self.config.read())
    }

    fn emit(&self, event: SessionEvent) {
        // no receivers is fine
        let _ = self.events.send(event);
    }

    async fn send(&self, msg: &RawMessage, cancel: &CancellationToken) -> Result<(), TransportError> {
        trace!(line = %redacted(msg), "Sending");
        self.transport.send(&build_message(msg, false), cancel).await
    }

    /// Log a background send failure and publish it. Cancellation is not a
    /// failure.
    fn report_failure(&self, operation: &'static str, error: &TransportError) {
        if matches!(error, TransportError::Cancelled) {
            debug!(operation, "Background send cancelled");
            return;
        }
        warn!(operation, error = %error, code = error.error_code(), "Background send failed");
        self.emit(SessionEvent::BackgroundFailure {
            operation,
            reason: error.to_string(),
        });
    }

    async fn start_scheduler(self: &Arc<Self>) {
        self.stop_scheduler().await;
        let task = scheduler::spawn(Arc::clone(self));
        *self.scheduler.lock() = Some(task);
    }

    async fn stop_scheduler(&self) {
        let task = self.scheduler.lock().take();
        if let Some(task) = task {
            task.shutdown().await;
        }
    }

    /// Unsubscribe, then stop the pump.
    async fn stop_pump(&self) {
        let pump = self.pump.lock().take();
        if let Some(Pump { subscription, task }) = pump {
            self.transport.unsubscribe(subscription);
            task.shutdown().await;
        }
    }
}

/// A chat session over one transport.
///
/// Cheap to clone; clones share the same session.
#[derive(Clone)]
pub struct Session {
    inner: Arc<Inner>,
}

impl Session {
    pub fn new(transport: Arc<dyn Transport>, config: SessionConfig) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            inner: Arc::new(Inner {
                id: Uuid::new_v4(),
                transport,
                config: RwLock::new(Arc::new(config)),
                membership: Membership::default(),
                authorized: AtomicBool::new(false),
                events,
                pump: Mutex::new(None),
                scheduler: Mutex::new(None),
                lifecycle: tokio::sync::Mutex::new(()),
            }),
        }
    }

    /// Identifier used in log spans.
    pub fn id(&self) -> Uuid {
        self.inner.id
    }

    /// Receive events published from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.inner.events.subscribe()
    }

    /// Settings the next handshake will use.
    pub fn config(&self) -> Arc<SessionConfig> {
        self.inner.config()
    }

    /// Replace the settings. Takes effect on the next connect.
    pub fn reload_config(&self, config: SessionConfig) {
        info!(session = %self.inner.id, nickname = %config.login(), "Session config reloaded");
        *self.inner.config.write() = Arc::new(config);
    }

    pub fn is_connected(&self) -> bool {
        self.inner.transport.is_connected()
    }

    /// Whether the welcome reply arrived on the current connection.
    pub fn is_authorized(&self) -> bool {
        self.inner.authorized.load(Ordering::SeqCst)
    }

    /// Channels a JOIN was sent for, lower-cased and sorted.
    pub fn joined_channels(&self) -> Vec<String> {
        self.inner.membership.joined()
    }

    /// Channels waiting for the scheduler, in send order.
    pub fn pending_channels(&self) -> Vec<String> {
        self.inner.membership.pending()
    }

    /// Forget every joined and queued channel.
    pub fn clear_membership(&self) {
        self.inner.membership.clear();
    }

    /// Register the event pump and open the transport.
    ///
    /// Returns once the transport is open; the handshake runs when the
    /// transport reports `Connected`. Fails before any I/O with
    /// `AlreadyConnected` or `InvalidConfig`.
    pub async fn connect(&self, cancel: &CancellationToken) -> Result<(), SessionError> {
        let span = spans::session(&self.inner.id, self.inner.transport.url());
        self.connect_inner(cancel).instrument(span).await
    }

    async fn connect_inner(&self, cancel: &CancellationToken) -> Result<(), SessionError> {
        let _lifecycle = self.inner.lifecycle.lock().await;

        if self.inner.transport.is_connected() {
            return Err(SessionError::AlreadyConnected);
        }
        validate_session(&self.inner.config()).map_err(SessionError::InvalidConfig)?;

        // a pump left over from a dropped connection
        self.inner.stop_pump().await;

        let subscription = self.inner.transport.subscribe();
        let pump = pump::spawn(Arc::clone(&self.inner), subscription);
        *self.inner.pump.lock() = Some(pump);

        info!("Connecting");
        if let Err(e) = self.inner.transport.open(cancel).await {
            warn!(error = %e, code = e.error_code(), "Connect failed");
            self.inner.stop_pump().await;
            return Err(e.into());
        }
        Ok(())
    }

    /// Stop background work and close the transport gracefully.
    ///
    /// Fails with `AlreadyDisconnected` when the transport is not connected.
    pub async fn disconnect(&self, cancel: &CancellationToken) -> Result<(), SessionError> {
        let span = spans::session(&self.inner.id, self.inner.transport.url());
        self.disconnect_inner(cancel).instrument(span).await
    }

    async fn disconnect_inner(&self, cancel: &CancellationToken) -> Result<(), SessionError> {
        let _lifecycle = self.inner.lifecycle.lock().await;

        if !self.inner.transport.is_connected() {
            return Err(SessionError::AlreadyDisconnected);
        }

        self.inner.stop_pump().await;
        self.inner.stop_scheduler().await;
        self.inner.authorized.store(false, Ordering::SeqCst);

        info!("Disconnecting");
        self.inner
            .transport
            .close(CloseMode::Graceful, cancel)
            .await?;
        Ok(())
    }

    /// Send `text` to the transport as is.
    pub async fn send_message(&self, text: &str, cancel: &CancellationToken) -> Result<(), SessionError> {
        self.inner.transport.send(text, cancel).await?;
        Ok(())
    }

    /// `PRIVMSG <channel> :<text>`, with `#` added to the channel if missing.
    pub async fn say(
        &self,
        channel: &str,
        text: &str,
        cancel: &CancellationToken,
    ) -> Result<(), SessionError> {
        let msg = RawMessage::privmsg(normalize_channel(channel), text);
        self.inner.send(&msg, cancel).await?;
        Ok(())
    }

    /// Queue a JOIN for each channel. Never blocks and never sends directly;
    /// the scheduler writes one JOIN per iteration.
    pub fn join_channel<I, S>(&self, names: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for name in names {
            self.inner.membership.enqueue(name.as_ref());
        }
    }

    /// For each channel in order: drop it from the joined set, then send
    /// `PART` and wait for the write before moving on.
    pub async fn part_channel<I, S>(&self, names: I, cancel: &CancellationToken) -> Result<(), SessionError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for name in names {
            let channel = normalize_channel(name.as_ref());
            self.inner.membership.remove_joined(&channel);
            self.inner.send(&RawMessage::part(&channel), cancel).await?;
            info!(channel = %channel, "Parted channel");
        }
        Ok(())
    }
}
