//! Event pump: consumes one transport subscription in order.
//!
//! Runs the handshake on `Connected`, answers `PING`, tracks the welcome
//! reply, and republishes everything as [`SessionEvent`]s. A failed
//! handshake closes the connection and ends the pump.

use std::sync::Arc;
use std::sync::atomic::Ordering;

use tmi_proto::{RawMessage, TypedMessage};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{Instrument, debug, info, warn};

use super::task::TaskHandle;
use super::{Inner, SessionEvent};
use crate::telemetry::spans;
use crate::transport::{CloseMode, Subscription, SubscriptionId, TransportError, TransportEvent};

/// The pump task and the registration it consumes. Torn down together.
pub(super) struct Pump {
    pub subscription: SubscriptionId,
    pub task: TaskHandle,
}

pub(super) fn spawn(inner: Arc<Inner>, subscription: Subscription) -> Pump {
    let Subscription { id, events } = subscription;
    let span = spans::pump(&inner.id, id.0);
    let task = TaskHandle::spawn("event_pump", move |cancel| {
        run(inner, id, events, cancel).instrument(span)
    });
    Pump {
        subscription: id,
        task,
    }
}

async fn run(
    inner: Arc<Inner>,
    subscription: SubscriptionId,
    mut events: mpsc::UnboundedReceiver<TransportEvent>,
    cancel: CancellationToken,
) {
    loop {
        let event = tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            event = events.recv() => match event {
                Some(event) => event,
                None => break,
            },
        };
        if !dispatch(&inner, subscription, event, &cancel).await {
            break;
        }
    }
    debug!("Event pump stopped");
}

/// Handle one transport event. Returns `false` once the pump has torn its
/// connection down.
async fn dispatch(
    inner: &Arc<Inner>,
    subscription: SubscriptionId,
    event: TransportEvent,
    cancel: &CancellationToken,
) -> bool {
    match event {
        TransportEvent::Connected { url } => match handshake(inner, cancel).await {
            Ok(()) => inner.emit(SessionEvent::Connected { url }),
            Err(TransportError::Cancelled) => debug!("Handshake cancelled"),
            Err(e) => {
                inner.report_failure("handshake", &e);
                abandon(inner, subscription, url).await;
                return false;
            }
        },
        TransportEvent::StateChanged { current, previous } => {
            inner.emit(SessionEvent::StateChanged { current, previous });
        }
        TransportEvent::Disconnected { url } => {
            inner.stop_scheduler().await;
            inner.authorized.store(false, Ordering::SeqCst);
            info!(url = %url, "Connection lost");
            inner.emit(SessionEvent::Disconnected { url });
        }
        TransportEvent::MessageReceived(frame) => {
            for msg in decode_lines(&frame) {
                inner.emit(SessionEvent::MessageReceived(msg.clone()));
                if msg.is_ping() {
                    let pong = RawMessage::pong(msg.params());
                    if let Err(e) = inner.send(&pong, cancel).await {
                        inner.report_failure("pong", &e);
                    }
                } else if msg.is_welcome() {
                    inner.authorized.store(true, Ordering::SeqCst);
                    info!("Authorized");
                    inner.emit(SessionEvent::Authorized(msg));
                }
            }
        }
        TransportEvent::MessageSent(bytes) => {
            let frame = String::from_utf8_lossy(&bytes);
            for msg in decode_lines(&frame) {
                inner.emit(SessionEvent::MessageSent(msg));
            }
        }
    }
    true
}

/// Drop a connection whose handshake failed: release this pump's
/// registration, close the transport and report the loss so callers can
/// reconnect.
async fn abandon(inner: &Inner, subscription: SubscriptionId, url: String) {
    // our own handle; this task ends when dispatch returns
    let own = {
        let mut slot = inner.pump.lock();
        if slot.as_ref().is_some_and(|p| p.subscription == subscription) {
            slot.take()
        } else {
            None
        }
    };
    drop(own);
    inner.transport.unsubscribe(subscription);
    inner.stop_scheduler().await;
    inner.authorized.store(false, Ordering::SeqCst);

    warn!(url = %url, "Handshake failed, closing connection");
    if let Err(e) = inner
        .transport
        .close(CloseMode::Immediate, &CancellationToken::new())
        .await
    {
        debug!(error = %e, code = e.error_code(), "Close after failed handshake");
    }
    inner.emit(SessionEvent::Disconnected { url });
}

/// Credential, nickname, capabilities, then restart the join scheduler.
async fn handshake(inner: &Arc<Inner>, cancel: &CancellationToken) -> Result<(), TransportError> {
    let config = inner.config();

    if let Some(credential) = config.credential() {
        inner.send(&RawMessage::pass(credential), cancel).await?;
    }
    inner.send(&RawMessage::nick(config.login()), cancel).await?;
    for capability in config.requested_capabilities() {
        inner.send(&RawMessage::cap_req(capability), cancel).await?;
    }

    let rejoin = inner.membership.requeue_joined();
    if rejoin > 0 {
        info!(channels = rejoin, "Re-joining channels");
    }
    inner.start_scheduler().await;
    debug!(nickname = %config.login(), "Handshake sent");
    Ok(())
}

/// Split a frame into lines and tokenize each; blank and unparseable lines
/// are skipped.
fn decode_lines(frame: &str) -> impl Iterator<Item = TypedMessage> + '_ {
    frame
        .lines()
        .filter(|line| !line.trim().is_empty())
        .filter_map(|line| match line.parse::<TypedMessage>() {
            Ok(msg) => Some(msg),
            Err(e) => {
                warn!(error = %e, code = e.error_code(), "Skipping unparseable line");
                None
            }
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_lines_splits_and_skips() {
        let frame = "PING :a\r\n\r\n:tmi.twitch.tv 001 bot :Welcome\n  \r\n:bad\r\nPING :b";
        let commands: Vec<String> = decode_lines(frame)
            .map(|m| m.command().to_string())
            .collect();
        assert_eq!(commands, vec!["PING", "001", "PING"]);
    }
}
