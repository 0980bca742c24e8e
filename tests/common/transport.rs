//! In-memory transport.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use parking_lot::Mutex;
use tmichat::transport::{
    CloseMode, ConnectionState, Observers, Subscription, SubscriptionId, Transport,
    TransportError, TransportEvent,
};
use tokio_util::sync::CancellationToken;

pub const MOCK_URL: &str = "wss://mock.invalid:443";

/// A transport with no network behind it.
///
/// Frames passed to `send` are recorded without their CRLF terminator.
pub struct MockTransport {
    state: Mutex<ConnectionState>,
    observers: Observers,
    sent: Mutex<Vec<String>>,
    fail_sends: AtomicBool,
    fail_open: AtomicBool,
}

#[allow(dead_code)]
impl MockTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            state: Mutex::new(ConnectionState::Disconnected),
            observers: Observers::new(),
            sent: Mutex::new(Vec::new()),
            fail_sends: AtomicBool::new(false),
            fail_open: AtomicBool::new(false),
        })
    }

    /// Lines written so far, in order.
    pub fn sent(&self) -> Vec<String> {
        self.sent.lock().clone()
    }

    /// Written lines whose command is `command`.
    pub fn sent_commands(&self, command: &str) -> Vec<String> {
        self.sent
            .lock()
            .iter()
            .filter(|line| line.split(' ').next() == Some(command))
            .cloned()
            .collect()
    }

    pub fn clear_sent(&self) {
        self.sent.lock().clear();
    }

    /// Make every following `send` fail with `NotConnected`.
    pub fn fail_sends(&self, fail: bool) {
        self.fail_sends.store(fail, Ordering::SeqCst);
    }

    /// Make every following `open` fail without changing state.
    pub fn fail_open(&self, fail: bool) {
        self.fail_open.store(fail, Ordering::SeqCst);
    }

    /// Deliver one inbound frame.
    pub fn receive(&self, frame: &str) {
        self.observers
            .emit(TransportEvent::MessageReceived(frame.to_string()));
    }

    /// Simulate the server closing the connection.
    pub fn drop_connection(&self) {
        self.transition(ConnectionState::Disconnected);
        self.observers.emit(TransportEvent::Disconnected {
            url: MOCK_URL.to_string(),
        });
    }

    pub fn subscriber_count(&self) -> usize {
        self.observers.len()
    }

    fn transition(&self, next: ConnectionState) {
        let previous = std::mem::replace(&mut *self.state.lock(), next);
        self.observers.emit(TransportEvent::StateChanged {
            current: next,
            previous,
        });
    }
}

#[async_trait]
impl Transport for MockTransport {
    fn url(&self) -> &str {
        MOCK_URL
    }

    fn state(&self) -> ConnectionState {
        *self.state.lock()
    }

    fn subscribe(&self) -> Subscription {
        self.observers.subscribe()
    }

    fn unsubscribe(&self, id: SubscriptionId) {
        self.observers.unsubscribe(id);
    }

    async fn open(&self, cancel: &CancellationToken) -> Result<(), TransportError> {
        if cancel.is_cancelled() {
            return Err(TransportError::Cancelled);
        }
        if self.is_connected() {
            return Err(TransportError::AlreadyOpen);
        }
        if self.fail_open.load(Ordering::SeqCst) {
            return Err(TransportError::InvalidUrl(MOCK_URL.to_string()));
        }
        self.transition(ConnectionState::Connecting);
        self.transition(ConnectionState::Connected);
        self.observers.emit(TransportEvent::Connected {
            url: MOCK_URL.to_string(),
        });
        Ok(())
    }

    async fn close(&self, mode: CloseMode, cancel: &CancellationToken) -> Result<(), TransportError> {
        if cancel.is_cancelled() {
            return Err(TransportError::Cancelled);
        }
        if !self.is_connected() {
            return Err(TransportError::NotConnected);
        }
        if mode == CloseMode::Graceful {
            self.sent.lock().push("QUIT".to_string());
        }
        self.drop_connection();
        Ok(())
    }

    async fn send(&self, frame: &str, cancel: &CancellationToken) -> Result<(), TransportError> {
        if cancel.is_cancelled() {
            return Err(TransportError::Cancelled);
        }
        if !self.is_connected() || self.fail_sends.load(Ordering::SeqCst) {
            return Err(TransportError::NotConnected);
        }
        self.sent
            .lock()
            .push(frame.trim_end_matches("\r\n").to_string());
        self.observers
            .emit(TransportEvent::MessageSent(frame.as_bytes().to_vec()));
        Ok(())
    }
}
