//! Integration test common infrastructure.
//!
//! Provides an in-memory transport that records what the session writes and
//! lets a test inject inbound frames or a dropped connection, plus helpers
//! for waiting on session events.

pub mod transport;

use std::sync::Arc;
use std::time::Duration;

use tmichat::config::SessionConfig;
use tmichat::{Session, SessionEvent};
use tokio::sync::broadcast;
use tokio::time::{Instant, timeout};

#[allow(unused_imports)]
pub use transport::{MOCK_URL, MockTransport};

/// A session over a fresh mock transport.
#[allow(dead_code)]
pub fn session(config: SessionConfig) -> (Arc<MockTransport>, Session) {
    let transport = MockTransport::new();
    let session = Session::new(transport.clone(), config);
    (transport, session)
}

/// Upper bound for anything a test waits on.
pub const WAIT: Duration = Duration::from_secs(3);

/// Receive events until one matches `predicate`.
#[allow(dead_code)]
pub async fn next_event<F>(
    events: &mut broadcast::Receiver<SessionEvent>,
    mut predicate: F,
) -> anyhow::Result<SessionEvent>
where
    F: FnMut(&SessionEvent) -> bool,
{
    let deadline = Instant::now() + WAIT;
    loop {
        let remaining = deadline.saturating_duration_since(Instant::now());
        let event = timeout(remaining, events.recv()).await??;
        if predicate(&event) {
            return Ok(event);
        }
    }
}

/// Everything received within `window`.
#[allow(dead_code)]
pub async fn drain_events(
    events: &mut broadcast::Receiver<SessionEvent>,
    window: Duration,
) -> Vec<SessionEvent> {
    let mut collected = Vec::new();
    while let Ok(Ok(event)) = timeout(window, events.recv()).await {
        collected.push(event);
    }
    collected
}

/// Poll `condition` until it holds or [`WAIT`] elapses.
#[allow(dead_code)]
pub async fn eventually<F>(mut condition: F) -> bool
where
    F: FnMut() -> bool,
{
    let deadline = Instant::now() + WAIT;
    while Instant::now() < deadline {
        if condition() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    condition()
}
