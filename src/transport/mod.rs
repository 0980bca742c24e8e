//! Connection seam between the session and the network.
//!
//! A [`Transport`] owns one persistent connection carrying text frames. It
//! reports what happens to that connection as [`TransportEvent`]s delivered to
//! every [`Subscription`]; the session never drives connection state itself.

mod error;
mod observers;
mod websocket;

use std::fmt;

use async_trait::async_trait;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

pub use error::TransportError;
pub use observers::Observers;
pub use websocket::WebSocketTransport;

/// Connection state, owned by the transport.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ConnectionState {
    #[default]
    Disconnected,
    Connecting,
    Connected,
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Disconnected => "disconnected",
            Self::Connecting => "connecting",
            Self::Connected => "connected",
        })
    }
}

/// How [`Transport::close`] ends the connection.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CloseMode {
    /// Send `QUIT`, then the close handshake.
    Graceful,
    /// Drop the connection.
    Immediate,
}

/// Something that happened on the connection.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TransportEvent {
    Connected { url: String },
    StateChanged {
        current: ConnectionState,
        previous: ConnectionState,
    },
    Disconnected { url: String },
    /// One inbound frame; may hold several CRLF separated lines.
    MessageReceived(String),
    /// One outbound frame, as written.
    MessageSent(Vec<u8>),
}

/// Identifies one registration with a transport's observers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionId(pub u64);

/// Events for one subscriber, in the order the transport emitted them.
#[derive(Debug)]
pub struct Subscription {
    pub id: SubscriptionId,
    pub events: mpsc::UnboundedReceiver<TransportEvent>,
}

/// A persistent, text-framed connection.
///
/// Every async operation takes a cancellation token; how promptly it is
/// honored is up to the implementation.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Endpoint this transport connects to.
    fn url(&self) -> &str;

    fn state(&self) -> ConnectionState;

    fn is_connected(&self) -> bool {
        self.state() == ConnectionState::Connected
    }

    /// Register for events.
    fn subscribe(&self) -> Subscription;

    /// Remove a registration made with [`subscribe`](Self::subscribe).
    fn unsubscribe(&self, id: SubscriptionId);

    /// Open the connection. Emits `StateChanged` and then `Connected` on
    /// success.
    async fn open(&self, cancel: &CancellationToken) -> Result<(), TransportError>;

    /// Close the connection. Emits `StateChanged` and `Disconnected`.
    async fn close(&self, mode: CloseMode, cancel: &CancellationToken)
    -> Result<(), TransportError>;

    /// Write one frame. Emits `MessageSent` once written.
    async fn send(&self, frame: &str, cancel: &CancellationToken) -> Result<(), TransportError>;
}
