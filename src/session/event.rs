//! Events published by a [`Session`](super::Session).

use tmi_proto::TypedMessage;

use crate::transport::ConnectionState;

/// Something observers of a session may react to.
///
/// Delivered over a `tokio::sync::broadcast` channel; a receiver that falls
/// behind sees `RecvError::Lagged` and skips ahead.
#[derive(Clone, Debug)]
pub enum SessionEvent {
    /// Handshake frames were written. The server has not answered yet.
    Connected { url: String },
    /// The connection ended without a call to `disconnect`.
    Disconnected { url: String },
    /// Transport state transition, forwarded as reported.
    StateChanged {
        current: ConnectionState,
        previous: ConnectionState,
    },
    /// One inbound line.
    MessageReceived(TypedMessage),
    /// One outbound line, as the transport wrote it.
    MessageSent(TypedMessage),
    /// The server sent its welcome reply. Raised again after every reconnect.
    Authorized(TypedMessage),
    /// A send issued by a background task failed. Nothing awaits those sends,
    /// so this is where their errors surface.
    BackgroundFailure {
        operation: &'static str,
        reason: String,
    },
}
