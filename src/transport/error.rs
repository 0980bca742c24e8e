//! Transport error types.

use thiserror::Error;
use tokio_tungstenite::tungstenite;

/// Errors surfaced by a [`Transport`](super::Transport).
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum TransportError {
    #[error("transport is not connected")]
    NotConnected,

    #[error("transport is already open")]
    AlreadyOpen,

    #[error("transport operation cancelled")]
    Cancelled,

    /// Boxed: `tungstenite::Error` is large and rarely constructed.
    #[error("websocket error: {0}")]
    WebSocket(#[source] Box<tungstenite::Error>),

    #[error("invalid endpoint url: {0}")]
    InvalidUrl(String),
}

impl From<tungstenite::Error> for TransportError {
    fn from(err: tungstenite::Error) -> Self {
        Self::WebSocket(Box::new(err))
    }
}

impl TransportError {
    /// Get a static error code string for logging.
    #[inline]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::NotConnected => "not_connected",
            Self::AlreadyOpen => "already_open",
            Self::Cancelled => "cancelled",
            Self::WebSocket(_) => "websocket_error",
            Self::InvalidUrl(_) => "invalid_url",
        }
    }
}
