//! Unified error handling for tmichat.
//!
//! Each layer has its own error enum with a static `error_code()` label for
//! structured logs: [`SessionError`] here, plus
//! [`TransportError`](crate::transport::TransportError),
//! [`ConfigError`](crate::config::ConfigError) and
//! [`ValidationError`](crate::config::validation::ValidationError).

use thiserror::Error;

use crate::config::validation::ValidationError;
use crate::transport::TransportError;

// ============================================================================
// Session Errors (public API calls)
// ============================================================================

/// Errors returned by [`Session`](crate::Session) operations.
///
/// State and config errors are detected before any I/O; nothing is sent and
/// no state changes when they are returned.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("session is already connected")]
    AlreadyConnected,

    #[error("session is already disconnected")]
    AlreadyDisconnected,

    #[error("invalid session config: {}", join_errors(.0))]
    InvalidConfig(Vec<ValidationError>),

    #[error("transport error: {0}")]
    Transport(#[from] TransportError),
}

impl SessionError {
    /// Get a static error code string for logging.
    #[inline]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::AlreadyConnected => "already_connected",
            Self::AlreadyDisconnected => "already_disconnected",
            Self::InvalidConfig(_) => "invalid_config",
            Self::Transport(e) => e.error_code(),
        }
    }
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
