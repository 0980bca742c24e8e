//! Error types for the TMI protocol library.
//!
//! Line-level failures (a frame that cannot be tokenized) are reported as
//! [`ProtocolError`]; field-level failures (a tag that is present but does not
//! match its decode rule) are reported as [`DecodeError`].

use thiserror::Error;

/// Convenience type alias for Results using [`ProtocolError`].
pub type Result<T, E = ProtocolError> = std::result::Result<T, E>;

/// Top-level protocol errors.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ProtocolError {
    /// Failed to tokenize a line.
    #[error("invalid message: {string}")]
    InvalidMessage {
        /// The offending line.
        string: String,
        /// The underlying parse error.
        #[source]
        cause: MessageParseError,
    },
}

/// Errors encountered when tokenizing a single line.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum MessageParseError {
    /// Line was empty or contained only whitespace.
    #[error("empty message")]
    EmptyMessage,

    /// Command was missing or was neither letters nor a three-digit numeric.
    #[error("invalid command")]
    InvalidCommand,

    /// Parse failed at a known position.
    #[error("parse error at position {position}: {context}")]
    ParseContext {
        /// Byte offset into the line.
        position: usize,
        /// Human readable description.
        context: String,
    },
}

/// A tag was present but its value does not satisfy the field's decode rule.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("malformed value {value:?} for tag `{key}`: expected {expected}")]
pub struct DecodeError {
    /// Tag key the value was read from.
    pub key: &'static str,
    /// The raw (unescaped) tag value.
    pub value: String,
    /// What the decode rule expected, e.g. `"integer"`.
    pub expected: &'static str,
}

impl DecodeError {
    /// Get a static error code string for logging.
    #[inline]
    pub fn error_code(&self) -> &'static str {
        "malformed_tag"
    }
}

impl ProtocolError {
    /// Get a static error code string for logging.
    #[inline]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidMessage { cause, .. } => match cause {
                MessageParseError::EmptyMessage => "empty_message",
                MessageParseError::InvalidCommand => "invalid_command",
                MessageParseError::ParseContext { .. } => "parse_error",
            },
        }
    }
}
