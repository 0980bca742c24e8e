//! Typed view over Twitch messages.
//!
//! [`TypedMessage`] wraps a [`RawMessage`] and decodes tags on demand. Nothing
//! is decoded up front and no accessor can fail: a missing or malformed tag
//! reads as `None`. Use [`TypedMessage::decode`] with a constant from
//! [`fields`] to tell the two apart.
//!
//! ```
//! use tmi_proto::twitch::{fields, TypedMessage};
//!
//! let msg: TypedMessage = "@room-id=;tmi-sent-ts=1642720582342 :tmi.twitch.tv CLEARMSG #dallas :HeyGuys"
//!     .parse()
//!     .unwrap();
//!
//! assert_eq!(msg.room_id(), None);
//! assert!(msg.decode(&fields::ROOM_ID).is_err());
//! assert_eq!(msg.tmi_sent_ts().map(|t| t.timestamp_millis()), Some(1642720582342));
//! ```

mod enums;
mod field;
pub mod fields;
mod types;

use std::str::FromStr;

use tracing::debug;

pub use self::enums::{MessageId, SubPlan, TwitchCommand, UnknownVariant, UserType};
pub use self::field::{rules, Field, Rule};
pub use self::types::{Badge, BadgeInfo, Color, Emote, EmoteRange};
use crate::error::{DecodeError, ProtocolError};
use crate::message::{RawMessage, Tags};
use crate::response::Response;

/// A tokenized message with typed, lazily decoded tag accessors.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct TypedMessage {
    raw: RawMessage,
}

impl TypedMessage {
    /// Wrap a tokenized message.
    pub fn new(raw: RawMessage) -> Self {
        Self { raw }
    }

    /// The underlying tokenized message.
    pub fn raw(&self) -> &RawMessage {
        &self.raw
    }

    /// Unwrap into the tokenized message.
    pub fn into_raw(self) -> RawMessage {
        self.raw
    }

    pub fn command(&self) -> &str {
        &self.raw.command
    }

    pub fn params(&self) -> &[String] {
        &self.raw.params
    }

    pub fn prefix(&self) -> Option<&str> {
        self.raw.prefix.as_deref()
    }

    pub fn tags(&self) -> &Tags {
        &self.raw.tags
    }

    /// Raw (unescaped) value of any tag, known or not.
    pub fn tag(&self, key: &str) -> Option<&str> {
        self.raw.tags.get(key)
    }

    /// Decode one field.
    ///
    /// `Ok(None)` when the tag is missing, `Err` when it is present but does
    /// not satisfy the field's rule. Every named accessor goes through here.
    pub fn decode<T>(&self, field: &Field<T>) -> Result<Option<T>, DecodeError> {
        field.decode(&self.raw.tags)
    }

    /// Decode one field, folding malformed values into `None`.
    pub fn field<T>(&self, field: &Field<T>) -> Option<T> {
        match self.decode(field) {
            Ok(value) => value,
            Err(error) => {
                debug!(
                    command = %self.raw.command,
                    key = error.key,
                    value = %error.value,
                    expected = error.expected,
                    "Ignoring malformed tag"
                );
                None
            }
        }
    }

    /// The command as a Twitch-specific command, if it is one.
    pub fn twitch_command(&self) -> Option<TwitchCommand> {
        self.raw.command.parse().ok()
    }

    /// The command as a numeric reply, if it is one.
    pub fn response(&self) -> Option<Response> {
        self.raw.command.parse().ok()
    }

    pub fn is_ping(&self) -> bool {
        self.raw.command.eq_ignore_ascii_case("PING")
    }

    /// `001`: the server accepted the handshake.
    pub fn is_welcome(&self) -> bool {
        self.response() == Some(Response::RPL_WELCOME)
    }

    /// Target channel (`#name`) when the first parameter is one.
    pub fn channel(&self) -> Option<&str> {
        self.raw.param(0).filter(|p| p.starts_with('#'))
    }

    /// Message body for commands that carry one.
    pub fn text(&self) -> Option<&str> {
        let command = self.raw.command.to_ascii_uppercase();
        match command.as_str() {
            "PRIVMSG" | "WHISPER" | "NOTICE" | "USERNOTICE" | "CLEARMSG" => self.raw.param(1),
            _ => None,
        }
    }

    /// Login of the sender, taken from the prefix.
    pub fn sender(&self) -> Option<&str> {
        self.raw.source_nickname()
    }
}

impl From<RawMessage> for TypedMessage {
    fn from(raw: RawMessage) -> Self {
        Self::new(raw)
    }
}

impl From<TypedMessage> for RawMessage {
    fn from(msg: TypedMessage) -> Self {
        msg.raw
    }
}

impl AsRef<RawMessage> for TypedMessage {
    fn as_ref(&self) -> &RawMessage {
        &self.raw
    }
}

impl FromStr for TypedMessage {
    type Err = ProtocolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse().map(Self::new)
    }
}

impl std::fmt::Display for TypedMessage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Display::fmt(&self.raw, f)
    }
}
