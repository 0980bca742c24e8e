//! # tmi-proto
//!
//! Wire protocol for Twitch chat (TMI): an IRCv3 line tokenizer and a typed,
//! fault-tolerant view over the tags Twitch attaches to each message.
//!
//! ## Features
//!
//! - Line parsing into [`RawMessage`] (tags, prefix, command, parameters)
//! - Serialization with IRCv3 tag escaping and trailing-parameter rules
//! - Constructors for every frame a client sends (`PASS`, `NICK`, `CAP REQ`,
//!   `JOIN`, `PART`, `PONG`, `PRIVMSG`, `QUIT`)
//! - [`TypedMessage`]: lazily decoded accessors for Twitch tags, where a
//!   missing or malformed tag never fails the message
//!
//! ## Quick Start
//!
//! ```rust
//! use tmi_proto::{RawMessage, TypedMessage};
//!
//! let msg: TypedMessage = "@badges=subscriber/6;user-type=mod :ronni!ronni@ronni.tmi.twitch.tv PRIVMSG #dallas :Kappa"
//!     .parse()
//!     .expect("valid line");
//!
//! assert_eq!(msg.channel(), Some("#dallas"));
//! assert_eq!(msg.badges().map(|b| b.len()), Some(1));
//!
//! assert_eq!(RawMessage::join("#dallas").to_string(), "JOIN #dallas");
//! ```

#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod error;
pub mod message;
pub mod response;
pub mod twitch;

pub use self::error::{DecodeError, MessageParseError, ProtocolError};
pub use self::message::{build_message, parse_message, RawMessage, Tags};
pub use self::response::Response;
pub use self::twitch::{
    fields, Badge, BadgeInfo, Color, Emote, EmoteRange, Field, MessageId, SubPlan,
    TwitchCommand, TypedMessage, UserType,
};
