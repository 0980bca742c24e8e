//! tmichat - Twitch chat session client.
//!
//! A [`Session`] drives one [`Transport`](transport::Transport): it performs
//! the PASS/NICK/CAP handshake, answers keepalives, keeps channel membership
//! through a throttled join scheduler, and publishes every line as a typed
//! [`SessionEvent`]. Wire parsing and tag decoding live in [`tmi_proto`].

pub mod config;
pub mod error;
pub mod session;
pub mod telemetry;
pub mod transport;

pub use error::SessionError;
pub use session::{Session, SessionEvent};
pub use tmi_proto;
