//! Default value functions and endpoint constants.
//!
//! Separated into its own module for clarity and reuse.

// =============================================================================
// Endpoints
// =============================================================================

/// WebSocket over TLS.
pub const SECURE_WEBSOCKET_ENDPOINT: &str = "wss://irc-ws.chat.twitch.tv:443";

/// Plaintext WebSocket.
pub const WEBSOCKET_ENDPOINT: &str = "ws://irc-ws.chat.twitch.tv:80";

/// Plaintext IRC over TCP.
pub const IRC_ENDPOINT: &str = "irc://irc.chat.twitch.tv:6667";

/// IRC over TLS.
pub const SECURE_IRC_ENDPOINT: &str = "irc://irc.chat.twitch.tv:6697";

/// URL schemes the WebSocket transport can open.
pub const SUPPORTED_SCHEMES: &[&str] = &["ws", "wss"];

// =============================================================================
// Session Defaults
// =============================================================================

/// Capabilities requested when the caller supplies none.
pub const DEFAULT_CAPABILITIES: &[&str] = &[
    "twitch.tv/commands",
    "twitch.tv/membership",
    "twitch.tv/tags",
];

/// Anonymous, read-only login accepted by Twitch without a token.
pub fn default_nickname() -> String {
    "justinfan123".to_string()
}

pub fn default_capabilities() -> Vec<String> {
    DEFAULT_CAPABILITIES.iter().map(|c| c.to_string()).collect()
}

pub fn default_endpoint() -> String {
    SECURE_WEBSOCKET_ENDPOINT.to_string()
}
