//! Telemetry utilities: span constructors and log redaction.

use tmi_proto::RawMessage;

/// Render an outbound line for logs with the `PASS` credential masked.
pub fn redacted(msg: &RawMessage) -> String {
    if msg.command.eq_ignore_ascii_case("PASS") {
        "PASS ***".to_string()
    } else {
        msg.to_string()
    }
}

/// Standardized span constructors for session observability.
pub mod spans {
    use tracing::{Span, info_span};
    use uuid::Uuid;

    /// Create a span for a session's connect/disconnect calls.
    pub fn session(id: &Uuid, endpoint: &str) -> Span {
        info_span!("session", id = %id, endpoint = %endpoint)
    }

    /// Create a span for the task consuming one transport subscription.
    pub fn pump(session: &Uuid, subscription: u64) -> Span {
        info_span!("pump", session = %session, subscription)
    }

    /// Create a span for the join scheduler.
    pub fn scheduler(session: &Uuid) -> Span {
        info_span!("join_scheduler", session = %session)
    }
}
