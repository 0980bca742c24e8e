//! Line serialization.

use std::fmt::{self, Display, Formatter};

use super::tags::escape_tag_value;
use super::types::RawMessage;
use crate::response::Response;

fn needs_trailing(param: &str) -> bool {
    param.is_empty() || param.contains(' ') || param.starts_with(':')
}

fn write_line(msg: &RawMessage, command: &str, f: &mut dyn fmt::Write) -> fmt::Result {
    if !msg.tags.is_empty() {
        f.write_char('@')?;
        for (i, (key, value)) in msg.tags.iter().enumerate() {
            if i > 0 {
                f.write_char(';')?;
            }
            f.write_str(key)?;
            if !value.is_empty() {
                f.write_char('=')?;
                escape_tag_value(f, value)?;
            }
        }
        f.write_char(' ')?;
    }

    if let Some(ref prefix) = msg.prefix {
        write!(f, ":{} ", prefix)?;
    }

    f.write_str(command)?;

    if let Some((last, middle)) = msg.params.split_last() {
        for param in middle {
            write!(f, " {}", param)?;
        }
        if needs_trailing(last) {
            write!(f, " :{}", last)?;
        } else {
            write!(f, " {}", last)?;
        }
    }
    Ok(())
}

/// Renders the line without a terminating CRLF.
impl Display for RawMessage {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write_line(self, &self.command, f)
    }
}

/// Build a wire line (CRLF terminated) from a message.
///
/// With `use_numeric`, a reply written by name (`RPL_WELCOME`) is emitted as
/// its three-digit code; otherwise a known code is emitted by name. Commands
/// outside the reply table pass through untouched.
pub fn build_message(msg: &RawMessage, use_numeric: bool) -> String {
    let command = if use_numeric {
        Response::from_name(&msg.command).map(|r| format!("{:03}", r.code()))
    } else {
        msg.command
            .parse::<u16>()
            .ok()
            .and_then(Response::from_code)
            .map(|r| r.name().to_string())
    };

    let mut line = String::with_capacity(64);
    // writing into a String cannot fail
    let _ = write_line(msg, command.as_deref().unwrap_or(&msg.command), &mut line);
    line.push_str("\r\n");
    line
}
