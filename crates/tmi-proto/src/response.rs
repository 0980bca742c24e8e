//! Numeric replies sent by the Twitch chat servers.
//!
//! Twitch only emits a handful of RFC 2812 numerics: the registration burst
//! (001-004, MOTD), NAMES replies when `twitch.tv/membership` is requested,
//! and `421` for commands it does not support.

#![allow(non_camel_case_types)]

use std::fmt;
use std::str::FromStr;

/// A numeric reply.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u16)]
#[non_exhaustive]
pub enum Response {
    /// 001 - Authentication succeeded
    RPL_WELCOME = 1,
    /// 002 - Your host
    RPL_YOURHOST = 2,
    /// 003 - Server creation notice
    RPL_CREATED = 3,
    /// 004 - Server info
    RPL_MYINFO = 4,
    /// 353 - NAMES list
    RPL_NAMREPLY = 353,
    /// 366 - End of NAMES list
    RPL_ENDOFNAMES = 366,
    /// 372 - MOTD line
    RPL_MOTD = 372,
    /// 375 - MOTD start
    RPL_MOTDSTART = 375,
    /// 376 - End of MOTD
    RPL_ENDOFMOTD = 376,
    /// 421 - Unsupported command
    ERR_UNKNOWNCOMMAND = 421,
}

const ALL: [Response; 10] = [
    Response::RPL_WELCOME,
    Response::RPL_YOURHOST,
    Response::RPL_CREATED,
    Response::RPL_MYINFO,
    Response::RPL_NAMREPLY,
    Response::RPL_ENDOFNAMES,
    Response::RPL_MOTD,
    Response::RPL_MOTDSTART,
    Response::RPL_ENDOFMOTD,
    Response::ERR_UNKNOWNCOMMAND,
];

impl Response {
    /// Numeric code.
    #[inline]
    pub fn code(&self) -> u16 {
        *self as u16
    }

    /// Look up a reply by numeric code.
    pub fn from_code(code: u16) -> Option<Response> {
        ALL.iter().copied().find(|r| r.code() == code)
    }

    /// Symbolic name, e.g. `RPL_WELCOME`.
    pub fn name(&self) -> &'static str {
        match self {
            Response::RPL_WELCOME => "RPL_WELCOME",
            Response::RPL_YOURHOST => "RPL_YOURHOST",
            Response::RPL_CREATED => "RPL_CREATED",
            Response::RPL_MYINFO => "RPL_MYINFO",
            Response::RPL_NAMREPLY => "RPL_NAMREPLY",
            Response::RPL_ENDOFNAMES => "RPL_ENDOFNAMES",
            Response::RPL_MOTD => "RPL_MOTD",
            Response::RPL_MOTDSTART => "RPL_MOTDSTART",
            Response::RPL_ENDOFMOTD => "RPL_ENDOFMOTD",
            Response::ERR_UNKNOWNCOMMAND => "ERR_UNKNOWNCOMMAND",
        }
    }

    /// Look up a reply by symbolic name (exact match).
    pub fn from_name(name: &str) -> Option<Response> {
        ALL.iter().copied().find(|r| r.name() == name)
    }

    /// Whether this is an error reply.
    #[inline]
    pub fn is_error(&self) -> bool {
        (400..600).contains(&self.code())
    }
}

impl fmt::Display for Response {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:03}", self.code())
    }
}

/// Error returned when a command is neither a known code nor a known name.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParseResponseError(pub String);

impl fmt::Display for ParseResponseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown numeric reply: {}", self.0)
    }
}

impl std::error::Error for ParseResponseError {}

/// Accepts either the three-digit code or the symbolic name.
impl FromStr for Response {
    type Err = ParseResponseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let by_code = if s.len() == 3 {
            s.parse::<u16>().ok().and_then(Response::from_code)
        } else {
            None
        };
        by_code
            .or_else(|| Response::from_name(s))
            .ok_or_else(|| ParseResponseError(s.to_string()))
    }
}
