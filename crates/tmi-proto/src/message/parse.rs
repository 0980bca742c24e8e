//! `FromStr` for [`RawMessage`] on top of the nom tokenizer.

use std::str::FromStr;

use crate::error::{MessageParseError, ProtocolError};

use super::nom_parser::ParsedMessage;
use super::tags::{unescape_tag_value, Tags};
use super::types::RawMessage;

/// Split a raw tag section (without the leading `@`) into a [`Tags`] map.
///
/// `key` without `=` yields an empty value; a repeated key keeps the last
/// value.
pub(crate) fn parse_tags_string(tags_str: &str) -> Tags {
    let mut tags = Tags::new();
    for item in tags_str.split(';').filter(|s| !s.is_empty()) {
        let (key, value) = match item.split_once('=') {
            Some((k, v)) => (k, unescape_tag_value(v)),
            None => (item, String::new()),
        };
        if !key.is_empty() {
            tags.insert(key, value);
        }
    }
    tags
}

impl FromStr for RawMessage {
    type Err = ProtocolError;

    fn from_str(s: &str) -> Result<RawMessage, Self::Err> {
        let invalid = |cause| ProtocolError::InvalidMessage {
            string: s.to_owned(),
            cause,
        };

        let line = s.trim_end_matches(['\r', '\n']);
        if line.trim().is_empty() {
            return Err(invalid(MessageParseError::EmptyMessage));
        }

        let parsed = ParsedMessage::parse(line).map_err(|e| {
            if e.position >= line.len() {
                invalid(MessageParseError::InvalidCommand)
            } else {
                invalid(MessageParseError::ParseContext {
                    position: e.position,
                    context: format!("{:?}", e.kind),
                })
            }
        })?;

        Ok(RawMessage {
            tags: parsed.tags.map(parse_tags_string).unwrap_or_default(),
            prefix: parsed.prefix.map(str::to_owned),
            command: parsed.command.to_owned(),
            params: parsed.params.iter().map(|p| (*p).to_owned()).collect(),
        })
    }
}

/// Tokenize one line.
pub fn parse_message(line: &str) -> Result<RawMessage, ProtocolError> {
    line.parse()
}
