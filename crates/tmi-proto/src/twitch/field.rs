//! Field descriptors and the decode rules they use.
//!
//! A [`Field`] pairs a tag key with a rule. Rules report *what* they expected
//! as a static string; [`Field::decode`] attaches the key and raw value to
//! produce a [`DecodeError`].

use std::str::FromStr;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tracing::debug;
use uuid::Uuid;

use super::types::{Badge, BadgeInfo, Color, Emote};
use crate::error::DecodeError;
use crate::message::Tags;

/// A decode rule: raw tag value in, typed value or expectation out.
pub type Rule<T> = fn(&str) -> Result<T, &'static str>;

/// A typed view of one tag key.
pub struct Field<T> {
    /// Tag key, e.g. `room-id`.
    pub key: &'static str,
    /// Rule applied to the unescaped value.
    pub rule: Rule<T>,
}

impl<T> Field<T> {
    /// Look the key up in `tags` and run the rule.
    ///
    /// `Ok(None)` when the key is missing, `Err` when present but malformed.
    pub fn decode(&self, tags: &Tags) -> Result<Option<T>, DecodeError> {
        let Some(value) = tags.get(self.key) else {
            return Ok(None);
        };
        (self.rule)(value)
            .map(Some)
            .map_err(|expected| DecodeError {
                key: self.key,
                value: value.to_string(),
                expected,
            })
    }
}

// Manual impls: a derive would require `T: Clone`/`T: Debug`.
impl<T> Clone for Field<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Field<T> {}

impl<T> std::fmt::Debug for Field<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Field").field("key", &self.key).finish()
    }
}

/// The decode rules referenced by the field table.
pub mod rules {
    use super::*;

    /// Decimal integer of the target width; empty is malformed.
    pub fn integer<T: FromStr>(value: &str) -> Result<T, &'static str> {
        value.parse().map_err(|_| "integer")
    }

    /// `1` is true, `0` is false.
    pub fn flag(value: &str) -> Result<bool, &'static str> {
        match value {
            "1" => Ok(true),
            "0" => Ok(false),
            _ => Err("0 or 1"),
        }
    }

    /// Hyphenated UUID, any case.
    pub fn uuid(value: &str) -> Result<Uuid, &'static str> {
        Uuid::try_parse(value).map_err(|_| "uuid")
    }

    /// Milliseconds since the Unix epoch.
    pub fn timestamp_millis(value: &str) -> Result<DateTime<Utc>, &'static str> {
        let millis: i64 = value.parse().map_err(|_| "millisecond timestamp")?;
        DateTime::from_timestamp_millis(millis).ok_or("millisecond timestamp")
    }

    /// Whole seconds.
    pub fn duration_secs(value: &str) -> Result<Duration, &'static str> {
        value
            .parse()
            .map(Duration::from_secs)
            .map_err(|_| "duration in seconds")
    }

    /// `#RRGGBB`.
    pub fn color(value: &str) -> Result<Color, &'static str> {
        value.parse()
    }

    /// Any value, including empty.
    pub fn text(value: &str) -> Result<String, &'static str> {
        Ok(value.to_string())
    }

    /// One of an enumeration's names, case-insensitive.
    pub fn enumeration<T: FromStr>(value: &str) -> Result<T, &'static str> {
        value.parse().map_err(|_| "known name")
    }

    /// `name/version[,name/version...]`; empty is an empty list.
    pub fn badge_list(value: &str) -> Result<Vec<Badge>, &'static str> {
        Ok(list(value, ',', "badge"))
    }

    /// `name/months`.
    pub fn badge_info(value: &str) -> Result<BadgeInfo, &'static str> {
        value.parse()
    }

    /// `id:start-end[,start-end...][/id:...]`; empty is an empty list.
    pub fn emote_list(value: &str) -> Result<Vec<Emote>, &'static str> {
        Ok(list(value, '/', "emote"))
    }

    /// `n[,n...]`; empty is an empty list.
    pub fn integer_list(value: &str) -> Result<Vec<u64>, &'static str> {
        Ok(list(value, ',', "integer"))
    }

    /// Decode each element on its own; malformed elements are dropped.
    fn list<T>(value: &str, separator: char, element: &'static str) -> Vec<T>
    where
        T: FromStr,
    {
        value
            .split(separator)
            .filter(|item| !item.is_empty())
            .filter_map(|item| match item.parse() {
                Ok(parsed) => Some(parsed),
                Err(_) => {
                    debug!(item, element, "Dropping malformed list element");
                    None
                }
            })
            .collect()
    }
}
