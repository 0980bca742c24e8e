//! Value types decoded from composite tags.

use std::fmt;
use std::str::FromStr;

/// One entry of a `badges` / `source-badges` list, e.g. `subscriber/6`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Badge {
    /// Badge set name (`subscriber`, `moderator`, `bits`, ...).
    pub name: String,
    /// Version within the set.
    pub version: u32,
}

impl Badge {
    /// Create a badge.
    pub fn new(name: impl Into<String>, version: u32) -> Self {
        Self {
            name: name.into(),
            version,
        }
    }
}

impl FromStr for Badge {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (name, version) = s.split_once('/').ok_or("name/version pair")?;
        if name.is_empty() {
            return Err("name/version pair");
        }
        let version = version.parse().map_err(|_| "integer badge version")?;
        Ok(Badge::new(name, version))
    }
}

impl fmt::Display for Badge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.name, self.version)
    }
}

/// The `badge-info` tag: a single `name/months` pair, e.g. `subscriber/8`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BadgeInfo {
    /// Badge set the detail applies to.
    pub name: String,
    /// Exact number of months (the badge version only gives the tier).
    pub months: u32,
}

impl BadgeInfo {
    /// Create a badge-info pair.
    pub fn new(name: impl Into<String>, months: u32) -> Self {
        Self {
            name: name.into(),
            months,
        }
    }
}

impl FromStr for BadgeInfo {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let badge: Badge = s.parse().map_err(|_| "name/months pair")?;
        Ok(BadgeInfo::new(badge.name, badge.version))
    }
}

/// Character range an emote occupies in the message text.
///
/// Kept exactly as sent; Twitch uses zero-based inclusive offsets but the
/// range is not reinterpreted here.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EmoteRange {
    pub start: usize,
    pub end: usize,
}

impl FromStr for EmoteRange {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (start, end) = s.split_once('-').ok_or("start-end range")?;
        Ok(EmoteRange {
            start: start.parse().map_err(|_| "integer range start")?,
            end: end.parse().map_err(|_| "integer range end")?,
        })
    }
}

/// One `id:ranges` entry of the `emotes` tag.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Emote {
    /// Emote id (numeric for legacy emotes, `emotesv2_...` for newer ones).
    pub id: String,
    pub ranges: Vec<EmoteRange>,
}

impl Emote {
    /// Create an emote from an id and `(start, end)` pairs.
    pub fn new(id: impl Into<String>, ranges: impl IntoIterator<Item = (usize, usize)>) -> Self {
        Self {
            id: id.into(),
            ranges: ranges
                .into_iter()
                .map(|(start, end)| EmoteRange { start, end })
                .collect(),
        }
    }
}

/// An emote is malformed as a whole if its id is empty or any of its
/// ranges is.
impl FromStr for Emote {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (id, ranges) = s.split_once(':').ok_or("id:ranges pair")?;
        if id.is_empty() || ranges.is_empty() {
            return Err("id:ranges pair");
        }
        let ranges = ranges
            .split(',')
            .map(str::parse)
            .collect::<Result<Vec<EmoteRange>, _>>()?;
        Ok(Emote {
            id: id.to_string(),
            ranges,
        })
    }
}

/// The `color` tag: `#RRGGBB`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    /// Create a color from its components.
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

impl FromStr for Color {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        const EXPECTED: &str = "#RRGGBB color";
        let hex = s.strip_prefix('#').ok_or(EXPECTED)?;
        if hex.len() != 6 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(EXPECTED);
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| EXPECTED);
        Ok(Color::new(channel(0)?, channel(2)?, channel(4)?))
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}
