use super::tags::Tags;

/// One tokenized protocol line.
///
/// Produced once per inbound or outbound line and never mutated by the
/// session layer afterwards.
///
/// # Example
///
/// ```
/// use tmi_proto::RawMessage;
///
/// let msg: RawMessage = "@room-id=1 :tmi.twitch.tv ROOMSTATE #dallas".parse().unwrap();
/// assert_eq!(msg.command, "ROOMSTATE");
/// assert_eq!(msg.tags.get("room-id"), Some("1"));
///
/// assert_eq!(RawMessage::join("#dallas").to_string(), "JOIN #dallas");
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RawMessage {
    /// IRCv3 tags, unescaped.
    pub tags: Tags,
    /// Source of the line (`tmi.twitch.tv`, `nick!user@host`), if sent.
    pub prefix: Option<String>,
    /// Protocol verb or three-digit numeric, verbatim.
    pub command: String,
    /// Parameters in order; the trailing parameter is the last entry.
    pub params: Vec<String>,
}

impl RawMessage {
    /// Create a message with no tags and no prefix.
    #[must_use]
    pub fn new<C, I, P>(command: C, params: I) -> Self
    where
        C: Into<String>,
        I: IntoIterator<Item = P>,
        P: Into<String>,
    {
        Self {
            tags: Tags::new(),
            prefix: None,
            command: command.into(),
            params: params.into_iter().map(Into::into).collect(),
        }
    }

    /// Builder-style tag insertion.
    #[must_use]
    pub fn with_tag(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.tags.insert(key, value);
        self
    }

    /// Builder-style prefix.
    #[must_use]
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    /// Parameter at `idx`, if present.
    pub fn param(&self, idx: usize) -> Option<&str> {
        self.params.get(idx).map(String::as_str)
    }

    /// The trailing (last) parameter, if any.
    pub fn trailing(&self) -> Option<&str> {
        self.params.last().map(String::as_str)
    }

    /// The nickname part of a `nick!user@host` prefix.
    pub fn source_nickname(&self) -> Option<&str> {
        let prefix = self.prefix.as_deref()?;
        let end = prefix.find(['!', '@']).unwrap_or(prefix.len());
        if end == prefix.len() && prefix.contains('.') {
            // bare server name
            return None;
        }
        Some(&prefix[..end])
    }

    /// `PASS <token>`
    #[must_use]
    pub fn pass(token: impl Into<String>) -> Self {
        Self::new("PASS", [token.into()])
    }

    /// `NICK <nickname>`
    #[must_use]
    pub fn nick(nickname: impl Into<String>) -> Self {
        Self::new("NICK", [nickname.into()])
    }

    /// `CAP REQ <capability>`
    #[must_use]
    pub fn cap_req(capability: impl Into<String>) -> Self {
        Self::new("CAP", ["REQ".to_string(), capability.into()])
    }

    /// `JOIN <channel>`
    #[must_use]
    pub fn join(channel: impl Into<String>) -> Self {
        Self::new("JOIN", [channel.into()])
    }

    /// `PART <channel>`
    #[must_use]
    pub fn part(channel: impl Into<String>) -> Self {
        Self::new("PART", [channel.into()])
    }

    /// `PONG` echoing a ping's parameters, joined by single spaces.
    #[must_use]
    pub fn pong<S: AsRef<str>>(ping_params: &[S]) -> Self {
        let echoed: Vec<&str> = ping_params.iter().map(AsRef::as_ref).collect();
        if echoed.is_empty() {
            return Self::new("PONG", Vec::<String>::new());
        }
        Self::new("PONG", [echoed.join(" ")])
    }

    /// `PRIVMSG <target> :<text>`
    #[must_use]
    pub fn privmsg(target: impl Into<String>, text: impl Into<String>) -> Self {
        Self::new("PRIVMSG", [target.into(), text.into()])
    }

    /// `QUIT`
    #[must_use]
    pub fn quit() -> Self {
        Self::new("QUIT", Vec::<String>::new())
    }
}
