//! Core configuration types and loading.

use serde::Deserialize;
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;

use super::defaults::{
    default_capabilities, default_endpoint, default_nickname, DEFAULT_CAPABILITIES,
};

/// Environment variable that overrides `session.oauth_token`.
pub const TOKEN_ENV: &str = "TMICHAT_OAUTH_TOKEN";

const TOKEN_SCHEME: &str = "oauth:";

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

impl ConfigError {
    /// Get a static error code string for logging.
    #[inline]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Io(_) => "config_io",
            Self::Parse(_) => "config_parse",
        }
    }
}

/// Client configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Login, credential, capabilities and endpoint.
    #[serde(default)]
    pub session: SessionConfig,
    /// Channels joined after connecting.
    #[serde(default)]
    pub channels: Vec<String>,
    /// Log output settings.
    #[serde(default)]
    pub log: LogConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    ///
    /// A non-empty `TMICHAT_OAUTH_TOKEN` replaces the file's token.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Config = content.parse()?;
        config.override_token(std::env::var(TOKEN_ENV).ok());
        Ok(config)
    }

    /// Replace the configured token when `token` is set and non-blank.
    pub fn override_token(&mut self, token: Option<String>) {
        if let Some(token) = token
            && !token.trim().is_empty()
        {
            self.session.oauth_token = Some(token);
        }
    }
}

impl FromStr for Config {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut config: Config = toml::from_str(s)?;
        config.session.capabilities = dedup(std::mem::take(&mut config.session.capabilities));
        Ok(config)
    }
}

/// Per-connection settings.
///
/// Supplied to the session at construction and replaceable between connects.
#[derive(Clone, PartialEq, Eq, Deserialize)]
pub struct SessionConfig {
    /// Login name; sent lower-cased.
    #[serde(default = "default_nickname")]
    pub nickname: String,
    /// OAuth token, with or without the `oauth:` prefix. Anonymous when unset.
    #[serde(default)]
    pub oauth_token: Option<String>,
    /// Capabilities requested during the handshake, in order.
    #[serde(default = "default_capabilities")]
    pub capabilities: Vec<String>,
    /// Server URL.
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            nickname: default_nickname(),
            oauth_token: None,
            capabilities: default_capabilities(),
            endpoint: default_endpoint(),
        }
    }
}

impl SessionConfig {
    /// Default settings with the given nickname.
    pub fn new(nickname: impl Into<String>) -> Self {
        Self {
            nickname: nickname.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.oauth_token = Some(token.into());
        self
    }

    /// Replace the capability list; duplicates are dropped, first one wins.
    #[must_use]
    pub fn with_capabilities<I, S>(mut self, capabilities: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.capabilities = dedup(capabilities.into_iter().map(Into::into).collect());
        self
    }

    #[must_use]
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Nickname as sent on the wire: trimmed and lower-cased.
    pub fn login(&self) -> String {
        self.nickname.trim().to_lowercase()
    }

    /// Token as sent in `PASS`, always carrying the `oauth:` scheme.
    ///
    /// `None` when no token (or a blank one) is configured.
    pub fn credential(&self) -> Option<String> {
        let token = self.oauth_token.as_deref()?.trim();
        if token.is_empty() {
            return None;
        }
        if token.starts_with(TOKEN_SCHEME) {
            Some(token.to_string())
        } else if token.starts_with(':') {
            Some(format!("oauth{token}"))
        } else {
            Some(format!("{TOKEN_SCHEME}{token}"))
        }
    }

    /// Capabilities to request; the default set when none are configured.
    pub fn requested_capabilities(&self) -> Vec<&str> {
        if self.capabilities.is_empty() {
            DEFAULT_CAPABILITIES.to_vec()
        } else {
            self.capabilities.iter().map(String::as_str).collect()
        }
    }
}

impl fmt::Debug for SessionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionConfig")
            .field("nickname", &self.nickname)
            .field("oauth_token", &self.oauth_token.as_ref().map(|_| "<redacted>"))
            .field("capabilities", &self.capabilities)
            .field("endpoint", &self.endpoint)
            .finish()
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Logging configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LogConfig {
    /// `text` (default) or `json`.
    #[serde(default)]
    pub format: LogFormat,
    /// Filter directive used when `RUST_LOG` is unset (default `info`).
    #[serde(default)]
    pub filter: Option<String>,
}

fn dedup(items: Vec<String>) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    items
        .into_iter()
        .filter(|item| seen.insert(item.clone()))
        .collect()
}
