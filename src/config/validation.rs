//! Configuration validation.
//!
//! Validates configuration at startup to catch common errors early. The
//! session runs [`validate_session`] again on every connect.

use super::defaults::SUPPORTED_SCHEMES;
use super::{Config, SessionConfig};
use thiserror::Error;

/// Validation errors for configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("session.nickname must not be empty")]
    EmptyNickname,
    #[error("session.endpoint must be a ws:// or wss:// URL, got '{0}'")]
    UnsupportedEndpoint(String),
    #[error("session.capabilities[{0}] is empty")]
    EmptyCapability(usize),
    #[error("channels[{0}] is empty")]
    EmptyChannel(usize),
}

impl ValidationError {
    /// Get a static error code string for logging.
    #[inline]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::EmptyNickname => "empty_nickname",
            Self::UnsupportedEndpoint(_) => "unsupported_endpoint",
            Self::EmptyCapability(_) => "empty_capability",
            Self::EmptyChannel(_) => "empty_channel",
        }
    }
}

/// Validate the settings a connect depends on, returning all errors found.
pub fn validate_session(session: &SessionConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if session.nickname.trim().is_empty() {
        errors.push(ValidationError::EmptyNickname);
    }

    for (i, cap) in session.capabilities.iter().enumerate() {
        if cap.trim().is_empty() {
            errors.push(ValidationError::EmptyCapability(i));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Validate a configuration, returning all errors found.
pub fn validate(config: &Config) -> Result<(), Vec<ValidationError>> {
    let mut errors = validate_session(&config.session).err().unwrap_or_default();

    let scheme = config
        .session
        .endpoint
        .split_once("://")
        .map(|(scheme, _)| scheme.to_ascii_lowercase());
    if !scheme.is_some_and(|s| SUPPORTED_SCHEMES.contains(&s.as_str())) {
        errors.push(ValidationError::UnsupportedEndpoint(
            config.session.endpoint.clone(),
        ));
    }

    for (i, channel) in config.channels.iter().enumerate() {
        if channel.trim_start_matches('#').trim().is_empty() {
            errors.push(ValidationError::EmptyChannel(i));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert_eq!(validate(&Config::default()), Ok(()));
    }

    #[test]
    fn test_whitespace_nickname_rejected() {
        for nickname in ["", " ", "\t", "\n", " \r\n "] {
            let session = SessionConfig::new(nickname);
            assert_eq!(
                validate_session(&session),
                Err(vec![ValidationError::EmptyNickname]),
                "nickname {nickname:?}"
            );
        }
    }

    #[test]
    fn test_collects_all_errors() {
        let mut config = Config::default();
        config.session.nickname = " ".to_string();
        config.session.endpoint = "http://example.com".to_string();
        config.session.capabilities = vec!["twitch.tv/tags".to_string(), String::new()];
        config.channels = vec!["dallas".to_string(), "#".to_string()];

        let errors = validate(&config).unwrap_err();
        assert_eq!(
            errors,
            vec![
                ValidationError::EmptyNickname,
                ValidationError::EmptyCapability(1),
                ValidationError::UnsupportedEndpoint("http://example.com".to_string()),
                ValidationError::EmptyChannel(1),
            ]
        );
        assert_eq!(errors[2].error_code(), "unsupported_endpoint");
    }

    #[test]
    fn test_endpoint_schemes() {
        let mut config = Config::default();
        for endpoint in ["wss://irc-ws.chat.twitch.tv:443", "WS://localhost:8080"] {
            config.session.endpoint = endpoint.to_string();
            assert!(validate(&config).is_ok(), "{endpoint}");
        }
        for endpoint in ["irc://irc.chat.twitch.tv:6667", "irc-ws.chat.twitch.tv"] {
            config.session.endpoint = endpoint.to_string();
            assert!(validate(&config).is_err(), "{endpoint}");
        }
    }
}
