//! Configuration loading and management.
//!
//! This module is split into logical submodules:
//! - [`types`]: Config struct definitions (Config, SessionConfig, LogConfig)
//! - [`defaults`]: Endpoint constants and serde default functions
//! - [`validation`]: Startup validation collecting every error found

pub mod defaults;
mod types;
pub mod validation;

pub use types::{Config, ConfigError, LogConfig, LogFormat, SessionConfig, TOKEN_ENV};
