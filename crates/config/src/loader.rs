//! Configuration loading from environment variables.
//!
//! Responsibilities:
//! - Load `.env` files (gated behind `DOTENV_DISABLED` for tests).
//! - Build a [`Settings`] value from `TOKENGATE_*` environment variables,
//!   falling back to the defaults in [`crate::constants`].
//!
//! Does NOT handle:
//! - Persisting configuration to disk.
//! - Per-invocation overrides (binaries layer CLI flags on top of this).
//!
//! Invariants:
//! - Environment variables take precedence over built-in defaults.
//! - `load_dotenv()` must be called explicitly, before reading settings.

use std::time::Duration;

use thiserror::Error;
use url::Url;

use crate::constants::{
    DEFAULT_BASE_URL, DEFAULT_PORT, DEFAULT_PROTECTED_DELAY_MS, DEFAULT_REFRESH_DELAY_MS,
    DEFAULT_TIMEOUT_SECS,
};

/// Errors that can occur during configuration loading.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid value for {var}: {message}")]
    InvalidValue { var: String, message: String },

    #[error("Invalid base URL '{0}'")]
    InvalidBaseUrl(String),
}

/// Load `.env` into the process environment unless explicitly disabled.
///
/// Tests set `DOTENV_DISABLED=1` so a developer's local `.env` cannot leak
/// into deterministic scenarios.
pub fn load_dotenv() {
    let disabled = std::env::var("DOTENV_DISABLED")
        .map(|v| v == "true" || v == "1")
        .unwrap_or(false);
    if !disabled {
        dotenvy::dotenv().ok();
    }
}

/// Environment-driven settings shared by the binaries.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Base URL of the backend the client talks to.
    pub base_url: String,
    /// Port the simulated backend binds to.
    pub port: u16,
    /// Client-side request timeout.
    pub timeout: Duration,
    /// Artificial delay applied to protected-resource requests.
    pub protected_delay: Duration,
    /// Artificial delay applied to refresh requests.
    pub refresh_delay: Duration,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            port: DEFAULT_PORT,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            protected_delay: Duration::from_millis(DEFAULT_PROTECTED_DELAY_MS),
            refresh_delay: Duration::from_millis(DEFAULT_REFRESH_DELAY_MS),
        }
    }
}

impl Settings {
    /// Build settings from `TOKENGATE_*` environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let base_url = match std::env::var("TOKENGATE_BASE_URL") {
            Ok(raw) => validate_base_url(&raw)?,
            Err(_) => defaults.base_url,
        };

        Ok(Self {
            base_url,
            port: parse_env("TOKENGATE_PORT", defaults.port)?,
            timeout: Duration::from_secs(parse_env(
                "TOKENGATE_TIMEOUT_SECS",
                DEFAULT_TIMEOUT_SECS,
            )?),
            protected_delay: Duration::from_millis(parse_env(
                "TOKENGATE_PROTECTED_DELAY_MS",
                DEFAULT_PROTECTED_DELAY_MS,
            )?),
            refresh_delay: Duration::from_millis(parse_env(
                "TOKENGATE_REFRESH_DELAY_MS",
                DEFAULT_REFRESH_DELAY_MS,
            )?),
        })
    }
}

/// Validate a base URL and normalize away trailing slashes.
pub fn validate_base_url(raw: &str) -> Result<String, ConfigError> {
    let trimmed = raw.trim_end_matches('/');
    Url::parse(trimmed).map_err(|_| ConfigError::InvalidBaseUrl(raw.to_string()))?;
    Ok(trimmed.to_string())
}

fn parse_env<T: std::str::FromStr>(var: &str, default: T) -> Result<T, ConfigError>
where
    T::Err: std::fmt::Display,
{
    match std::env::var(var) {
        Ok(raw) => raw.parse().map_err(|e: T::Err| ConfigError::InvalidValue {
            var: var.to_string(),
            message: e.to_string(),
        }),
        Err(_) => Ok(default),
    }
}
