//! Configuration management.
//!
//! All settings are environment-driven, matching how MCP servers are
//! launched from assistant configuration files:
//!
//! | Variable | Default | Meaning |
//! |----------|---------|---------|
//! | `PAPERLESS_URL` | `http://localhost:8000` | Base URL of the Paperless-ngx instance |
//! | `PAPERLESS_TOKEN` | (required) | API token for the Paperless-ngx instance |
//! | `PAPERLESS_TIMEOUT_SECS` | `30` | Per-request timeout against the API |

use crate::{Error, Result};
use secrecy::SecretString;
use std::time::Duration;

/// Default base URL for a local Paperless-ngx instance.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

/// Default per-request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Connection settings for the Paperless-ngx API.
#[derive(Debug, Clone)]
pub struct PaperlessConfig {
    /// Base URL of the Paperless-ngx instance, without a trailing slash.
    pub base_url: String,
    /// API token, sent as `Authorization: Token <token>`.
    pub token: SecretString,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl PaperlessConfig {
    /// Creates a configuration from explicit values.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingConfiguration`] if the token is empty.
    pub fn new(base_url: impl Into<String>, token: impl Into<String>) -> Result<Self> {
        let token = token.into();
        if token.trim().is_empty() {
            return Err(Error::MissingConfiguration("PAPERLESS_TOKEN".to_string()));
        }

        Ok(Self {
            base_url: normalize_base_url(base_url.into()),
            token: SecretString::from(token),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        })
    }

    /// Loads configuration from the environment.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingConfiguration`] if `PAPERLESS_TOKEN` is not
    /// set. The server must not start without credentials.
    pub fn from_env() -> Result<Self> {
        let base_url =
            std::env::var("PAPERLESS_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());

        let token = std::env::var("PAPERLESS_TOKEN")
            .map_err(|_| Error::MissingConfiguration("PAPERLESS_TOKEN".to_string()))?;

        let mut config = Self::new(base_url, token)?;

        if let Some(secs) = std::env::var("PAPERLESS_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
        {
            config.timeout = Duration::from_secs(secs);
        }

        Ok(config)
    }

    /// Sets the per-request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Strips a trailing slash so endpoint paths can be appended uniformly.
fn normalize_base_url(url: String) -> String {
    url.strip_suffix('/').map_or(url.clone(), str::to_string)
}
