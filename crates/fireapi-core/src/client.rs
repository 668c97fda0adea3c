//! HTTP transport settings.
//!
//! This module configures the `reqwest` clients used by both the async and the
//! blocking API clients, so the two share headers, timeouts and compression.

use crate::{Error, Result};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use secrecy::{ExposeSecret, SecretString};
use std::time::Duration;

/// Header that carries the private API key.
pub const API_KEY_HEADER: &str = "X-FIRE-APIKEY";

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 5;

/// Default connect timeout in seconds.
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 5;

/// HTTP client configuration.
///
/// No retry or pooling knobs live here: every call is a single attempt and the
/// caller decides what to do with a failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Request timeout
    pub timeout: Duration,

    /// Connection establishment timeout
    pub connect_timeout: Duration,

    /// Enable request/response logging
    pub enable_logging: bool,

    /// Enable response compression
    pub enable_compression: bool,

    /// User-Agent header value
    pub user_agent: Option<String>,
}

impl ClientConfig {
    /// Create a new client configuration with default values.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            connect_timeout: Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS),
            enable_logging: true,
            enable_compression: true,
            user_agent: None,
        }
    }

    /// Set request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set connect timeout.
    #[must_use]
    pub const fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Enable or disable logging.
    #[must_use]
    pub const fn with_logging(mut self, enabled: bool) -> Self {
        self.enable_logging = enabled;
        self
    }

    /// Enable or disable compression.
    #[must_use]
    pub const fn with_compression(mut self, enabled: bool) -> Self {
        self.enable_compression = enabled;
        self
    }

    /// Set the User-Agent header.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Build an async `reqwest` client that sends `api_key` on every request.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is not a valid header value or the TLS
    /// backend fails to initialise.
    pub fn build_async(&self, api_key: &SecretString) -> Result<reqwest::Client> {
        let mut builder = reqwest::Client::builder()
            .default_headers(default_headers(api_key)?)
            .timeout(self.timeout)
            .connect_timeout(self.connect_timeout)
            .gzip(self.enable_compression);
        if let Some(agent) = &self.user_agent {
            builder = builder.user_agent(agent.as_str());
        }
        builder
            .build()
            .map_err(|e| Error::ConfigError(format!("Failed to build HTTP client: {e}")))
    }

    /// Build a blocking `reqwest` client that sends `api_key` on every request.
    ///
    /// Must not be called from inside an async runtime.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is not a valid header value or the TLS
    /// backend fails to initialise.
    pub fn build_blocking(&self, api_key: &SecretString) -> Result<reqwest::blocking::Client> {
        let mut builder = reqwest::blocking::Client::builder()
            .default_headers(default_headers(api_key)?)
            .timeout(self.timeout)
            .connect_timeout(self.connect_timeout)
            .gzip(self.enable_compression);
        if let Some(agent) = &self.user_agent {
            builder = builder.user_agent(agent.as_str());
        }
        builder
            .build()
            .map_err(|e| Error::ConfigError(format!("Failed to build HTTP client: {e}")))
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Headers attached to every request: the API key (marked sensitive) and
/// `Accept: application/json`.
///
/// # Errors
///
/// Returns [`Error::ConfigError`] if the key contains characters that are not
/// allowed in a header.
pub fn default_headers(api_key: &SecretString) -> Result<HeaderMap> {
    let mut key = HeaderValue::from_str(api_key.expose_secret())
        .map_err(|_| Error::ConfigError("API key is not a valid header value".to_string()))?;
    key.set_sensitive(true);

    let mut headers = HeaderMap::new();
    headers.insert(API_KEY_HEADER, key);
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
    Ok(headers)
}
