//! Configuration for 24Fire API clients.
//!
//! [`FireConfig`] carries the private API key together with the endpoint and
//! timeout settings. It can be built in code, deserialized from a config file,
//! or read from the environment.

use crate::Error;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use url::Url;
use validator::Validate;

/// Default base URL of the KVM API.
pub const DEFAULT_BASE_URL: &str = "https://api.24fire.de/kvm";

/// Environment variable holding the API key.
pub const ENV_API_KEY: &str = "FIRE_API_KEY";

/// Environment variable overriding the base URL.
pub const ENV_API_URL: &str = "FIRE_API_URL";

/// Environment variable overriding the request timeout (seconds).
pub const ENV_API_TIMEOUT: &str = "FIRE_API_TIMEOUT";

/// Configuration for a 24Fire client instance.
#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct FireConfig {
    /// Private API key, sent with every request
    #[serde(skip_serializing)]
    pub api_key: SecretString,

    /// API base URL
    #[validate(url)]
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Request timeout in seconds
    #[validate(range(min = 1, max = 300))]
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

const fn default_request_timeout_secs() -> u64 {
    5
}

impl FireConfig {
    /// Create a configuration for the given API key with default settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is empty.
    pub fn new(api_key: impl Into<String>) -> Result<Self, Error> {
        let api_key: String = api_key.into();
        if api_key.trim().is_empty() {
            return Err(Error::ConfigError("API key must not be empty".to_string()));
        }

        Ok(Self {
            api_key: SecretString::from(api_key),
            base_url: default_base_url(),
            request_timeout_secs: default_request_timeout_secs(),
        })
    }

    /// Build a configuration from `FIRE_API_KEY`, `FIRE_API_URL` and
    /// `FIRE_API_TIMEOUT`.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is missing or an override does not validate.
    pub fn from_env() -> Result<Self, Error> {
        let api_key = std::env::var(ENV_API_KEY)
            .map_err(|_| Error::ConfigError(format!("{ENV_API_KEY} is not set")))?;
        let mut config = Self::new(api_key)?;

        if let Ok(url) = std::env::var(ENV_API_URL) {
            config = config.with_base_url(url);
        }
        if let Ok(raw) = std::env::var(ENV_API_TIMEOUT) {
            let seconds = raw.trim().parse::<u64>().map_err(|e| {
                Error::ConfigError(format!("Invalid {ENV_API_TIMEOUT} value `{raw}`: {e}"))
            })?;
            config = config.with_timeout(seconds);
        }

        config.validated()
    }

    /// Override the base URL.
    #[must_use]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set request timeout in seconds.
    #[must_use]
    pub const fn with_timeout(mut self, seconds: u64) -> Self {
        self.request_timeout_secs = seconds;
        self
    }

    /// Run validation, returning the configuration unchanged on success.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigError`] describing the first invalid field.
    pub fn validated(self) -> Result<Self, Error> {
        self.check()?;
        Ok(self)
    }

    /// Run validation without consuming the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigError`] describing the first invalid field.
    pub fn check(&self) -> Result<(), Error> {
        self.validate()
            .map_err(|e| Error::ConfigError(format!("Invalid configuration: {e}")))?;
        if self.api_key.expose_secret().trim().is_empty() {
            return Err(Error::ConfigError("API key must not be empty".to_string()));
        }
        Ok(())
    }

    /// Get the request timeout as a Duration.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Parse the base URL, normalised so relative endpoint paths join beneath it.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL cannot be parsed or cannot carry paths.
    pub fn parse_base_url(&self) -> Result<Url, Error> {
        parse_base_url(&self.base_url)
    }
}

/// Parse a base URL and make sure it ends with `/`.
///
/// `Url::join` drops the last path segment of a base without a trailing slash,
/// so `https://api.24fire.de/kvm` would otherwise resolve `status` to `/status`.
///
/// # Errors
///
/// Returns [`Error::InvalidEndpoint`] if the URL is unusable as a base.
pub fn parse_base_url(raw: &str) -> Result<Url, Error> {
    let mut url = Url::parse(raw.trim())?;
    if url.cannot_be_a_base() {
        return Err(Error::InvalidEndpoint(format!(
            "`{raw}` cannot be used as a base URL"
        )));
    }
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}
