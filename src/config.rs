//! Client configuration: explicit values, environment loading and validation.

use std::env;
use std::time::Duration;

use crate::error::SabError;
use crate::types::OutputFormat;

/// Default per-request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Accepted range for request timeouts in seconds.
pub const TIMEOUT_RANGE_SECS: std::ops::RangeInclusive<u64> = 1..=3600;

/// Environment variable holding the server URL.
pub const ENV_URL: &str = "SABNZBD_URL";
/// Environment variable holding the API key.
pub const ENV_APIKEY: &str = "SABNZBD_APIKEY";
/// Environment variable holding the output format.
pub const ENV_OUTPUT: &str = "SABNZBD_OUTPUT";
/// Environment variable holding the request timeout in seconds.
pub const ENV_TIMEOUT_SECS: &str = "SABNZBD_TIMEOUT_SECS";

/// Everything needed to construct a [`Client`](crate::Client).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Server root, e.g. `http://localhost:8080`. `/sabnzbd/api` is appended.
    pub url: String,
    /// API key; empty when the server does not require one.
    pub api_key: String,
    /// Requested response encoding.
    pub output: OutputFormat,
    /// Default per-request timeout in seconds.
    pub timeout_secs: u64,
    /// Overrides the default transport's User-Agent.
    pub user_agent: Option<String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            api_key: String::new(),
            output: OutputFormat::Json,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            user_agent: None,
        }
    }
}

impl ClientConfig {
    /// Creates a config for `url` with default settings.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Self::default()
        }
    }

    /// Reads `SABNZBD_URL`, `SABNZBD_APIKEY`, `SABNZBD_OUTPUT` and
    /// `SABNZBD_TIMEOUT_SECS`. The lower-case `sabnzbd_url` and
    /// `sabnzbd_apikey` spellings are accepted as fallbacks.
    ///
    /// Missing variables keep their defaults; the result is not validated.
    ///
    /// # Errors
    ///
    /// Returns [`SabError::Config`] when a present variable cannot be parsed.
    pub fn from_env() -> Result<Self, SabError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Like [`from_env`](Self::from_env) but reads from an arbitrary lookup.
    ///
    /// # Errors
    ///
    /// Returns [`SabError::Config`] when a present value cannot be parsed.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, SabError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |name: &str| {
            lookup(name)
                .or_else(|| lookup(&name.to_ascii_lowercase()))
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let mut config = Self::default();
        if let Some(url) = read(ENV_URL) {
            config.url = url;
        }
        if let Some(api_key) = read(ENV_APIKEY) {
            config.api_key = api_key;
        }
        if let Some(output) = read(ENV_OUTPUT) {
            config.output = output.parse()?;
        }
        if let Some(timeout) = read(ENV_TIMEOUT_SECS) {
            config.timeout_secs = timeout.parse().map_err(|_| {
                SabError::config(
                    "timeout_secs",
                    format!("'{timeout}' is not a whole number of seconds"),
                )
            })?;
        }
        Ok(config)
    }

    /// Checks values against the client's constraints.
    ///
    /// # Errors
    ///
    /// Returns [`SabError::Config`] for an empty URL or an out-of-range timeout.
    pub fn validate(&self) -> Result<(), SabError> {
        if self.url.trim().is_empty() {
            return Err(SabError::config("url", "must not be empty"));
        }
        if !TIMEOUT_RANGE_SECS.contains(&self.timeout_secs) {
            return Err(SabError::config(
                "timeout_secs",
                format!(
                    "{}. Expected range: {}..={}",
                    self.timeout_secs,
                    TIMEOUT_RANGE_SECS.start(),
                    TIMEOUT_RANGE_SECS.end()
                ),
            ));
        }
        Ok(())
    }

    /// The timeout as a [`Duration`].
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}
