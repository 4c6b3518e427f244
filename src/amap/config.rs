//! Client configuration.

use std::time::Duration;
use url::Url;

use super::error::{AmapError, AmapResult};

/// Default AMap REST API origin.
pub const DEFAULT_BASE_URL: &str = "https://restapi.amap.com";

/// Default attempt budget for a single logical request.
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Default pause between two attempts.
pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_millis(100);

/// Immutable settings for [`AmapClient`](super::AmapClient).
///
/// Built once at startup (see `Config::client_config`) and moved into the
/// client. `max_retries` is the total number of attempts; a value of 0 still
/// performs one attempt.
#[derive(Clone)]
pub struct ClientConfig {
    pub base_url: String,
    pub api_key: String,
    pub max_retries: u32,
    /// Per-attempt timeout. `None` leaves requests unbounded.
    pub timeout: Option<Duration>,
    pub retry_delay: Duration,
}

impl ClientConfig {
    /// Create a configuration with default retry settings.
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: api_key.into(),
            max_retries: DEFAULT_MAX_RETRIES,
            timeout: None,
            retry_delay: DEFAULT_RETRY_DELAY,
        }
    }

    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn with_retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = delay;
        self
    }

    /// Number of attempts the client will make for one request.
    pub fn attempts(&self) -> u32 {
        self.max_retries.max(1)
    }

    /// Check the invariants and return the parsed origin.
    ///
    /// The API key must be non-empty and the base URL must be an absolute
    /// `http` or `https` URL with a host.
    pub fn validate(&self) -> AmapResult<Url> {
        if self.api_key.trim().is_empty() {
            return Err(AmapError::invalid_config(
                "API key is empty; set `api_key` in config.yaml or the API_KEY environment variable",
            ));
        }

        let url = Url::parse(&self.base_url).map_err(|e| {
            AmapError::invalid_config(format!("base URL '{}' is invalid: {}", self.base_url, e))
        })?;

        if !matches!(url.scheme(), "http" | "https") {
            return Err(AmapError::invalid_config(format!(
                "base URL '{}' must use http or https",
                self.base_url
            )));
        }

        if url.host_str().is_none() {
            return Err(AmapError::invalid_config(format!(
                "base URL '{}' has no host",
                self.base_url
            )));
        }

        Ok(url)
    }
}

/// Custom Debug implementation to redact the API key from logs.
impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &"[REDACTED]")
            .field("max_retries", &self.max_retries)
            .field("timeout", &self.timeout)
            .field("retry_delay", &self.retry_delay)
            .finish()
    }
}
