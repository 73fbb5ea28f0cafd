//! Client configuration
//!
//! Settings are layered: a YAML file (optional), then the
//! `DIGITALOCEAN_ACCESS_TOKEN` environment variable, then CLI flags.
//!
//! ```yaml
//! access_token: dop_v1_...
//! per_page: 200
//! max_concurrency: 4
//! requests_per_second: 20
//! ```

use crate::error::{Error, Result, ResultExt};
use crate::http::{HttpClientConfig, RateLimiterConfig};
use crate::pagination::{PaginationConfig, MAX_PER_PAGE};
use crate::types::BackoffType;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Environment variable holding the access token
pub const TOKEN_ENV_VAR: &str = "DIGITALOCEAN_ACCESS_TOKEN";

/// Default API endpoint
pub const DEFAULT_API_URL: &str = "https://api.digitalocean.com";

/// Complete client configuration
#[derive(Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ClientConfig {
    /// Personal access token
    #[serde(default)]
    pub access_token: Option<String>,

    /// API base URL
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Items requested per page
    #[serde(default = "default_per_page")]
    pub per_page: u32,

    /// Concurrent page fetches per listing (unset = all at once)
    #[serde(default)]
    pub max_concurrency: Option<usize>,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Retries for failed requests
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Retry backoff strategy
    #[serde(default)]
    pub backoff: BackoffType,

    /// Client-side request rate cap
    #[serde(default)]
    pub requests_per_second: Option<u32>,

    /// Delay between action status polls
    #[serde(default = "default_action_poll_interval_ms")]
    pub action_poll_interval_ms: u64,

    /// Give up waiting on an action after this long
    #[serde(default = "default_action_timeout_secs")]
    pub action_timeout_secs: u64,
}

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

fn default_per_page() -> u32 {
    MAX_PER_PAGE
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_max_retries() -> u32 {
    3
}

fn default_action_poll_interval_ms() -> u64 {
    5000
}

fn default_action_timeout_secs() -> u64 {
    300
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            access_token: None,
            api_url: default_api_url(),
            per_page: default_per_page(),
            max_concurrency: None,
            timeout_secs: default_timeout_secs(),
            max_retries: default_max_retries(),
            backoff: BackoffType::default(),
            requests_per_second: None,
            action_poll_interval_ms: default_action_poll_interval_ms(),
            action_timeout_secs: default_action_timeout_secs(),
        }
    }
}

impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("access_token", &self.access_token.as_ref().map(|_| "<redacted>"))
            .field("api_url", &self.api_url)
            .field("per_page", &self.per_page)
            .field("max_concurrency", &self.max_concurrency)
            .field("timeout_secs", &self.timeout_secs)
            .field("max_retries", &self.max_retries)
            .field("backoff", &self.backoff)
            .field("requests_per_second", &self.requests_per_second)
            .field("action_poll_interval_ms", &self.action_poll_interval_ms)
            .field("action_timeout_secs", &self.action_timeout_secs)
            .finish()
    }
}

impl ClientConfig {
    /// Config with the given token and defaults for everything else
    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            access_token: Some(token.into()),
            ..Default::default()
        }
    }

    /// Parse a YAML config document
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Load a YAML config file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(Error::FileNotFound {
                path: path.display().to_string(),
            });
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Self::from_yaml_str(&content)
    }

    /// Take the token from the environment when one is set
    #[must_use]
    pub fn with_env(self) -> Self {
        self.with_env_token(std::env::var(TOKEN_ENV_VAR).ok())
    }

    /// Override the token with `token` when it is present and non-empty
    #[must_use]
    pub fn with_env_token(mut self, token: Option<String>) -> Self {
        if let Some(token) = token.filter(|t| !t.trim().is_empty()) {
            self.access_token = Some(token);
        }
        self
    }

    /// Check that the config can build a client
    pub fn validate(&self) -> Result<()> {
        match self.access_token.as_deref() {
            Some(token) if !token.trim().is_empty() => {}
            _ => return Err(Error::missing_field("access_token")),
        }

        url::Url::parse(&self.api_url)
            .map_err(|e| Error::invalid_value("api_url", e.to_string()))?;

        if self.per_page == 0 || self.per_page > MAX_PER_PAGE {
            return Err(Error::invalid_value(
                "per_page",
                format!("must be between 1 and {MAX_PER_PAGE}"),
            ));
        }

        if self.max_concurrency == Some(0) {
            return Err(Error::invalid_value(
                "max_concurrency",
                "must be at least 1 when set",
            ));
        }

        if self.requests_per_second == Some(0) {
            return Err(Error::invalid_value(
                "requests_per_second",
                "must be at least 1 when set",
            ));
        }

        if self.action_poll_interval_ms == 0 {
            return Err(Error::invalid_value(
                "action_poll_interval_ms",
                "must be greater than 0",
            ));
        }

        Ok(())
    }

    /// HTTP transport settings
    pub fn http_config(&self) -> HttpClientConfig {
        let mut builder = HttpClientConfig::builder()
            .base_url(&self.api_url)
            .timeout(Duration::from_secs(self.timeout_secs))
            .max_retries(self.max_retries)
            .backoff(
                self.backoff,
                Duration::from_millis(500),
                Duration::from_secs(30),
            )
            .header("Accept", "application/json");

        if let Some(rps) = self.requests_per_second {
            builder = builder.rate_limit(RateLimiterConfig::per_second(rps));
        }

        builder.build()
    }

    /// Listing settings
    pub fn pagination_config(&self) -> PaginationConfig {
        PaginationConfig {
            per_page: self.per_page,
            max_concurrency: self.max_concurrency,
        }
    }

    /// Delay between action polls
    pub fn action_poll_interval(&self) -> Duration {
        Duration::from_millis(self.action_poll_interval_ms)
    }

    /// Maximum time to wait for an action
    pub fn action_timeout(&self) -> Duration {
        Duration::from_secs(self.action_timeout_secs)
    }
}
