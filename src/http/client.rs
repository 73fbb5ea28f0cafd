//! HTTP client with retry and rate limiting
//!
//! The transport under every API call. One attempt is made by `send`,
//! which turns the response into either a `Response` or a classified
//! `Error`; `request` retries whatever `Error::is_retryable` accepts.
//!
//! DigitalOcean specifics handled here:
//! - error bodies `{"id": ..., "message": ...}` become `Error::HttpStatus`
//! - `ratelimit-*` headers are recorded and drive the wait after a 429

use super::rate_limit::{RateLimiter, RateLimiterConfig};
use crate::auth::{AuthConfig, Authenticator};
use crate::error::{Error, Result};
use crate::types::BackoffType;
use chrono::{DateTime, TimeZone, Utc};
use reqwest::header::HeaderMap;
use reqwest::{Client, Method, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;
use tracing::{debug, warn};

/// Wait after a 429 that carries no usable reset hint
const DEFAULT_RETRY_AFTER_SECS: u64 = 60;

/// Configuration for the HTTP client
#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    /// Base URL that relative paths are joined to
    pub base_url: Option<String>,
    /// Request timeout
    pub timeout: Duration,
    /// Maximum number of retries
    pub max_retries: u32,
    /// Initial delay for backoff
    pub initial_backoff: Duration,
    /// Upper bound for any retry delay, including 429 waits
    pub max_backoff: Duration,
    /// Type of backoff strategy
    pub backoff_type: BackoffType,
    /// Client-side rate limit
    pub rate_limit: Option<RateLimiterConfig>,
    /// Headers sent with every request
    pub default_headers: HashMap<String, String>,
    pub user_agent: String,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            timeout: Duration::from_secs(30),
            max_retries: 3,
            initial_backoff: Duration::from_millis(100),
            max_backoff: Duration::from_secs(60),
            backoff_type: BackoffType::Exponential,
            rate_limit: None,
            default_headers: HashMap::new(),
            user_agent: format!("doclient/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl HttpClientConfig {
    pub fn builder() -> HttpClientConfigBuilder {
        HttpClientConfigBuilder::default()
    }
}

/// Builder for HTTP client config
#[derive(Default)]
pub struct HttpClientConfigBuilder {
    config: HttpClientConfig,
}

impl HttpClientConfigBuilder {
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.config.base_url = Some(url.into());
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    pub fn max_retries(mut self, retries: u32) -> Self {
        self.config.max_retries = retries;
        self
    }

    /// Set backoff strategy and its bounds
    pub fn backoff(mut self, backoff_type: BackoffType, initial: Duration, max: Duration) -> Self {
        self.config.backoff_type = backoff_type;
        self.config.initial_backoff = initial;
        self.config.max_backoff = max;
        self
    }

    pub fn rate_limit(mut self, config: RateLimiterConfig) -> Self {
        self.config.rate_limit = Some(config);
        self
    }

    /// Add a default header
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.config.default_headers.insert(key.into(), value.into());
        self
    }

    pub fn build(self) -> HttpClientConfig {
        self.config
    }
}

/// Query and body for a single request
#[derive(Debug, Clone, Default)]
pub struct RequestConfig {
    /// Query parameters, sent in insertion order
    pub query: Vec<(String, String)>,
    /// JSON body
    pub body: Option<Value>,
}

impl RequestConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a query parameter
    #[must_use]
    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    /// Add several query parameters
    #[must_use]
    pub fn queries<K, V>(mut self, params: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.query
            .extend(params.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    /// Set JSON body
    #[must_use]
    pub fn json(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }
}

/// API request quota reported by the `ratelimit-*` response headers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rate {
    /// Requests allowed per window
    pub limit: u32,
    /// Requests left in the current window
    pub remaining: u32,
    /// When the window resets
    pub reset: DateTime<Utc>,
}

impl Rate {
    /// Parse the quota headers; `None` unless all three are present
    pub fn from_headers(headers: &HeaderMap) -> Option<Self> {
        let limit = header_value(headers, "ratelimit-limit")?;
        let remaining = header_value(headers, "ratelimit-remaining")?;
        let reset = header_value::<i64>(headers, "ratelimit-reset")?;
        Some(Self {
            limit,
            remaining,
            reset: Utc.timestamp_opt(reset, 0).single()?,
        })
    }
}

/// Error document returned by the API
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ApiErrorBody {
    id: String,
    message: String,
}

/// Build an `Error::HttpStatus`, decoding the API error document when present
pub(crate) fn api_error(status: u16, body: &str) -> Error {
    match serde_json::from_str::<ApiErrorBody>(body) {
        Ok(parsed) if !parsed.message.is_empty() || !parsed.id.is_empty() => {
            Error::api(status, parsed.id, parsed.message)
        }
        _ => Error::api(status, "", body.trim()),
    }
}

/// Seconds to wait after a 429
///
/// `retry-after` wins; otherwise the distance to `ratelimit-reset`, at least
/// one second once the reset is known.
pub(crate) fn retry_after_secs(headers: &HeaderMap, now: DateTime<Utc>) -> u64 {
    if let Some(secs) = header_value::<u64>(headers, "retry-after") {
        return secs;
    }
    match header_value::<i64>(headers, "ratelimit-reset") {
        Some(reset) => (reset - now.timestamp()).max(1) as u64,
        None => DEFAULT_RETRY_AFTER_SECS,
    }
}

fn header_value<T: std::str::FromStr>(headers: &HeaderMap, name: &str) -> Option<T> {
    headers.get(name)?.to_str().ok()?.trim().parse().ok()
}

/// HTTP client with retry and rate limiting
pub struct HttpClient {
    client: Client,
    config: HttpClientConfig,
    authenticator: Authenticator,
    rate_limiter: Option<RateLimiter>,
    last_rate: Mutex<Option<Rate>>,
}

impl HttpClient {
    /// Create an unauthenticated client
    pub fn with_config(config: HttpClientConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .build()?;

        let rate_limiter = config.rate_limit.as_ref().map(RateLimiter::new);

        Ok(Self {
            client,
            config,
            authenticator: Authenticator::default(),
            rate_limiter,
            last_rate: Mutex::new(None),
        })
    }

    /// Create a client that authenticates every request
    pub fn with_auth(config: HttpClientConfig, auth_config: AuthConfig) -> Result<Self> {
        let mut client = Self::with_config(config)?;
        client.authenticator = Authenticator::new(auth_config);
        Ok(client)
    }

    /// Make a request, retrying transient failures
    pub async fn request(&self, method: Method, path: &str, config: RequestConfig) -> Result<Response> {
        let url = self.build_url(path);
        let max_retries = self.config.max_retries;
        let mut attempt = 0;

        loop {
            self.throttle().await;

            match self.send(&method, &url, &config).await {
                Ok(response) => return Ok(response),
                Err(e) if e.is_retryable() && attempt < max_retries => {
                    let delay = self.retry_delay(&e, attempt);
                    warn!(
                        %method,
                        url = %url,
                        attempt = attempt + 1,
                        max_attempts = max_retries + 1,
                        delay_ms = delay.as_millis() as u64,
                        error = %e,
                        "Request failed, retrying"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }

    /// Make a request and decode the JSON response
    pub async fn request_json<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        config: RequestConfig,
    ) -> Result<T> {
        let response = self.request(method, path, config).await?;
        let json: T = response.json().await?;
        Ok(json)
    }

    /// GET and decode the JSON response
    pub async fn get_json<T: DeserializeOwned>(&self, path: &str, config: RequestConfig) -> Result<T> {
        self.request_json(Method::GET, path, config).await
    }

    /// DELETE, ignoring the (empty) response body
    pub async fn delete(&self, path: &str, config: RequestConfig) -> Result<()> {
        self.request(Method::DELETE, path, config).await?;
        Ok(())
    }

    /// Quota reported by the most recent response
    pub fn rate(&self) -> Option<Rate> {
        self.last_rate.lock().ok().and_then(|rate| *rate)
    }

    pub fn has_rate_limiter(&self) -> bool {
        self.rate_limiter.is_some()
    }

    /// Backoff delay before retry number `attempt + 1`
    pub fn calculate_backoff(&self, attempt: u32) -> Duration {
        let delay = match self.config.backoff_type {
            BackoffType::Constant => self.config.initial_backoff,
            BackoffType::Linear => self.config.initial_backoff * (attempt + 1),
            BackoffType::Exponential => {
                let factor = 2u32.saturating_pow(attempt);
                self.config.initial_backoff * factor
            }
        };

        std::cmp::min(delay, self.config.max_backoff)
    }

    /// One attempt: send and classify the outcome
    async fn send(&self, method: &Method, url: &str, config: &RequestConfig) -> Result<Response> {
        let mut req = self.client.request(method.clone(), url);

        for (key, value) in &self.config.default_headers {
            req = req.header(key.as_str(), value.as_str());
        }
        if !config.query.is_empty() {
            req = req.query(&config.query);
        }
        if let Some(ref body) = config.body {
            req = req.json(body);
        }
        req = self.authenticator.apply(req);

        let response = req.send().await.map_err(|e| {
            if e.is_timeout() {
                Error::Timeout {
                    timeout_ms: self.config.timeout.as_millis() as u64,
                }
            } else {
                Error::Http(e)
            }
        })?;

        self.record_rate(response.headers());

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(Error::RateLimited {
                retry_after_seconds: retry_after_secs(response.headers(), Utc::now()),
            });
        }
        if status.is_client_error() || status.is_server_error() {
            let body = response.text().await.unwrap_or_default();
            return Err(api_error(status.as_u16(), &body));
        }

        debug!(%method, url, status = status.as_u16(), "Request succeeded");
        Ok(response)
    }

    async fn throttle(&self) {
        if let Some(ref limiter) = self.rate_limiter {
            if !limiter.try_acquire() {
                debug!("Client-side rate limit reached, waiting");
                limiter.wait().await;
            }
        }
    }

    fn record_rate(&self, headers: &HeaderMap) {
        let Some(rate) = Rate::from_headers(headers) else {
            return;
        };
        if rate.remaining == 0 {
            warn!(limit = rate.limit, reset = %rate.reset, "API rate limit exhausted");
        }
        if let Ok(mut last) = self.last_rate.lock() {
            *last = Some(rate);
        }
    }

    fn retry_delay(&self, error: &Error, attempt: u32) -> Duration {
        match error {
            Error::RateLimited {
                retry_after_seconds,
            } => Duration::from_secs(*retry_after_seconds).min(self.config.max_backoff),
            _ => self.calculate_backoff(attempt),
        }
    }

    /// Join a relative path to the base URL; absolute URLs pass through
    fn build_url(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            return path.to_string();
        }

        match &self.config.base_url {
            Some(base) => {
                let base = base.trim_end_matches('/');
                let path = path.trim_start_matches('/');
                format!("{base}/{path}")
            }
            None => path.to_string(),
        }
    }
}

impl std::fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpClient")
            .field("config", &self.config)
            .field("authenticated", &self.authenticator.is_authenticated())
            .field("has_rate_limiter", &self.rate_limiter.is_some())
            .finish_non_exhaustive()
    }
}
