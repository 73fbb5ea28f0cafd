//! HTTP client module
//!
//! Transport for all API calls. Retries, backoff and rate limiting live
//! here; the pagination aggregator never retries a page itself.

mod client;
mod rate_limit;

pub use client::{HttpClient, HttpClientConfig, HttpClientConfigBuilder, Rate, RequestConfig};
pub use rate_limit::{RateLimiter, RateLimiterConfig};
