//! API client
//!
//! `Client` owns the HTTP transport and the listing settings. Resource
//! services hold an `Arc<Client>` and express every list operation through
//! [`Client::list_all`], the single page fetch adapter shared by all
//! resources.

use crate::auth::AuthConfig;
use crate::config::ClientConfig;
use crate::error::{Error, Result};
use crate::http::{HttpClient, RequestConfig};
use crate::pagination::{paginate, Links, ListOptions, PaginationConfig};
use crate::resources::{Actions, Droplets, Images, Sizes, Volumes};
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// DigitalOcean API client
#[derive(Debug)]
pub struct Client {
    http: HttpClient,
    pagination: PaginationConfig,
    action_poll_interval: Duration,
    action_timeout: Duration,
}

impl Client {
    /// Build a client from validated configuration
    pub fn new(config: &ClientConfig) -> Result<Self> {
        config.validate()?;
        let token = config
            .access_token
            .clone()
            .ok_or_else(|| Error::missing_field("access_token"))?;
        let http = HttpClient::with_auth(config.http_config(), AuthConfig::bearer(token))?;
        debug!(
            api_url = %config.api_url,
            per_page = config.per_page,
            rate_limited = http.has_rate_limiter(),
            "Client ready"
        );

        Ok(Self {
            http,
            pagination: config.pagination_config(),
            action_poll_interval: config.action_poll_interval(),
            action_timeout: config.action_timeout(),
        })
    }

    /// Wrap an existing transport
    pub fn with_http(http: HttpClient, pagination: PaginationConfig) -> Self {
        let defaults = ClientConfig::default();
        Self {
            http,
            pagination,
            action_poll_interval: defaults.action_poll_interval(),
            action_timeout: defaults.action_timeout(),
        }
    }

    /// Set how actions are polled
    #[must_use]
    pub fn with_action_polling(mut self, interval: Duration, timeout: Duration) -> Self {
        self.action_poll_interval = interval;
        self.action_timeout = timeout;
        self
    }

    /// The underlying transport
    pub fn http(&self) -> &HttpClient {
        &self.http
    }

    /// Listing settings
    pub fn pagination(&self) -> &PaginationConfig {
        &self.pagination
    }

    pub fn action_poll_interval(&self) -> Duration {
        self.action_poll_interval
    }

    pub fn action_timeout(&self) -> Duration {
        self.action_timeout
    }

    // ========================================================================
    // Services
    // ========================================================================

    pub fn droplets(self: &Arc<Self>) -> Droplets {
        Droplets::new(Arc::clone(self))
    }

    pub fn images(self: &Arc<Self>) -> Images {
        Images::new(Arc::clone(self))
    }

    pub fn sizes(self: &Arc<Self>) -> Sizes {
        Sizes::new(Arc::clone(self))
    }

    pub fn actions(self: &Arc<Self>) -> Actions {
        Actions::new(Arc::clone(self))
    }

    pub fn volumes(self: &Arc<Self>) -> Volumes {
        Volumes::new(Arc::clone(self))
    }

    // ========================================================================
    // Request helpers
    // ========================================================================

    /// Fetch every page of a list endpoint
    ///
    /// Items are read from `body[root]` of each page; `query` is sent with
    /// every page request in addition to the page selector.
    pub async fn list_all<T>(&self, path: &str, root: &str, query: &[(&str, &str)]) -> Result<Vec<T>>
    where
        T: DeserializeOwned,
    {
        paginate(&self.pagination, move |opts, sink| async move {
            let (items, links) = self.list_page::<T>(path, root, query, opts).await?;
            sink.extend(items);
            Ok(links)
        })
        .await
    }

    /// Fetch one page of a list endpoint
    pub async fn list_page<T>(
        &self,
        path: &str,
        root: &str,
        query: &[(&str, &str)],
        opts: ListOptions,
    ) -> Result<(Vec<T>, Links)>
    where
        T: DeserializeOwned,
    {
        let config = RequestConfig::new()
            .queries(opts.query())
            .queries(query.iter().copied());
        let mut body: Value = self.http.get_json(path, config).await?;

        let items: Vec<T> = take_field(&mut body, root)?.unwrap_or_default();
        let links: Links = take_field(&mut body, "links")?.unwrap_or_default();
        debug!(path, page = opts.page, items = items.len(), "Decoded page");
        Ok((items, links))
    }

    /// Fetch a list endpoint that is not paginated
    pub async fn list_unpaginated<T>(&self, path: &str, root: &str) -> Result<Vec<T>>
    where
        T: DeserializeOwned,
    {
        let mut body: Value = self.http.get_json(path, RequestConfig::new()).await?;
        Ok(take_field(&mut body, root)?.unwrap_or_default())
    }

    /// GET a single resource wrapped in `{ root: ... }`
    pub async fn get_resource<T>(&self, path: &str, root: &str) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let mut body: Value = self.http.get_json(path, RequestConfig::new()).await?;
        require_field(&mut body, root)
    }

    /// POST a request body and return the created resource plus response links
    pub async fn post_resource<T, B>(&self, path: &str, root: &str, request: &B) -> Result<(T, Links)>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let config = RequestConfig::new().json(serde_json::to_value(request)?);
        let mut body: Value = self.http.request_json(Method::POST, path, config).await?;
        let resource = require_field(&mut body, root)?;
        let links = take_field(&mut body, "links")?.unwrap_or_default();
        Ok((resource, links))
    }

    /// PUT a request body and return the updated resource
    pub async fn put_resource<T, B>(&self, path: &str, root: &str, request: &B) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let config = RequestConfig::new().json(serde_json::to_value(request)?);
        let mut body: Value = self.http.request_json(Method::PUT, path, config).await?;
        require_field(&mut body, root)
    }

    /// DELETE a resource
    pub async fn delete(&self, path: &str, query: &[(&str, &str)]) -> Result<()> {
        let config = RequestConfig::new().queries(query.iter().copied());
        self.http.delete(path, config).await
    }
}

/// Remove and decode `body[key]`; a missing or null field is `None`
fn take_field<T: DeserializeOwned>(body: &mut Value, key: &str) -> Result<Option<T>> {
    match body.get_mut(key).map(Value::take) {
        None | Some(Value::Null) => Ok(None),
        Some(value) => serde_json::from_value(value)
            .map(Some)
            .map_err(|e| Error::decode(format!("invalid '{key}' in response: {e}"))),
    }
}

fn require_field<T: DeserializeOwned>(body: &mut Value, key: &str) -> Result<T> {
    take_field(body, key)?.ok_or_else(|| Error::decode(format!("response is missing '{key}'")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_take_field() {
        let mut body = json!({"sizes": [1, 2], "links": null});

        let sizes: Option<Vec<u32>> = take_field(&mut body, "sizes").unwrap();
        assert_eq!(sizes, Some(vec![1, 2]));

        let links: Option<Links> = take_field(&mut body, "links").unwrap();
        assert!(links.is_none());

        let missing: Option<Vec<u32>> = take_field(&mut body, "droplets").unwrap();
        assert!(missing.is_none());
    }

    #[test]
    fn test_take_field_decode_error() {
        let mut body = json!({"sizes": "not a list"});
        let result: Result<Option<Vec<u32>>> = take_field(&mut body, "sizes");
        assert!(matches!(result, Err(Error::Decode { .. })));
    }

    #[test]
    fn test_require_field_missing() {
        let mut body = json!({});
        let result: Result<u32> = require_field(&mut body, "droplet");
        let err = result.unwrap_err();
        assert_eq!(
            err.to_string(),
            "Failed to decode response: response is missing 'droplet'"
        );
    }

    #[test]
    fn test_new_requires_token() {
        let err = Client::new(&ClientConfig::default()).unwrap_err();
        assert!(matches!(err, Error::MissingConfigField { .. }));
    }

    #[test]
    fn test_new_from_config() {
        let config = ClientConfig {
            per_page: 50,
            max_concurrency: Some(3),
            ..ClientConfig::with_token("t")
        };
        let client = Client::new(&config).unwrap();
        assert_eq!(client.pagination().per_page, 50);
        assert_eq!(client.pagination().max_concurrency, Some(3));
        assert_eq!(client.action_poll_interval(), Duration::from_secs(5));
    }
}
