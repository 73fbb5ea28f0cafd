//! Authenticator implementation

use super::types::AuthConfig;
use reqwest::RequestBuilder;

/// Applies authentication to HTTP requests
#[derive(Debug, Clone, Default)]
pub struct Authenticator {
    config: AuthConfig,
}

impl Authenticator {
    /// Create a new authenticator with the given config
    pub fn new(config: AuthConfig) -> Self {
        Self { config }
    }

    /// Apply authentication to a request builder
    pub fn apply(&self, req: RequestBuilder) -> RequestBuilder {
        match &self.config {
            AuthConfig::None => req,
            AuthConfig::Bearer { token } => req.bearer_auth(token),
        }
    }

    /// Whether requests will carry credentials
    pub fn is_authenticated(&self) -> bool {
        !matches!(self.config, AuthConfig::None)
    }
}
