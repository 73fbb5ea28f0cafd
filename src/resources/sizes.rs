//! Droplet sizes

use crate::client::Client;
use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

const SIZES_PATH: &str = "/v2/sizes";

/// A droplet size plan
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Size {
    pub slug: String,
    pub memory: u64,
    pub vcpus: u32,
    pub disk: u64,
    pub transfer: f64,
    pub price_monthly: f64,
    pub price_hourly: f64,
    pub regions: Vec<String>,
    pub available: bool,
    pub description: String,
}

#[async_trait]
pub trait SizesService: Send + Sync {
    async fn list(&self) -> Result<Vec<Size>>;
}

/// Size service backed by the API client
#[derive(Debug, Clone)]
pub struct Sizes {
    client: Arc<Client>,
}

impl Sizes {
    pub fn new(client: Arc<Client>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl SizesService for Sizes {
    async fn list(&self) -> Result<Vec<Size>> {
        self.client.list_all(SIZES_PATH, "sizes", &[]).await
    }
}
