//! Block storage volumes

use crate::client::Client;
use crate::error::Result;
use crate::types::Region;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

const VOLUMES_PATH: &str = "/v2/volumes";

/// A block storage volume
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Volume {
    pub id: String,
    pub name: String,
    pub description: String,
    pub region: Region,
    pub droplet_ids: Vec<u64>,
    pub size_gigabytes: u64,
    pub filesystem_type: String,
    pub tags: Vec<String>,
    pub created_at: Option<DateTime<Utc>>,
}

/// Request body for creating a volume
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VolumeCreateRequest {
    pub name: String,
    pub region: String,
    pub size_gigabytes: u64,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub snapshot_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filesystem_type: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
}

/// Volume operations
#[async_trait]
pub trait VolumesService: Send + Sync {
    async fn list(&self) -> Result<Vec<Volume>>;
    async fn get(&self, id: &str) -> Result<Volume>;
    async fn create(&self, request: &VolumeCreateRequest) -> Result<Volume>;
    async fn delete(&self, id: &str) -> Result<()>;
}

/// Volume service backed by the API client
#[derive(Debug, Clone)]
pub struct Volumes {
    client: Arc<Client>,
}

impl Volumes {
    pub fn new(client: Arc<Client>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl VolumesService for Volumes {
    async fn list(&self) -> Result<Vec<Volume>> {
        self.client.list_all(VOLUMES_PATH, "volumes", &[]).await
    }

    async fn get(&self, id: &str) -> Result<Volume> {
        self.client
            .get_resource(&format!("{VOLUMES_PATH}/{id}"), "volume")
            .await
    }

    async fn create(&self, request: &VolumeCreateRequest) -> Result<Volume> {
        let (volume, _links) = self
            .client
            .post_resource(VOLUMES_PATH, "volume", request)
            .await?;
        Ok(volume)
    }

    async fn delete(&self, id: &str) -> Result<()> {
        self.client
            .delete(&format!("{VOLUMES_PATH}/{id}"), &[])
            .await
    }
}
