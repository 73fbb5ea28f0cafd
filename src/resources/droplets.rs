//! Droplets
//!
//! Listing endpoints under `/v2/droplets`, including the per-droplet
//! kernel, snapshot, backup and action listings.

use super::actions::{wait_for_action, Action};
use super::images::Image;
use crate::client::Client;
use crate::error::Result;
use crate::pagination::Links;
use crate::types::Region;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, warn};

const DROPLETS_PATH: &str = "/v2/droplets";

// ============================================================================
// Models
// ============================================================================

/// A droplet
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Droplet {
    pub id: u64,
    pub name: String,
    pub memory: u64,
    pub vcpus: u32,
    pub disk: u64,
    pub locked: bool,
    pub status: String,
    pub region: Region,
    pub image: Option<Image>,
    pub size_slug: String,
    pub backup_ids: Vec<u64>,
    pub snapshot_ids: Vec<u64>,
    pub features: Vec<String>,
    pub networks: Networks,
    pub kernel: Option<Kernel>,
    pub tags: Vec<String>,
    pub volume_ids: Vec<String>,
    pub created_at: Option<DateTime<Utc>>,
}

/// Network interface kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InterfaceType {
    Public,
    Private,
}

impl Droplet {
    /// First IPv4 address of each interface type
    pub fn ip_table(&self) -> HashMap<InterfaceType, String> {
        let mut table = HashMap::new();
        for network in &self.networks.v4 {
            let kind = match network.kind.as_str() {
                "public" => InterfaceType::Public,
                "private" => InterfaceType::Private,
                _ => continue,
            };
            table
                .entry(kind)
                .or_insert_with(|| network.ip_address.clone());
        }
        table
    }

    /// Public IPv4 address, if assigned
    pub fn public_ipv4(&self) -> Option<String> {
        self.ip_table().remove(&InterfaceType::Public)
    }

    /// Private IPv4 address, if assigned
    pub fn private_ipv4(&self) -> Option<String> {
        self.ip_table().remove(&InterfaceType::Private)
    }
}

/// Droplet networks
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Networks {
    pub v4: Vec<NetworkV4>,
    pub v6: Vec<NetworkV6>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkV4 {
    pub ip_address: String,
    pub netmask: String,
    pub gateway: String,
    #[serde(rename = "type")]
    pub kind: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkV6 {
    pub ip_address: String,
    pub netmask: u32,
    pub gateway: String,
    #[serde(rename = "type")]
    pub kind: String,
}

/// A kernel available to a droplet
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Kernel {
    pub id: u64,
    pub name: String,
    pub version: String,
}

/// Image to boot a new droplet from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DropletImage {
    Id(u64),
    Slug(String),
}

impl Default for DropletImage {
    fn default() -> Self {
        Self::Slug(String::new())
    }
}

/// Request body for creating one droplet
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DropletCreateRequest {
    pub name: String,
    pub region: String,
    pub size: String,
    pub image: DropletImage,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ssh_keys: Vec<String>,
    #[serde(default)]
    pub backups: bool,
    #[serde(default)]
    pub ipv6: bool,
    #[serde(default)]
    pub private_networking: bool,
    #[serde(default)]
    pub monitoring: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_data: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub volumes: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
}

/// Request body for creating several identical droplets
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DropletMultiCreateRequest {
    pub names: Vec<String>,
    pub region: String,
    pub size: String,
    pub image: DropletImage,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ssh_keys: Vec<String>,
    #[serde(default)]
    pub backups: bool,
    #[serde(default)]
    pub ipv6: bool,
    #[serde(default)]
    pub private_networking: bool,
    #[serde(default)]
    pub monitoring: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_data: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
}

// ============================================================================
// Service
// ============================================================================

/// Droplet operations
#[async_trait]
pub trait DropletsService: Send + Sync {
    async fn list(&self) -> Result<Vec<Droplet>>;
    async fn list_by_tag(&self, tag: &str) -> Result<Vec<Droplet>>;
    async fn get(&self, id: u64) -> Result<Droplet>;
    /// Create a droplet. With `wait`, block until its create action finishes.
    async fn create(&self, request: &DropletCreateRequest, wait: bool) -> Result<Droplet>;
    async fn create_multiple(&self, request: &DropletMultiCreateRequest) -> Result<Vec<Droplet>>;
    async fn delete(&self, id: u64) -> Result<()>;
    async fn delete_by_tag(&self, tag: &str) -> Result<()>;
    async fn kernels(&self, id: u64) -> Result<Vec<Kernel>>;
    async fn snapshots(&self, id: u64) -> Result<Vec<Image>>;
    async fn backups(&self, id: u64) -> Result<Vec<Image>>;
    async fn actions(&self, id: u64) -> Result<Vec<Action>>;
    async fn neighbors(&self, id: u64) -> Result<Vec<Droplet>>;
}

/// Droplet service backed by the API client
#[derive(Debug, Clone)]
pub struct Droplets {
    client: Arc<Client>,
}

impl Droplets {
    pub fn new(client: Arc<Client>) -> Self {
        Self { client }
    }
}

fn droplet_path(id: u64) -> String {
    format!("{DROPLETS_PATH}/{id}")
}

#[async_trait]
impl DropletsService for Droplets {
    async fn list(&self) -> Result<Vec<Droplet>> {
        self.client.list_all(DROPLETS_PATH, "droplets", &[]).await
    }

    async fn list_by_tag(&self, tag: &str) -> Result<Vec<Droplet>> {
        self.client
            .list_all(DROPLETS_PATH, "droplets", &[("tag_name", tag)])
            .await
    }

    async fn get(&self, id: u64) -> Result<Droplet> {
        self.client.get_resource(&droplet_path(id), "droplet").await
    }

    async fn create(&self, request: &DropletCreateRequest, wait: bool) -> Result<Droplet> {
        let (droplet, links): (Droplet, Links) = self
            .client
            .post_resource(DROPLETS_PATH, "droplet", request)
            .await?;

        if !wait {
            return Ok(droplet);
        }

        let Some(action) = links.action("create") else {
            debug!(droplet_id = droplet.id, "No create action to wait for");
            return Ok(droplet);
        };

        if let Err(e) = wait_for_action(&self.client, &action.href).await {
            warn!(droplet_id = droplet.id, error = %e, "Create action did not complete");
        }

        self.get(droplet.id).await
    }

    async fn create_multiple(&self, request: &DropletMultiCreateRequest) -> Result<Vec<Droplet>> {
        let (droplets, _links): (Vec<Droplet>, Links) = self
            .client
            .post_resource(DROPLETS_PATH, "droplets", request)
            .await?;
        Ok(droplets)
    }

    async fn delete(&self, id: u64) -> Result<()> {
        self.client.delete(&droplet_path(id), &[]).await
    }

    async fn delete_by_tag(&self, tag: &str) -> Result<()> {
        self.client
            .delete(DROPLETS_PATH, &[("tag_name", tag)])
            .await
    }

    async fn kernels(&self, id: u64) -> Result<Vec<Kernel>> {
        let path = format!("{}/kernels", droplet_path(id));
        self.client.list_all(&path, "kernels", &[]).await
    }

    async fn snapshots(&self, id: u64) -> Result<Vec<Image>> {
        let path = format!("{}/snapshots", droplet_path(id));
        self.client.list_all(&path, "snapshots", &[]).await
    }

    async fn backups(&self, id: u64) -> Result<Vec<Image>> {
        let path = format!("{}/backups", droplet_path(id));
        self.client.list_all(&path, "backups", &[]).await
    }

    async fn actions(&self, id: u64) -> Result<Vec<Action>> {
        let path = format!("{}/actions", droplet_path(id));
        self.client.list_all(&path, "actions", &[]).await
    }

    async fn neighbors(&self, id: u64) -> Result<Vec<Droplet>> {
        let path = format!("{}/neighbors", droplet_path(id));
        self.client.list_unpaginated(&path, "droplets").await
    }
}
