//! Images
//!
//! Every image listing takes a `public` switch. When it is off, public
//! images are removed from the merged result after all pages arrive.

use crate::client::Client;
use crate::error::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

const IMAGES_PATH: &str = "/v2/images";

/// An image: distribution, application, snapshot or backup
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Image {
    pub id: u64,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub distribution: String,
    pub slug: Option<String>,
    pub public: bool,
    pub regions: Vec<String>,
    pub min_disk_size: u64,
    pub size_gigabytes: f64,
    pub status: String,
    pub created_at: Option<DateTime<Utc>>,
}

/// Which images a listing covers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImageKind {
    #[default]
    All,
    Distribution,
    Application,
    User,
}

impl ImageKind {
    /// Server-side filter for this kind
    fn filter(self) -> Option<(&'static str, &'static str)> {
        match self {
            Self::All => None,
            Self::Distribution => Some(("type", "distribution")),
            Self::Application => Some(("type", "application")),
            Self::User => Some(("private", "true")),
        }
    }
}

/// Request body for renaming an image
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageUpdateRequest {
    pub name: String,
}

/// Image operations
///
/// The `public` argument of the list methods is a filter, not a hint to the
/// server: with `public == false` every image whose `public` field is set
/// is dropped from the aggregated result, so only private images (user
/// snapshots, backups, custom images) remain. Pass `true` for the API's
/// full listing.
#[async_trait]
pub trait ImagesService: Send + Sync {
    async fn list(&self, public: bool) -> Result<Vec<Image>>;
    async fn list_distribution(&self, public: bool) -> Result<Vec<Image>>;
    async fn list_application(&self, public: bool) -> Result<Vec<Image>>;
    async fn list_user(&self, public: bool) -> Result<Vec<Image>>;
    async fn get_by_id(&self, id: u64) -> Result<Image>;
    async fn get_by_slug(&self, slug: &str) -> Result<Image>;
    async fn update(&self, id: u64, request: &ImageUpdateRequest) -> Result<Image>;
    async fn delete(&self, id: u64) -> Result<()>;
}

/// Image service backed by the API client
#[derive(Debug, Clone)]
pub struct Images {
    client: Arc<Client>,
}

impl Images {
    pub fn new(client: Arc<Client>) -> Self {
        Self { client }
    }

    /// List images of one kind
    pub async fn list_kind(&self, kind: ImageKind, public: bool) -> Result<Vec<Image>> {
        let query: Vec<(&str, &str)> = kind.filter().into_iter().collect();
        let images: Vec<Image> = self.client.list_all(IMAGES_PATH, "images", &query).await?;
        Ok(retain_public(images, public))
    }
}

/// Drop public images unless `public` is set
pub fn retain_public(images: Vec<Image>, public: bool) -> Vec<Image> {
    if public {
        return images;
    }
    images.into_iter().filter(|image| !image.public).collect()
}

#[async_trait]
impl ImagesService for Images {
    async fn list(&self, public: bool) -> Result<Vec<Image>> {
        self.list_kind(ImageKind::All, public).await
    }

    async fn list_distribution(&self, public: bool) -> Result<Vec<Image>> {
        self.list_kind(ImageKind::Distribution, public).await
    }

    async fn list_application(&self, public: bool) -> Result<Vec<Image>> {
        self.list_kind(ImageKind::Application, public).await
    }

    async fn list_user(&self, public: bool) -> Result<Vec<Image>> {
        self.list_kind(ImageKind::User, public).await
    }

    async fn get_by_id(&self, id: u64) -> Result<Image> {
        self.client
            .get_resource(&format!("{IMAGES_PATH}/{id}"), "image")
            .await
    }

    async fn get_by_slug(&self, slug: &str) -> Result<Image> {
        self.client
            .get_resource(&format!("{IMAGES_PATH}/{slug}"), "image")
            .await
    }

    async fn update(&self, id: u64, request: &ImageUpdateRequest) -> Result<Image> {
        self.client
            .put_resource(&format!("{IMAGES_PATH}/{id}"), "image", request)
            .await
    }

    async fn delete(&self, id: u64) -> Result<()> {
        self.client.delete(&format!("{IMAGES_PATH}/{id}"), &[]).await
    }
}
