//! Actions
//!
//! Long-running operations (create, resize, snapshot) report progress
//! through an action resource that is polled until it settles.

use crate::client::Client;
use crate::error::{Error, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::time::{sleep, Instant};
use tracing::debug;

const ACTIONS_PATH: &str = "/v2/actions";

/// Action lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ActionStatus {
    InProgress,
    Completed,
    Errored,
    #[default]
    #[serde(other)]
    Unknown,
}

/// An action performed on a resource
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Action {
    pub id: u64,
    pub status: ActionStatus,
    #[serde(rename = "type")]
    pub kind: String,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub resource_id: u64,
    pub resource_type: String,
    pub region_slug: Option<String>,
}

#[async_trait]
pub trait ActionsService: Send + Sync {
    async fn list(&self) -> Result<Vec<Action>>;
    async fn get(&self, id: u64) -> Result<Action>;
}

/// Action service backed by the API client
#[derive(Debug, Clone)]
pub struct Actions {
    client: Arc<Client>,
}

impl Actions {
    pub fn new(client: Arc<Client>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ActionsService for Actions {
    async fn list(&self) -> Result<Vec<Action>> {
        self.client.list_all(ACTIONS_PATH, "actions", &[]).await
    }

    async fn get(&self, id: u64) -> Result<Action> {
        self.client
            .get_resource(&format!("{ACTIONS_PATH}/{id}"), "action")
            .await
    }
}

/// Poll the action at `href` until it completes
///
/// `href` may be absolute (as found in response links) or relative to the
/// client's base URL. Polls every `Client::action_poll_interval` and gives
/// up after `Client::action_timeout`.
pub async fn wait_for_action(client: &Client, href: &str) -> Result<Action> {
    let started = Instant::now();
    let deadline = started + client.action_timeout();

    loop {
        let action: Action = client.get_resource(href, "action").await?;
        debug!(action_id = action.id, status = ?action.status, "Polled action");

        match action.status {
            ActionStatus::Completed => return Ok(action),
            ActionStatus::Errored => {
                return Err(Error::ActionFailed {
                    id: action.id,
                    status: "errored".to_string(),
                })
            }
            ActionStatus::InProgress | ActionStatus::Unknown => {}
        }

        if Instant::now() + client.action_poll_interval() > deadline {
            return Err(Error::WaitTimeout {
                href: href.to_string(),
                waited_secs: started.elapsed().as_secs(),
            });
        }
        sleep(client.action_poll_interval()).await;
    }
}
