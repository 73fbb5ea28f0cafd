//! Pagination types
//!
//! Page selectors, the link metadata returned with every list response,
//! and the sink that page fetches push decoded items into.

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

/// Page number of the first page of any listing
pub const FIRST_PAGE: u32 = 1;

/// Largest page size the API accepts
pub const MAX_PER_PAGE: u32 = 200;

/// Selects one page of a listing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListOptions {
    /// 1-based page number
    pub page: u32,
    /// Items per page
    pub per_page: u32,
}

impl ListOptions {
    /// Create a page selector
    pub fn new(page: u32, per_page: u32) -> Self {
        Self { page, per_page }
    }

    /// Query parameters for this selector
    pub fn query(&self) -> [(&'static str, String); 2] {
        [
            ("page", self.page.to_string()),
            ("per_page", self.per_page.to_string()),
        ]
    }
}

impl Default for ListOptions {
    fn default() -> Self {
        Self::new(FIRST_PAGE, MAX_PER_PAGE)
    }
}

/// Navigation links from the `links` object of an API response
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Links {
    /// Page navigation, absent on single-page listings
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pages: Option<Pages>,
    /// Actions started by the request (e.g. droplet create)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub actions: Vec<LinkAction>,
}

impl Links {
    /// Links pointing at a last page URL
    pub fn with_last(last: impl Into<String>) -> Self {
        Self {
            pages: Some(Pages {
                last: Some(last.into()),
                ..Default::default()
            }),
            actions: Vec::new(),
        }
    }

    /// Find the action link with the given rel
    pub fn action(&self, rel: &str) -> Option<&LinkAction> {
        self.actions.iter().find(|a| a.rel == rel)
    }
}

/// Page URLs
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pages {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prev: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last: Option<String>,
}

/// Link to an action triggered by a request
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkAction {
    #[serde(default)]
    pub id: u64,
    #[serde(default)]
    pub rel: String,
    #[serde(default)]
    pub href: String,
}

/// Tuning for a list-all call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginationConfig {
    /// Items requested per page
    pub per_page: u32,
    /// Maximum concurrent page fetches after the first page. `None` fetches
    /// every remaining page at once, which trusts the page count in the
    /// server's `last` link: a link naming page 4000000000 queues that many
    /// fetches. Set a cap when talking to an untrusted endpoint.
    pub max_concurrency: Option<usize>,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            per_page: MAX_PER_PAGE,
            max_concurrency: None,
        }
    }
}

impl PaginationConfig {
    /// Create a config with the given page size and no concurrency cap
    pub fn new(per_page: u32) -> Self {
        Self {
            per_page,
            max_concurrency: None,
        }
    }

    /// Cap the number of concurrent page fetches
    #[must_use]
    pub fn with_max_concurrency(mut self, max: usize) -> Self {
        self.max_concurrency = Some(max);
        self
    }

    /// Number of fetches allowed in flight for `remaining` outstanding pages
    pub fn width(&self, remaining: usize) -> usize {
        match self.max_concurrency {
            Some(max) => max.clamp(1, remaining.max(1)),
            None => remaining.max(1),
        }
    }
}

/// Many-producer handle that page fetches push decoded items into
///
/// Pushes never block. Items pushed through one handle arrive in push order.
pub struct PageSink<T> {
    tx: mpsc::UnboundedSender<T>,
}

impl<T> PageSink<T> {
    /// Create a sink and the receiver that drains it
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<T>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    /// Push one item
    pub fn push(&self, item: T) {
        // The receiver only closes once the listing is over; late items are dropped.
        let _ = self.tx.send(item);
    }

    /// Push every item of a page, in order
    pub fn extend(&self, items: impl IntoIterator<Item = T>) {
        for item in items {
            self.push(item);
        }
    }
}

impl<T> Clone for PageSink<T> {
    fn clone(&self) -> Self {
        Self {
            tx: self.tx.clone(),
        }
    }
}

impl<T> std::fmt::Debug for PageSink<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PageSink")
            .field("closed", &self.tx.is_closed())
            .finish()
    }
}
