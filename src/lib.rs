// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::unused_self)]
#![allow(clippy::struct_excessive_bools)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::unused_async)]

//! # doclient
//!
//! An async client for the DigitalOcean v2 REST API.
//!
//! ## Features
//!
//! - **Complete listings**: every list operation returns all pages, fetched
//!   concurrently once the first page reveals how many there are
//! - **Typed resources**: droplets, images, sizes, actions and volumes
//! - **Resilient transport**: retry with backoff and optional client-side
//!   rate limiting
//! - **CLI**: the `doclient` binary prints resources as JSON
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use doclient::resources::DropletsService;
//! use doclient::{Client, ClientConfig, Result};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let config = ClientConfig::default().with_env();
//!     let client = Arc::new(Client::new(&config)?);
//!
//!     for droplet in client.droplets().list().await? {
//!         println!("{} {}", droplet.id, droplet.name);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │  Resources: droplets · images · sizes · actions · volumes │
//! └────────────────────────────┬─────────────────────────────┘
//!                              │ list_all(path, root, query)
//! ┌────────────────────────────┴─────────────────────────────┐
//! │  Client ── paginate: page 1 → last page → pages 2..=N    │
//! └────────────────────────────┬─────────────────────────────┘
//!                              │
//! ┌──────────┬─────────────────┴────────┬────────────────────┐
//! │   Auth   │          HTTP            │      Config        │
//! │  Bearer  │ Retry · Backoff · Limits │  YAML · env · CLI  │
//! └──────────┴──────────────────────────┴────────────────────┘
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types
pub mod error;

/// Common types and type aliases
pub mod types;

/// Authentication
pub mod auth;

/// HTTP client with retry and rate limiting
pub mod http;

/// Concurrent page aggregation
pub mod pagination;

/// Client configuration
pub mod config;

/// API client facade
pub mod client;

/// Resource services
pub mod resources;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use client::Client;
pub use config::ClientConfig;
pub use error::{Error, Result};
pub use pagination::{paginate, PaginationConfig};
pub use types::*;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
