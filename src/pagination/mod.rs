//! Pagination module
//!
//! # Overview
//!
//! Every list endpoint returns one page of results plus a `links` object
//! whose `last` URL carries the final page number. [`paginate`] hides that
//! from callers: it fetches page 1, resolves the page count and fetches the
//! rest concurrently through a caller-supplied page fetch function.
//!
//! ```rust,ignore
//! use doclient::pagination::{paginate, PaginationConfig};
//!
//! let items: Vec<u64> = paginate(&PaginationConfig::default(), |opts, sink| async move {
//!     let (ids, links) = fetch_ids(opts.page, opts.per_page).await?;
//!     sink.extend(ids);
//!     Ok(links)
//! })
//! .await?;
//! ```

mod aggregator;
mod types;

pub use aggregator::{fetch_page, last_page, paginate};
pub use types::{
    LinkAction, Links, ListOptions, PageSink, Pages, PaginationConfig, FIRST_PAGE, MAX_PER_PAGE,
};

#[cfg(test)]
mod tests;
