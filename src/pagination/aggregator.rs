//! List-all aggregation
//!
//! Fetches the first page, reads the last page number from its links, then
//! fetches the remaining pages concurrently and collects every item pushed
//! into the shared sink.

use super::types::{Links, ListOptions, PageSink, PaginationConfig, FIRST_PAGE};
use crate::error::{Error, Result};
use futures::stream::{FuturesUnordered, StreamExt};
use std::future::Future;
use tracing::{debug, warn};
use url::Url;

/// Fetch every page of a listing and return all items
///
/// `fetch` is called once per page with that page's selector and a sink.
/// It pushes the page's items into the sink and returns the response links.
/// It must be safe to call concurrently for distinct pages.
///
/// The first failure to complete is returned. Once a page has failed no
/// further pages are started, but fetches already in flight are allowed to
/// finish and their items are discarded.
pub async fn paginate<T, F, Fut>(config: &PaginationConfig, fetch: F) -> Result<Vec<T>>
where
    F: Fn(ListOptions, PageSink<T>) -> Fut,
    Fut: Future<Output = Result<Links>>,
{
    let (sink, mut drain) = PageSink::channel();

    let links = fetch_page(&fetch, FIRST_PAGE, config.per_page, &sink).await?;
    let last = last_page(&links)?;
    debug!(last_page = last, "Discovered page count");

    if last > FIRST_PAGE {
        fetch_remaining(&fetch, config, last, &sink).await?;
    }

    drop(sink);
    let mut items = Vec::new();
    while let Ok(item) = drain.try_recv() {
        items.push(item);
    }

    debug!(items = items.len(), pages = last.max(1), "Listing complete");
    Ok(items)
}

/// Fetch a single page
pub async fn fetch_page<T, F, Fut>(
    fetch: &F,
    page: u32,
    per_page: u32,
    sink: &PageSink<T>,
) -> Result<Links>
where
    F: Fn(ListOptions, PageSink<T>) -> Fut,
    Fut: Future<Output = Result<Links>>,
{
    debug!(page, per_page, "Fetching page");
    fetch(ListOptions::new(page, per_page), sink.clone()).await
}

/// Read the last page number from response links
///
/// Missing links mean a single page. A last link without a numeric `page`
/// query parameter is an error.
pub fn last_page(links: &Links) -> Result<u32> {
    let Some(last) = links
        .pages
        .as_ref()
        .and_then(|p| p.last.as_deref())
        .filter(|l| !l.is_empty())
    else {
        return Ok(FIRST_PAGE);
    };

    let url = Url::parse(last).map_err(|e| Error::pagination(last, e.to_string()))?;
    let page = url
        .query_pairs()
        .find(|(key, _)| key == "page")
        .map(|(_, value)| value.into_owned())
        .ok_or_else(|| Error::pagination(last, "missing page parameter"))?;

    page.parse::<u32>()
        .map_err(|e| Error::pagination(last, format!("invalid page '{page}': {e}")))
}

/// Fan out over pages `2..=last` and wait for every started fetch
async fn fetch_remaining<T, F, Fut>(
    fetch: &F,
    config: &PaginationConfig,
    last: u32,
    sink: &PageSink<T>,
) -> Result<()>
where
    F: Fn(ListOptions, PageSink<T>) -> Fut,
    Fut: Future<Output = Result<Links>>,
{
    let remaining = (last - FIRST_PAGE) as usize;
    let width = config.width(remaining);
    let per_page = config.per_page;

    let mut pending = (FIRST_PAGE + 1)..=last;
    let mut in_flight = FuturesUnordered::new();
    let mut first_error: Option<Error> = None;

    debug!(remaining, width, "Fetching remaining pages");

    loop {
        if first_error.is_none() {
            while in_flight.len() < width {
                let Some(page) = pending.next() else {
                    break;
                };
                in_flight.push(async move {
                    (page, fetch_page(fetch, page, per_page, sink).await)
                });
            }
        }

        match in_flight.next().await {
            Some((_, Ok(_))) => {}
            Some((page, Err(e))) => {
                if first_error.is_none() {
                    warn!(
                        page,
                        in_flight = in_flight.len(),
                        error = %e,
                        "Page fetch failed, waiting for in-flight pages"
                    );
                    first_error = Some(e);
                } else {
                    debug!(page, error = %e, "Discarding additional page failure");
                }
            }
            None => break,
        }
    }

    match first_error {
        Some(e) => Err(e),
        None => Ok(()),
    }
}
