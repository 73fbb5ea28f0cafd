//! Tests for pagination module

use super::*;
use crate::error::{Error, Result};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;
use test_case::test_case;

fn last_link(page: u32) -> Links {
    Links::with_last(format!("http://example.com/?page={page}"))
}

fn page_error(page: u32) -> Error {
    Error::Other(format!("page {page} failed"))
}

// ============================================================================
// Type Tests
// ============================================================================

#[test]
fn test_list_options_default() {
    let opts = ListOptions::default();
    assert_eq!(opts.page, 1);
    assert_eq!(opts.per_page, 200);
}

#[test]
fn test_list_options_query() {
    let opts = ListOptions::new(3, 50);
    let query = opts.query();
    assert_eq!(query[0], ("page", "3".to_string()));
    assert_eq!(query[1], ("per_page", "50".to_string()));
}

#[test]
fn test_pagination_config_width() {
    let unbounded = PaginationConfig::default();
    assert_eq!(unbounded.width(9), 9);
    assert_eq!(unbounded.width(0), 1);

    let capped = PaginationConfig::default().with_max_concurrency(4);
    assert_eq!(capped.width(9), 4);
    assert_eq!(capped.width(2), 2);

    let zero = PaginationConfig::default().with_max_concurrency(0);
    assert_eq!(zero.width(9), 1);
}

#[test]
fn test_links_deserialize_digitalocean_shape() {
    let links: Links = serde_json::from_value(serde_json::json!({
        "pages": {
            "next": "https://api.digitalocean.com/v2/droplets?page=2&per_page=1",
            "last": "https://api.digitalocean.com/v2/droplets?page=3&per_page=1"
        }
    }))
    .unwrap();

    let pages = links.pages.as_ref().unwrap();
    assert!(pages.first.is_none());
    assert_eq!(
        pages.last.as_deref(),
        Some("https://api.digitalocean.com/v2/droplets?page=3&per_page=1")
    );
    assert!(links.actions.is_empty());
}

#[test]
fn test_links_action_lookup() {
    let links: Links = serde_json::from_value(serde_json::json!({
        "actions": [
            {"id": 7, "rel": "power_on", "href": "https://api.example.com/v2/actions/7"},
            {"id": 8, "rel": "create", "href": "https://api.example.com/v2/actions/8"}
        ]
    }))
    .unwrap();

    assert_eq!(links.action("create").map(|a| a.id), Some(8));
    assert!(links.action("delete").is_none());
}

#[test]
fn test_page_sink_preserves_push_order() {
    let (sink, mut drain) = PageSink::channel();
    let other = sink.clone();

    sink.extend([1, 2, 3]);
    other.push(4);

    let mut items = Vec::new();
    while let Ok(item) = drain.try_recv() {
        items.push(item);
    }
    assert_eq!(items, vec![1, 2, 3, 4]);
}

// ============================================================================
// last_page Tests
// ============================================================================

#[test_case("http://example.com/?page=1" => Some(1) ; "first page")]
#[test_case("http://example.com/?page=5" => Some(5) ; "fifth page")]
#[test_case("https://api.digitalocean.com/v2/droplets?page=12&per_page=200" => Some(12) ; "page before per page")]
#[test_case("https://api.digitalocean.com/v2/droplets?per_page=200&page=3" => Some(3) ; "page after per page")]
#[test_case("" => Some(1) ; "empty link")]
#[test_case("http://example.com/" => None ; "missing page param")]
#[test_case("http://example.com/?per_page=20" => None ; "only per page")]
#[test_case("http://example.com/?page=five" => None ; "non numeric page")]
#[test_case("http://example.com/?page=-2" => None ; "negative page")]
#[test_case("/v2/droplets?page=2" => None ; "relative url")]
fn test_last_page_from_link(link: &str) -> Option<u32> {
    last_page(&Links::with_last(link)).ok()
}

#[test]
fn test_last_page_without_links() {
    assert_eq!(last_page(&Links::default()).unwrap(), 1);

    let no_last = Links {
        pages: Some(Pages::default()),
        actions: Vec::new(),
    };
    assert_eq!(last_page(&no_last).unwrap(), 1);
}

#[test]
fn test_last_page_error_names_link() {
    let err = last_page(&Links::with_last("http://example.com/?page=x")).unwrap_err();
    match err {
        Error::Pagination { link, message } => {
            assert_eq!(link, "http://example.com/?page=x");
            assert!(message.contains("invalid page"));
        }
        other => panic!("Expected pagination error, got {other:?}"),
    }
}

// ============================================================================
// fetch_page Tests
// ============================================================================

#[tokio::test]
async fn test_fetch_page_passes_requested_page() {
    let seen = Mutex::new(Vec::new());
    let seen_ref = &seen;
    let fetch = move |opts: ListOptions, sink: PageSink<i32>| async move {
        seen_ref.lock().unwrap().push(opts);
        sink.push(1);
        Ok::<_, Error>(Links::default())
    };

    let (sink, mut drain) = PageSink::channel();
    let links = fetch_page(&fetch, 10, 25, &sink).await.unwrap();

    assert_eq!(links, Links::default());
    assert_eq!(*seen.lock().unwrap(), vec![ListOptions::new(10, 25)]);
    assert_eq!(drain.try_recv().unwrap(), 1);
}

// ============================================================================
// paginate Tests
// ============================================================================

#[tokio::test]
async fn test_paginate_five_pages() {
    let calls = AtomicUsize::new(0);
    let calls_ref = &calls;
    let links = last_link(5);
    let links_ref = &links;

    let items = paginate(&PaginationConfig::default(), move |_opts, sink| {
        calls_ref.fetch_add(1, Ordering::SeqCst);
        let links = links_ref.clone();
        async move {
            sink.push(1);
            Ok(links)
        }
    })
    .await
    .unwrap();

    assert_eq!(items, vec![1; 5]);
    assert_eq!(calls.load(Ordering::SeqCst), 5);
}

#[test_case(1 ; "single page")]
#[test_case(2 ; "two pages")]
#[test_case(7 ; "seven pages")]
#[test_case(30 ; "thirty pages")]
#[tokio::test]
async fn test_paginate_one_item_per_page(last: u32) {
    let calls = AtomicUsize::new(0);
    let calls_ref = &calls;

    let mut items = paginate(&PaginationConfig::default(), move |opts, sink| {
        calls_ref.fetch_add(1, Ordering::SeqCst);
        async move {
            sink.push(opts.page);
            Ok(last_link(last))
        }
    })
    .await
    .unwrap();

    items.sort_unstable();
    assert_eq!(items, (1..=last).collect::<Vec<_>>());
    assert_eq!(calls.load(Ordering::SeqCst), last as usize);
}

#[tokio::test]
async fn test_paginate_without_links_fetches_once() {
    let calls = AtomicUsize::new(0);
    let calls_ref = &calls;

    let items = paginate(&PaginationConfig::default(), move |_opts, sink| {
        calls_ref.fetch_add(1, Ordering::SeqCst);
        async move {
            sink.extend(["a", "b"]);
            Ok(Links::default())
        }
    })
    .await
    .unwrap();

    assert_eq!(items, vec!["a", "b"]);
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_paginate_empty_pages_object_fetches_once() {
    let calls = AtomicUsize::new(0);
    let calls_ref = &calls;

    let items = paginate(&PaginationConfig::default(), move |_opts, sink| {
        calls_ref.fetch_add(1, Ordering::SeqCst);
        async move {
            sink.push(1);
            Ok(Links {
                pages: Some(Pages::default()),
                actions: Vec::new(),
            })
        }
    })
    .await
    .unwrap();

    assert_eq!(items.len(), 1);
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[test_case("http://example.com/" ; "missing page param")]
#[test_case("http://example.com/?page=last" ; "non numeric page")]
#[tokio::test]
async fn test_paginate_malformed_last_link_fails(link: &'static str) {
    let calls = AtomicUsize::new(0);
    let calls_ref = &calls;

    let result: Result<Vec<i32>> = paginate(&PaginationConfig::default(), move |_opts, sink| {
        calls_ref.fetch_add(1, Ordering::SeqCst);
        async move {
            sink.push(1);
            Ok(Links::with_last(link))
        }
    })
    .await;

    assert!(matches!(result, Err(Error::Pagination { .. })));
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_paginate_first_page_failure_starts_nothing_else() {
    let calls = AtomicUsize::new(0);
    let calls_ref = &calls;

    let result: Result<Vec<i32>> = paginate(&PaginationConfig::default(), move |_opts, _sink| {
        calls_ref.fetch_add(1, Ordering::SeqCst);
        async move { Err(Error::api(503, "", "unavailable")) }
    })
    .await;

    assert!(matches!(
        result,
        Err(Error::HttpStatus { status: 503, .. })
    ));
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_paginate_later_page_failure_is_surfaced() {
    let result: Result<Vec<u32>> = paginate(&PaginationConfig::default(), |opts, sink| async move {
        if opts.page == 4 {
            return Err(page_error(4));
        }
        sink.push(opts.page);
        Ok(last_link(6))
    })
    .await;

    let err = result.unwrap_err();
    assert_eq!(err.to_string(), "page 4 failed");
}

#[tokio::test]
async fn test_paginate_failure_waits_for_in_flight_pages() {
    let started = AtomicUsize::new(0);
    let finished = AtomicUsize::new(0);
    let (started_ref, finished_ref) = (&started, &finished);

    let result: Result<Vec<u32>> = paginate(&PaginationConfig::default(), move |opts, sink| {
        started_ref.fetch_add(1, Ordering::SeqCst);
        async move {
            if opts.page == 2 {
                finished_ref.fetch_add(1, Ordering::SeqCst);
                return Err(page_error(2));
            }
            if opts.page > 1 {
                tokio::time::sleep(Duration::from_millis(20)).await;
            }
            sink.push(opts.page);
            finished_ref.fetch_add(1, Ordering::SeqCst);
            Ok(last_link(5))
        }
    })
    .await;

    assert!(result.is_err());
    assert_eq!(started.load(Ordering::SeqCst), 5);
    assert_eq!(finished.load(Ordering::SeqCst), 5);
}

#[tokio::test]
async fn test_paginate_failure_stops_scheduling_new_pages() {
    let calls = Mutex::new(Vec::new());
    let calls_ref = &calls;
    let config = PaginationConfig::default().with_max_concurrency(1);

    let result: Result<Vec<u32>> = paginate(&config, move |opts, sink| {
        calls_ref.lock().unwrap().push(opts.page);
        async move {
            if opts.page == 3 {
                return Err(page_error(3));
            }
            sink.push(opts.page);
            Ok(last_link(8))
        }
    })
    .await;

    assert_eq!(result.unwrap_err().to_string(), "page 3 failed");
    assert_eq!(*calls.lock().unwrap(), vec![1, 2, 3]);
}

#[tokio::test]
async fn test_paginate_first_completed_failure_wins() {
    let result: Result<Vec<u32>> = paginate(&PaginationConfig::default(), |opts, _sink| async move {
        match opts.page {
            1 => Ok(last_link(3)),
            2 => {
                tokio::time::sleep(Duration::from_millis(80)).await;
                Err(page_error(2))
            }
            page => {
                tokio::time::sleep(Duration::from_millis(5)).await;
                Err(page_error(page))
            }
        }
    })
    .await;

    assert_eq!(result.unwrap_err().to_string(), "page 3 failed");
}

#[tokio::test]
async fn test_paginate_respects_concurrency_cap() {
    let active = AtomicUsize::new(0);
    let peak = AtomicUsize::new(0);
    let (active_ref, peak_ref) = (&active, &peak);
    let config = PaginationConfig::default().with_max_concurrency(3);

    let items = paginate(&config, move |opts, sink| async move {
        let now = active_ref.fetch_add(1, Ordering::SeqCst) + 1;
        peak_ref.fetch_max(now, Ordering::SeqCst);
        tokio::time::sleep(Duration::from_millis(5)).await;
        sink.push(opts.page);
        active_ref.fetch_sub(1, Ordering::SeqCst);
        Ok(last_link(10))
    })
    .await
    .unwrap();

    assert_eq!(items.len(), 10);
    assert_eq!(peak.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn test_paginate_unbounded_fetches_all_remaining_at_once() {
    let active = AtomicUsize::new(0);
    let peak = AtomicUsize::new(0);
    let (active_ref, peak_ref) = (&active, &peak);

    let items = paginate(&PaginationConfig::default(), move |opts, sink| async move {
        if opts.page > 1 {
            let now = active_ref.fetch_add(1, Ordering::SeqCst) + 1;
            peak_ref.fetch_max(now, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(10)).await;
            active_ref.fetch_sub(1, Ordering::SeqCst);
        }
        sink.push(opts.page);
        Ok(last_link(6))
    })
    .await
    .unwrap();

    assert_eq!(items.len(), 6);
    assert_eq!(peak.load(Ordering::SeqCst), 5);
}

#[tokio::test]
async fn test_paginate_keeps_order_within_a_page() {
    let items = paginate(&PaginationConfig::default(), |opts, sink| async move {
        // Later pages finish first
        tokio::time::sleep(Duration::from_millis(u64::from(5 - opts.page) * 5)).await;
        sink.extend((0..3).map(|i| (opts.page, i)));
        Ok(last_link(4))
    })
    .await
    .unwrap();

    assert_eq!(items.len(), 12);
    for page in 1..=4 {
        let within: Vec<u32> = items
            .iter()
            .filter(|(p, _)| *p == page)
            .map(|(_, i)| *i)
            .collect();
        assert_eq!(within, vec![0, 1, 2]);
    }
}

#[tokio::test]
async fn test_paginate_identical_adapters_same_items() {
    async fn run() -> Vec<u32> {
        let mut items = paginate(&PaginationConfig::default(), |opts, sink| async move {
            tokio::time::sleep(Duration::from_millis(u64::from(opts.page * 7 % 5))).await;
            sink.extend([opts.page * 100, opts.page * 100 + 1]);
            Ok(last_link(9))
        })
        .await
        .unwrap();
        items.sort_unstable();
        items
    }

    let first = run().await;
    let second = run().await;
    assert_eq!(first.len(), 18);
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_paginate_uses_configured_page_size() {
    let sizes = Mutex::new(Vec::new());
    let sizes_ref = &sizes;

    let items = paginate(&PaginationConfig::new(25), move |opts, sink| {
        sizes_ref.lock().unwrap().push(opts.per_page);
        async move {
            sink.push(opts.page);
            Ok(last_link(3))
        }
    })
    .await
    .unwrap();

    assert_eq!(items.len(), 3);
    assert_eq!(*sizes.lock().unwrap(), vec![25, 25, 25]);
}

#[tokio::test]
async fn test_paginate_dropped_future_abandons_pages() {
    let finished = AtomicUsize::new(0);
    let finished_ref = &finished;

    let result = tokio::time::timeout(
        Duration::from_millis(20),
        paginate(&PaginationConfig::default(), move |opts, sink| async move {
            if opts.page > 1 {
                tokio::time::sleep(Duration::from_secs(5)).await;
            }
            sink.push(opts.page);
            finished_ref.fetch_add(1, Ordering::SeqCst);
            Ok(last_link(4))
        }),
    )
    .await;

    assert!(result.is_err());
    assert_eq!(finished.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_last_page_zero_fetches_once() {
    let calls = AtomicUsize::new(0);
    let calls_ref = &calls;

    let items = paginate(&PaginationConfig::default(), move |_opts, sink| {
        calls_ref.fetch_add(1, Ordering::SeqCst);
        async move {
            sink.push(1);
            Ok(last_link(0))
        }
    })
    .await
    .unwrap();

    assert_eq!(items, vec![1]);
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_cap_bounds_huge_page_count() {
    let calls = AtomicUsize::new(0);
    let calls_ref = &calls;
    let config = PaginationConfig::new(10).with_max_concurrency(2);

    let result: Result<Vec<u32>> = paginate(&config, move |opts, sink| {
        calls_ref.fetch_add(1, Ordering::SeqCst);
        async move {
            if opts.page == 1 {
                sink.push(1);
                Ok(last_link(4_000_000_000))
            } else {
                Err(page_error(opts.page))
            }
        }
    })
    .await;

    assert!(result.is_err());
    // Page 1 plus the two fetches allowed in flight when page 2 fails
    assert_eq!(calls.load(Ordering::SeqCst), 3);
}
