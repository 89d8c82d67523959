//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and run full crawls
//! end-to-end. Mocks that must be fetched exactly once carry `.expect(1)`,
//! which the mock server verifies when it is dropped.

use linkwalk::config::Config;
use linkwalk::crawler::{
    build_http_client, callback_fn, crawl_with, Coordinator, CoordinatorOptions, LinkBatch,
    SharedCallback,
};
use linkwalk::{CallbackError, StopReason};
use std::collections::HashMap;
use std::io::Read;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use url::Url;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Records how many times the callback saw each page and the bytes it read
#[derive(Clone, Default)]
struct Recorder {
    pages: Arc<Mutex<HashMap<String, Vec<Vec<u8>>>>>,
}

impl Recorder {
    fn callback(&self) -> SharedCallback {
        let pages = self.pages.clone();
        callback_fn(move |page, body| {
            let mut buf = Vec::new();
            body.read_to_end(&mut buf)?;
            pages
                .lock()
                .unwrap()
                .entry(page.to_string())
                .or_default()
                .push(buf);
            Ok(())
        })
    }

    fn calls(&self, url: &str) -> usize {
        self.pages.lock().unwrap().get(url).map_or(0, Vec::len)
    }

    fn body(&self, url: &str) -> Option<Vec<u8>> {
        self.pages
            .lock()
            .unwrap()
            .get(url)
            .and_then(|bodies| bodies.first().cloned())
    }
}

/// Mounts an HTML page that must be fetched exactly once
async fn page_once(server: &MockServer, route: &str, body: String) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(body)
                .insert_header("content-type", "text/html"),
        )
        .expect(1)
        .mount(server)
        .await;
}

fn links(hrefs: &[&str]) -> String {
    let anchors: String = hrefs
        .iter()
        .map(|href| format!(r#"<a href="{href}">{href}</a>"#))
        .collect();
    format!("<html><body>{anchors}</body></html>")
}

fn seed(server: &MockServer, route: &str) -> Url {
    Url::parse(&format!("{}{}", server.uri(), route)).unwrap()
}

#[tokio::test]
async fn test_end_to_end_cycle() {
    let server = MockServer::start().await;
    let base = server.uri();

    // P -> Q, R ; Q -> P, S ; R -> Q
    page_once(&server, "/p", links(&["/q", "/r"])).await;
    page_once(&server, "/q", links(&["/p", "/s"])).await;
    page_once(&server, "/r", links(&["/q"])).await;
    page_once(&server, "/s", links(&[])).await;

    let recorder = Recorder::default();
    let report = crawl_with(
        &Config::default(),
        seed(&server, "/p"),
        recorder.callback(),
        CancellationToken::new(),
    )
    .await
    .expect("crawl failed to start");

    assert_eq!(report.stop_reason, StopReason::Quiescent);
    assert_eq!(
        report.visited,
        vec![
            format!("{base}/p"),
            format!("{base}/q"),
            format!("{base}/r"),
            format!("{base}/s"),
        ]
    );
    assert_eq!(report.stats.reported, 4);
    assert_eq!(report.stats.failed, 0);

    for route in ["/p", "/q", "/r", "/s"] {
        assert_eq!(recorder.calls(&format!("{base}{route}")), 1, "callback count for {route}");
    }
}

#[tokio::test]
async fn test_concurrent_discovery_of_shared_page() {
    let server = MockServer::start().await;

    // A hub links to many leaves; every leaf links back to the hub and to one
    // shared page, so the shared page is discovered by many tasks at once.
    let leaves: Vec<String> = (0..25).map(|i| format!("/leaf{i}")).collect();
    let hub_links: Vec<&str> = leaves.iter().map(String::as_str).collect();
    page_once(&server, "/", links(&hub_links)).await;

    for leaf in &leaves {
        page_once(&server, leaf, links(&["/", "/shared", leaf.as_str()])).await;
    }
    page_once(&server, "/shared", links(&["/", "/leaf0"])).await;

    let report = crawl_with(
        &Config::default(),
        seed(&server, "/"),
        callback_fn(|_, _| Ok(())),
        CancellationToken::new(),
    )
    .await
    .unwrap();

    assert_eq!(report.stop_reason, StopReason::Quiescent);
    assert_eq!(report.visited.len(), 27);
    assert_eq!(report.stats.reported, 27);
}

#[tokio::test]
async fn test_failed_task_does_not_stop_crawl() {
    let server = MockServer::start().await;
    let base = server.uri();

    // Nothing listens on port 1, so that fetch fails with connection refused.
    let dead = "http://127.0.0.1:1/gone";
    page_once(&server, "/", links(&[dead, "/alive"])).await;
    page_once(&server, "/alive", links(&["/deeper", dead])).await;
    page_once(&server, "/deeper", links(&[])).await;

    let report = crawl_with(
        &Config::default(),
        seed(&server, "/"),
        callback_fn(|_, _| Ok(())),
        CancellationToken::new(),
    )
    .await
    .unwrap();

    assert_eq!(report.stop_reason, StopReason::Quiescent);
    assert_eq!(report.stats.failed, 1);
    assert_eq!(report.stats.reported, 3);
    assert!(report.was_visited(dead), "failed URL stays visited");
    assert!(report.was_visited(&format!("{base}/deeper")));
}

#[tokio::test]
async fn test_callback_failure_is_isolated() {
    let server = MockServer::start().await;
    let base = server.uri();

    page_once(&server, "/", links(&["/poison", "/fine"])).await;
    page_once(&server, "/poison", links(&["/behind-poison"])).await;
    page_once(&server, "/fine", links(&["/after-fine"])).await;
    page_once(&server, "/after-fine", links(&[])).await;

    let callback = callback_fn(|page, body| {
        let mut sink = Vec::new();
        body.read_to_end(&mut sink)?;
        if page.path() == "/poison" {
            return Err(CallbackError::Rejected("poisoned page".to_string()));
        }
        Ok(())
    });

    let report = crawl_with(
        &Config::default(),
        seed(&server, "/"),
        callback,
        CancellationToken::new(),
    )
    .await
    .unwrap();

    assert_eq!(report.stats.failed, 1);
    assert_eq!(report.stats.reported, 3);
    assert!(report.was_visited(&format!("{base}/after-fine")));
    // The failed page reported nothing, so its links were never dispatched.
    assert!(!report.was_visited(&format!("{base}/behind-poison")));

    let requests = server.received_requests().await.unwrap();
    assert!(requests.iter().all(|r| r.url.path() != "/behind-poison"));
}

#[tokio::test]
async fn test_callback_receives_complete_body() {
    let server = MockServer::start().await;
    let base = server.uri();

    let big_text = "lorem ipsum ".repeat(10_000);
    let body = format!(r#"<html><body><a href="/next">next</a><p>{big_text}</p></body></html>"#);
    page_once(&server, "/", body.clone()).await;
    page_once(&server, "/next", links(&[])).await;

    let recorder = Recorder::default();
    crawl_with(
        &Config::default(),
        seed(&server, "/"),
        recorder.callback(),
        CancellationToken::new(),
    )
    .await
    .unwrap();

    assert_eq!(recorder.body(&format!("{base}/")), Some(body.into_bytes()));
}

#[tokio::test]
async fn test_fragments_skipped_and_relative_links_resolved() {
    let server = MockServer::start().await;
    let base = server.uri();

    page_once(
        &server,
        "/dir/page.html",
        links(&["#section", "../x?y=1", "sibling.html"]),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/x"))
        .respond_with(ResponseTemplate::new(200).set_body_string(""))
        .expect(1)
        .mount(&server)
        .await;
    page_once(&server, "/dir/sibling.html", links(&["#top", "page.html"])).await;

    let report = crawl_with(
        &Config::default(),
        seed(&server, "/dir/page.html"),
        callback_fn(|_, _| Ok(())),
        CancellationToken::new(),
    )
    .await
    .unwrap();

    assert_eq!(
        report.visited,
        vec![
            format!("{base}/dir/page.html"),
            format!("{base}/dir/sibling.html"),
            format!("{base}/x?y=1"),
        ]
    );
}

#[tokio::test]
async fn test_error_status_pages_are_still_followed() {
    let server = MockServer::start().await;
    let base = server.uri();

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(404).set_body_string(links(&["/found"])))
        .expect(1)
        .mount(&server)
        .await;
    page_once(&server, "/found", links(&[])).await;

    let report = crawl_with(
        &Config::default(),
        seed(&server, "/"),
        callback_fn(|_, _| Ok(())),
        CancellationToken::new(),
    )
    .await
    .unwrap();

    assert_eq!(report.stats.reported, 2);
    assert!(report.was_visited(&format!("{base}/found")));
}

#[tokio::test]
async fn test_reoffered_seed_is_ignored() {
    let server = MockServer::start().await;
    page_once(&server, "/", links(&["/"])).await;

    let client = build_http_client(&Config::default().http).unwrap();
    let (coordinator, handle) = Coordinator::new(client, CoordinatorOptions::default());

    let callback = callback_fn(|_, _| Ok(()));
    for _ in 0..3 {
        handle
            .submit(LinkBatch::seed(seed(&server, "/"), callback.clone()))
            .unwrap();
    }
    drop(handle);

    let report = coordinator.run(CancellationToken::new()).await;

    assert_eq!(report.stop_reason, StopReason::Quiescent);
    assert_eq!(report.visited.len(), 1);
    assert_eq!(report.stats.reported, 1);
    // Three seeds plus the page's own report of itself.
    assert_eq!(report.batches_handled, 4);
}

#[tokio::test]
async fn test_deadline_aborts_outstanding_fetches() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(links(&["/never"]))
                .set_delay(Duration::from_secs(10)),
        )
        .mount(&server)
        .await;

    let client = build_http_client(&Config::default().http).unwrap();
    let (coordinator, handle) = Coordinator::new(
        client,
        CoordinatorOptions {
            deadline: Some(Duration::from_millis(200)),
        },
    );
    handle
        .submit(LinkBatch::seed(seed(&server, "/slow"), callback_fn(|_, _| Ok(()))))
        .unwrap();

    let report = coordinator.run(CancellationToken::new()).await;

    assert_eq!(report.stop_reason, StopReason::Deadline);
    assert_eq!(report.stats.aborted, 1);
    assert_eq!(report.visited.len(), 1);
}

#[tokio::test]
async fn test_shutdown_stops_crawl() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(links(&[]))
                .set_delay(Duration::from_secs(10)),
        )
        .mount(&server)
        .await;

    let shutdown = CancellationToken::new();
    let trigger = shutdown.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(100)).await;
        trigger.cancel();
    });

    let report = crawl_with(
        &Config::default(),
        seed(&server, "/slow"),
        callback_fn(|_, _| Ok(())),
        shutdown,
    )
    .await
    .unwrap();

    assert_eq!(report.stop_reason, StopReason::Shutdown);
    assert_eq!(report.stats.aborted, 1);
}
