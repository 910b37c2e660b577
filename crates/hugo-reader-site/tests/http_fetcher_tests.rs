use std::sync::Arc;
use std::time::Duration;

use httpmock::MockServer;
use hugo_reader_core::{FetchRequest, Fetcher, ResponseCache, Revalidation};
use hugo_reader_site::{HttpFetcher, SiteClientConfig, SiteReader};
use url::Url;

fn config(timeout: Duration) -> SiteClientConfig {
    SiteClientConfig::builder()
        .http_timeout(timeout)
        .user_agent("hugo-reader-test")
        .build()
        .expect("valid config")
}

fn request(server: &MockServer, path: &str) -> FetchRequest {
    FetchRequest::new(Url::parse(&server.url(path)).expect("mock url"), path)
}

#[tokio::test]
async fn test_fetch_reports_status_body_and_tokens() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method("GET")
            .path("/index.json")
            .header("user-agent", "hugo-reader-test");
        then.status(200)
            .header("content-type", "application/json")
            .header("etag", "\"v1\"")
            .header("last-modified", "Wed, 21 Oct 2026 07:28:00 GMT")
            .body(r#"{"pages":[]}"#);
    });

    let fetcher = HttpFetcher::new(&config(Duration::from_secs(5))).expect("fetcher");
    let response = fetcher.fetch(&request(&server, "/index.json")).await.expect("response");

    mock.assert();
    assert_eq!(response.status, 200);
    assert_eq!(&response.body[..], br#"{"pages":[]}"#);
    assert_eq!(response.entity_tag.as_deref(), Some("\"v1\""));
    assert_eq!(
        response.last_modified.as_deref(),
        Some("Wed, 21 Oct 2026 07:28:00 GMT")
    );
}

#[tokio::test]
async fn test_conditional_request_sends_tokens() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method("GET")
            .path("/index.json")
            .header("if-none-match", "\"v1\"")
            .header("if-modified-since", "Wed, 21 Oct 2026 07:28:00 GMT");
        then.status(304);
    });

    let fetcher = HttpFetcher::new(&config(Duration::from_secs(5))).expect("fetcher");
    let tokens = Revalidation::new(
        Some("\"v1\"".to_string()),
        Some("Wed, 21 Oct 2026 07:28:00 GMT".to_string()),
    );
    let response = fetcher
        .fetch(&request(&server, "/index.json").conditional(&tokens))
        .await
        .expect("response");

    mock.assert();
    assert!(response.is_not_modified());
}

#[tokio::test]
async fn test_error_status_is_a_response() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method("GET").path("/missing.json");
        then.status(404).body("not found");
    });

    let fetcher = HttpFetcher::new(&config(Duration::from_secs(5))).expect("fetcher");
    let response = fetcher.fetch(&request(&server, "/missing.json")).await.expect("response");

    assert_eq!(response.status, 404);
    assert!(!response.is_success());
}

#[tokio::test]
async fn test_slow_response_times_out() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method("GET").path("/slow.json");
        then.status(200).delay(Duration::from_millis(800)).body("{}");
    });

    let fetcher = HttpFetcher::new(&config(Duration::from_millis(100))).expect("fetcher");
    let err = fetcher
        .fetch(&request(&server, "/slow.json"))
        .await
        .expect_err("should time out");

    assert!(err.is_timeout());
}

#[tokio::test]
async fn test_connection_refused_is_transport_error() {
    let fetcher = HttpFetcher::new(&config(Duration::from_secs(2))).expect("fetcher");
    let url = Url::parse("http://127.0.0.1:1/index.json").expect("url");

    let err = fetcher
        .fetch(&FetchRequest::new(url, "/index.json"))
        .await
        .expect_err("nothing listens on port 1");

    assert!(!err.is_timeout());
}

#[tokio::test]
async fn test_reader_over_http_uses_cache() {
    let server = MockServer::start();
    let terms = server.mock(|when, then| {
        when.method("GET").path("/tags/index.json");
        then.status(200)
            .header("content-type", "application/json")
            .body(r#"{"terms":{"rust":3,"go":1}}"#);
    });

    let reader = SiteReader::http(
        Arc::new(ResponseCache::with_defaults()),
        config(Duration::from_secs(5)),
    )
    .expect("reader");

    let first = reader.terms(&server.base_url(), "tags").await.expect("terms");
    let second = reader.terms(&server.base_url(), "tags").await.expect("terms");

    assert_eq!(first.terms, vec!["rust", "go"]);
    assert!(!first.metadata.cached);
    assert!(second.metadata.cached);
    terms.assert_hits(1);
}
