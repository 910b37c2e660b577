//! Tests de los endpoints de cache.

mod helpers;

use std::sync::Arc;

use axum::http::StatusCode;
use helpers::{INDEX, assert_error_envelope, assert_success_envelope, site_client};
use hugo_reader_core::MemoryFetcher;
use serde_json::Value;

fn index_site() -> Arc<MemoryFetcher> {
    Arc::new(MemoryFetcher::new().json("/index.json", INDEX))
}

#[tokio::test]
async fn stats_report_entries_and_hits() {
    let client = site_client(index_site());
    client.get("/taxonomies?site=example.com").await;
    client.get("/taxonomies?site=example.com").await;

    let response = client.get("/cache").await;

    response.assert_status(StatusCode::OK);
    let json: Value = response.json();
    assert_success_envelope(&json);
    assert_eq!(json["action"], "stats");
    assert_eq!(json["total_entries"], 1);
    assert!(json["hits"].as_u64().unwrap() >= 1);
    assert_eq!(json["default_ttl"], "5m");
}

#[tokio::test]
async fn delete_clears_everything() {
    let client = site_client(index_site());
    client.get("/taxonomies?site=example.com").await;

    let response = client.delete("/cache").await;

    response.assert_status(StatusCode::OK);
    let json: Value = response.json();
    assert_success_envelope(&json);
    assert_eq!(json["action"], "clear_all");
    assert_eq!(json["removed_count"], 1);
    assert!(client.state().cache().is_empty());
}

#[tokio::test]
async fn delete_with_site_is_targeted() {
    let client = site_client(index_site());
    client.get("/taxonomies?site=example.com").await;

    let other: Value = client
        .delete("/cache?site=https://other.example")
        .await
        .json();
    assert_eq!(other["action"], "clear_targeted");
    assert_eq!(other["removed_count"], 0);
    assert_eq!(client.state().cache().len(), 1);

    let json: Value = client.delete("/cache?site=https://example.com").await.json();
    assert_eq!(json["target"], "https://example.com");
    assert_eq!(json["removed_count"], 1);
}

#[tokio::test]
async fn delete_with_site_uses_query_spelling() {
    let client = site_client(index_site());
    client.get("/taxonomies?site=example.com").await;

    let response = client.delete("/cache?site=example.com").await;

    response.assert_status(StatusCode::OK);
    let json: Value = response.json();
    assert_eq!(json["target"], "https://example.com");
    assert_eq!(json["removed_count"], 1);
    assert!(client.state().cache().is_empty());
}

#[tokio::test]
async fn delete_with_unusable_site_is_rejected() {
    let client = site_client(index_site());
    client.get("/taxonomies?site=example.com").await;

    let response = client.delete("/cache?site=ftp://example.com").await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let json: Value = response.json();
    assert_error_envelope(&json, "INVALID_URL");
    assert_eq!(client.state().cache().len(), 1);
}

#[tokio::test]
async fn clean_removes_nothing_when_fresh() {
    let client = site_client(index_site());
    client.get("/taxonomies?site=example.com").await;

    let response = client.post("/cache/clean").await;

    response.assert_status(StatusCode::OK);
    let json: Value = response.json();
    assert_eq!(json["action"], "clean");
    assert_eq!(json["removed_count"], 0);
    assert_eq!(client.state().cache().len(), 1);
}

#[tokio::test]
async fn metrics_endpoint_renders() {
    let client = site_client(index_site());

    let response = client.get("/metrics").await;

    response.assert_status(StatusCode::OK);
}
