//! Tests de middleware.

mod helpers;

use std::sync::Arc;

use helpers::{client, site_client};
use hugo_reader_core::MemoryFetcher;
use uuid::Uuid;

// === Request ID ===

#[tokio::test]
async fn response_includes_request_id() {
    let response = client().get("/health").await;

    response.assert_header_exists("x-request-id");
}

#[tokio::test]
async fn request_id_is_uuid_v4() {
    let response = client().get("/health").await;

    let id = response.header("x-request-id").unwrap();
    let parsed = Uuid::parse_str(id).unwrap_or_else(|_| panic!("Invalid UUID: {id}"));

    assert_eq!(parsed.get_version_num(), 4);
}

#[tokio::test]
async fn propagates_incoming_request_id() {
    let custom_id = "my-custom-request-id-12345";

    let response = client()
        .get_with_headers("/health", vec![("x-request-id", custom_id)])
        .await;

    response.assert_header("x-request-id", custom_id);
}

#[tokio::test]
async fn generates_different_ids_for_each_request() {
    let response1 = client().get("/health").await;
    let response2 = client().get("/health").await;

    let id1 = response1.header("x-request-id").unwrap();
    let id2 = response2.header("x-request-id").unwrap();

    assert_ne!(id1, id2);
}

// === Request ID en otros endpoints ===

#[tokio::test]
async fn request_id_present_on_error_responses() {
    let client = site_client(Arc::new(MemoryFetcher::new()));

    let response = client.get("/taxonomies?site=example.com").await;

    response.assert_header_exists("x-request-id");
}
