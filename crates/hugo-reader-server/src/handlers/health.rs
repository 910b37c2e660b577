//! Liveness endpoint.

use axum::Json;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

impl Default for HealthResponse {
    fn default() -> Self {
        Self {
            status: "UP",
            version: env!("CARGO_PKG_VERSION"),
        }
    }
}

/// GET /health. Never touches the network or the cache.
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse::default())
}
