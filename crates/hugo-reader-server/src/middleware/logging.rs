//! Middleware de logging estructurado.

use axum::{body::Body, http::Request, middleware::Next, response::Response};
use std::time::Instant;
use tracing::{Instrument, debug, info, info_span, warn};

use super::request_id::RequestId;

/// Wraps the request in an `http_request` span carrying the request id and
/// logs its completion. Must run inside `RequestIdLayer`.
pub async fn log_requests(request: Request<Body>, next: Next) -> Response {
    let start = Instant::now();

    let request_id = request
        .extensions()
        .get::<RequestId>()
        .map_or("unknown", RequestId::as_str)
        .to_string();

    let span = info_span!(
        "http_request",
        request_id = %request_id,
        method = %request.method(),
        path = %request.uri().path(),
    );

    async move {
        debug!("Request started");

        let response = next.run(request).await;

        let status = response.status();
        let duration_ms = start.elapsed().as_millis() as u64;

        if status.is_server_error() {
            warn!(status = status.as_u16(), duration_ms, "Request failed");
        } else {
            info!(status = status.as_u16(), duration_ms, "Request completed");
        }

        response
    }
    .instrument(span)
    .await
}
