//! HTTP request metrics.

use axum::{body::Body, extract::MatchedPath, http::Request, middleware::Next, response::Response};
use metrics::{counter, histogram};
use std::time::Instant;

const REQUESTS_TOTAL: &str = "hugo_reader_http_requests_total";
const REQUEST_DURATION: &str = "hugo_reader_http_request_duration_seconds";

/// Label for the `path` dimension. Uses the route template so query strings
/// and unknown URLs do not create one series each.
fn route_label(matched_path: Option<&MatchedPath>) -> String {
    matched_path.map_or_else(|| "unmatched".to_string(), |p| p.as_str().to_string())
}

/// Counts requests by method, route and status, and records their latency.
pub async fn http_metrics_middleware(
    matched_path: Option<MatchedPath>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let start = Instant::now();
    let method = request.method().as_str().to_string();
    let path = route_label(matched_path.as_ref());

    let response = next.run(request).await;
    let elapsed = start.elapsed().as_secs_f64();

    counter!(
        REQUESTS_TOTAL,
        "method" => method.clone(),
        "path" => path.clone(),
        "status" => response.status().as_u16().to_string()
    )
    .increment(1);
    histogram!(REQUEST_DURATION, "method" => method, "path" => path).record(elapsed);

    response
}

/// Registra las metricas HTTP
pub fn register_http_metrics() {
    metrics::describe_counter!(REQUESTS_TOTAL, "Total number of HTTP requests");
    metrics::describe_histogram!(
        REQUEST_DURATION,
        metrics::Unit::Seconds,
        "HTTP request duration in seconds"
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unmatched_routes_share_one_label() {
        assert_eq!(route_label(None), "unmatched");
    }
}
