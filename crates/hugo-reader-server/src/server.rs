use std::net::SocketAddr;

use axum::{
    Router, middleware,
    routing::{get, post},
};
use metrics_exporter_prometheus::PrometheusHandle;
use tower::ServiceBuilder;

use crate::handlers::{
    cache::{cache_stats, clean_cache, clear_cache},
    health::health_check,
    info::get_info,
    metrics::metrics_handler,
    query::{get_discover, get_search, get_taxonomies, get_terms, post_content},
};
use crate::metrics::http::http_metrics_middleware;
use crate::middleware::{RequestIdLayer, log_requests};
use crate::state::AppState;

/// Creates a router with the given application state and metrics handle.
pub fn create_router_with_state(state: AppState, prometheus_handle: PrometheusHandle) -> Router {
    let middleware_stack = ServiceBuilder::new()
        .layer(RequestIdLayer)
        .layer(middleware::from_fn(log_requests));

    // /metrics usa su propio state
    let metrics_router = Router::new()
        .route("/metrics", get(metrics_handler))
        .with_state(prometheus_handle);

    let app_router = Router::new()
        .route("/health", get(health_check))
        .route("/info", get(get_info))
        // Query routes
        .route("/taxonomies", get(get_taxonomies))
        .route("/terms", get(get_terms))
        .route("/content", post(post_content))
        .route("/search", get(get_search))
        .route("/discover", get(get_discover))
        // Cache management routes
        .route("/cache", get(cache_stats).delete(clear_cache))
        .route("/cache/clean", post(clean_cache))
        .with_state(state);

    Router::new()
        .merge(app_router)
        .merge(metrics_router)
        .layer(middleware::from_fn(http_metrics_middleware))
        .layer(middleware_stack)
}

/// Creates a router with only the stateless endpoints (health and info).
pub fn create_router() -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/info", get(get_info))
        .layer(
            ServiceBuilder::new()
                .layer(RequestIdLayer)
                .layer(middleware::from_fn(log_requests)),
        )
}

/// Runs the server until a shutdown signal arrives.
pub async fn run_server_with_state(
    addr: SocketAddr,
    state: AppState,
    prometheus_handle: PrometheusHandle,
) -> Result<(), std::io::Error> {
    let app = create_router_with_state(state, prometheus_handle);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Server listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %err, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            },
            Err(err) => {
                tracing::warn!(error = %err, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            },
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
