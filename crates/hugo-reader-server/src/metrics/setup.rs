//! Metrics setup and initialization.

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusHandle, PrometheusRecorder};
use tracing::info;

use super::http::register_http_metrics;

/// Buckets para histogramas (en segundos). Las resoluciones incluyen
/// fetches remotos, por eso el rango llega a 10s.
const LATENCY_BUCKETS: &[f64] = &[
    0.0005, // 500 microsegundos
    0.001,  // 1 milisegundo
    0.005,  // 5 milisegundos
    0.01,   // 10 milisegundos
    0.025,  // 25 milisegundos
    0.05,   // 50 milisegundos
    0.1,    // 100 milisegundos
    0.25,   // 250 milisegundos
    0.5,    // 500 milisegundos
    1.0,    // 1 segundo
    2.5,    // 2.5 segundos
    5.0,    // 5 segundos
    10.0,   // 10 segundos
];

fn builder() -> Result<PrometheusBuilder, BuildError> {
    PrometheusBuilder::new().set_buckets(LATENCY_BUCKETS)
}

/// Instala el recorder global y retorna el handle para el endpoint.
///
/// # Errors
///
/// Fails if a global recorder is already installed.
pub fn init_metrics() -> Result<PrometheusHandle, BuildError> {
    let handle = builder()?.install_recorder()?;

    register_http_metrics();
    hugo_reader_core::metrics::register_metrics();

    info!("Metrics system initialized");
    Ok(handle)
}

/// Builds a recorder without installing it globally. Used by tests and by
/// callers that manage the global recorder themselves.
pub fn build_recorder() -> Result<PrometheusRecorder, BuildError> {
    Ok(builder()?.build_recorder())
}
