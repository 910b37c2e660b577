//! Metrics: Prometheus recorder setup and HTTP request instrumentation.
//!
//! Cache and resolver metrics are recorded by `hugo_reader_core::metrics`.

pub mod http;
pub mod setup;

pub use setup::{build_recorder, init_metrics};
