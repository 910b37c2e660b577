//! # Hugo Reader Server
//!
//! Thin HTTP transport over [`hugo_reader_site::SiteReader`]: every query
//! operation is one route, responses are `{"success": ..., "errors": [...]}`
//! envelopes in JSON or YAML.
//!
//! The binary wires [`settings`], [`telemetry`], [`metrics`] and the
//! background expiry sweeper together; the router itself is built by
//! [`create_router_with_state`] so tests can drive it in-process.

pub mod error;
pub mod extractors;
pub mod handlers;
pub mod metrics;
pub mod middleware;
pub mod response;
pub mod server;
pub mod settings;
pub mod state;
pub mod telemetry;

pub use error::AppError;
pub use handlers::health::HealthResponse;
pub use handlers::response::{Envelope, ErrorDetail};
pub use server::{create_router, create_router_with_state, run_server_with_state};
pub use settings::{CliArgs, Command, Settings};
pub use state::AppState;

/// Returns the crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_is_defined() {
        assert!(!version().is_empty());
    }
}
