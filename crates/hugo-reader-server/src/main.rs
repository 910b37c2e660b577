//! Hugo Reader server binary.

use anyhow::Context;
use hugo_reader_core::{SweepConfig, SweepScheduler};
use hugo_reader_server::{
    AppState, Command, metrics::init_metrics, run_server_with_state, settings, telemetry,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let (cli, settings) = settings::load_with_cli().context("failed to load configuration")?;

    if let Some(Command::Version) = cli.command {
        println!("hugo-reader {}", hugo_reader_server::version());
        return Ok(());
    }

    telemetry::init(&settings.logging).context("failed to initialize logging")?;
    let prometheus_handle = init_metrics().context("failed to initialize metrics")?;

    tracing::info!("Starting Hugo Reader v{}", hugo_reader_server::version());
    tracing::info!(
        http_timeout = ?settings.client.http_timeout(),
        cache_ttl = ?settings.cache.default_ttl,
        "Site client configured"
    );

    let state = AppState::from_settings(&settings).context("failed to build site reader")?;

    let sweeper = SweepScheduler::new(
        state.cache().clone(),
        SweepConfig {
            interval: settings.cache.sweep_interval,
        },
    )
    .start();

    let result = run_server_with_state(settings.server.addr, state, prometheus_handle).await;

    sweeper.stop();
    tracing::info!("Server stopped");

    result.context("server error")
}
