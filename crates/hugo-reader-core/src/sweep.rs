//! Background expiry sweeper.

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tokio::time::{MissedTickBehavior, interval};
use tracing::{debug, info};

use crate::cache::ResponseCache;

/// Configuration for the sweep scheduler.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SweepConfig {
    /// Interval between sweeps (default: 1 minute).
    #[serde(default = "default_interval", with = "humantime_serde")]
    pub interval: Duration,
}

fn default_interval() -> Duration {
    Duration::from_secs(60)
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            interval: default_interval(),
        }
    }
}

/// Handle for controlling a running sweeper. Dropping it stops the task.
#[derive(Debug)]
pub struct SweepHandle {
    shutdown_tx: watch::Sender<bool>,
}

impl SweepHandle {
    /// Signals the sweeper to stop.
    pub fn stop(&self) {
        let _ = self.shutdown_tx.send(true);
    }

    /// Returns true once the sweeper task has exited.
    pub fn is_stopped(&self) -> bool {
        self.shutdown_tx.is_closed()
    }
}

impl Drop for SweepHandle {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Periodically removes expired entries from a shared cache.
pub struct SweepScheduler {
    cache: Arc<ResponseCache>,
    config: SweepConfig,
}

impl SweepScheduler {
    pub fn new(cache: Arc<ResponseCache>, config: SweepConfig) -> Self {
        Self { cache, config }
    }

    /// Creates a scheduler with the default interval.
    pub fn with_defaults(cache: Arc<ResponseCache>) -> Self {
        Self::new(cache, SweepConfig::default())
    }

    /// Spawns the sweep task on the current runtime.
    pub fn start(self) -> SweepHandle {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        tokio::spawn(self.run(shutdown_rx));
        SweepHandle { shutdown_tx }
    }

    /// Runs one sweep and returns how many entries were removed.
    pub fn sweep_once(&self) -> usize {
        let removed = self.cache.clean_expired();
        if removed > 0 {
            debug!(removed = removed, "Expired cache entries swept");
        }
        removed
    }

    async fn run(self, mut shutdown_rx: watch::Receiver<bool>) {
        let mut timer = interval(self.config.interval);
        timer.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // El primer tick es inmediato; no hay nada que limpiar todavia.
        timer.tick().await;

        info!(interval = ?self.config.interval, "Starting cache sweeper");

        loop {
            tokio::select! {
                _ = timer.tick() => {
                    self.sweep_once();
                }
                result = shutdown_rx.changed() => {
                    if result.is_err() || *shutdown_rx.borrow() {
                        info!("Cache sweeper shutting down");
                        break;
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{CacheKey, Revalidation};

    const NO_PARAMS: [(&str, &str); 0] = [];

    #[test]
    fn test_sweep_config_default() {
        assert_eq!(SweepConfig::default().interval, Duration::from_secs(60));

        let config: SweepConfig = serde_json::from_str(r#"{"interval":"30s"}"#).unwrap();
        assert_eq!(config.interval, Duration::from_secs(30));
    }

    #[test]
    fn test_sweep_once() {
        let cache = Arc::new(ResponseCache::with_ttl(Duration::from_millis(5)));
        cache.set(
            CacheKey::build("https://example.com", "/a.json", NO_PARAMS),
            b"x",
            Revalidation::none(),
        );
        std::thread::sleep(Duration::from_millis(20));

        let scheduler = SweepScheduler::with_defaults(Arc::clone(&cache));
        assert_eq!(scheduler.sweep_once(), 1);
        assert!(cache.is_empty());
    }

    #[tokio::test]
    async fn test_scheduler_sweeps_and_stops() {
        let cache = Arc::new(ResponseCache::with_ttl(Duration::from_millis(5)));
        cache.set(
            CacheKey::build("https://example.com", "/a.json", NO_PARAMS),
            b"x",
            Revalidation::none(),
        );

        let handle = SweepScheduler::new(
            Arc::clone(&cache),
            SweepConfig {
                interval: Duration::from_millis(20),
            },
        )
        .start();

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(cache.is_empty());

        handle.stop();
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(handle.is_stopped());
    }
}
