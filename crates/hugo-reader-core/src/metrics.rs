//! Cache and resolver metrics recording.
//!
//! Counters go through the `metrics` facade; without an installed recorder
//! they are no-ops. [`CacheMetrics`] also keeps atomic counters so hit rates
//! can be reported without querying the exporter.

use metrics::{counter, gauge, histogram};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Registra las metricas de cache y resolucion.
/// Llamar una vez al inicio para registrar las metricas.
pub fn register_metrics() {
    metrics::describe_counter!("hugo_reader_cache_hits_total", "Total number of cache hits");
    metrics::describe_counter!(
        "hugo_reader_cache_misses_total",
        "Total number of cache misses"
    );
    metrics::describe_counter!(
        "hugo_reader_cache_evictions_total",
        "Total number of cache evictions"
    );
    metrics::describe_gauge!(
        "hugo_reader_cache_entries",
        "Current number of entries in cache"
    );
    metrics::describe_counter!(
        "hugo_reader_candidates_total",
        "Candidate endpoints evaluated, by outcome"
    );
    metrics::describe_counter!(
        "hugo_reader_resolutions_total",
        "Candidate set resolutions, by query and result"
    );
    metrics::describe_histogram!(
        "hugo_reader_resolution_seconds",
        "Time spent resolving a candidate set"
    );
}

/// Recorder de metricas de cache.
/// Usa atomic counters internos para maximo rendimiento.
#[derive(Debug, Clone)]
pub struct CacheMetrics {
    hits: Arc<AtomicU64>,
    misses: Arc<AtomicU64>,
    evictions: Arc<AtomicU64>,
}

impl CacheMetrics {
    pub fn new() -> Self {
        Self {
            hits: Arc::new(AtomicU64::new(0)),
            misses: Arc::new(AtomicU64::new(0)),
            evictions: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Registra un cache hit
    pub fn record_hit(&self) {
        self.hits.fetch_add(1, Ordering::Relaxed);
        counter!("hugo_reader_cache_hits_total").increment(1);
    }

    /// Registra un cache miss
    pub fn record_miss(&self) {
        self.misses.fetch_add(1, Ordering::Relaxed);
        counter!("hugo_reader_cache_misses_total").increment(1);
    }

    /// Registra una eviction
    pub fn record_eviction(&self, reason: &'static str) {
        self.evictions.fetch_add(1, Ordering::Relaxed);
        counter!("hugo_reader_cache_evictions_total", "reason" => reason).increment(1);
    }

    /// Actualiza el gauge de entries
    pub fn update_entry_count(&self, count: usize) {
        gauge!("hugo_reader_cache_entries").set(count as f64);
    }

    /// Calcula hit rate (para logging/debugging)
    pub fn hit_rate(&self) -> f64 {
        let hits = self.hits.load(Ordering::Relaxed) as f64;
        let misses = self.misses.load(Ordering::Relaxed) as f64;
        let total = hits + misses;
        if total == 0.0 { 0.0 } else { hits / total }
    }

    /// Retorna el numero de hits
    pub fn hits(&self) -> u64 {
        self.hits.load(Ordering::Relaxed)
    }

    /// Retorna el numero de misses
    pub fn misses(&self) -> u64 {
        self.misses.load(Ordering::Relaxed)
    }

    /// Retorna el numero de evictions
    pub fn evictions(&self) -> u64 {
        self.evictions.load(Ordering::Relaxed)
    }
}

impl Default for CacheMetrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Records the outcome of evaluating one candidate.
pub fn record_candidate(outcome: &'static str) {
    counter!("hugo_reader_candidates_total", "outcome" => outcome).increment(1);
}

/// Records the result of resolving a candidate set.
pub fn record_resolution(query: &str, satisfied: bool, duration: Duration) {
    let result = if satisfied { "satisfied" } else { "unsatisfied" };
    counter!(
        "hugo_reader_resolutions_total",
        "query" => query.to_string(),
        "result" => result
    )
    .increment(1);
    histogram!("hugo_reader_resolution_seconds", "query" => query.to_string())
        .record(duration.as_secs_f64());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_metrics_hit_rate() {
        let metrics = CacheMetrics::new();

        // 3 hits, 1 miss = 75% hit rate
        metrics.record_hit();
        metrics.record_hit();
        metrics.record_hit();
        metrics.record_miss();

        let rate = metrics.hit_rate();
        assert!((rate - 0.75).abs() < 0.001);
    }

    #[test]
    fn test_hit_rate_without_traffic() {
        assert_eq!(CacheMetrics::new().hit_rate(), 0.0);
    }

    #[test]
    fn test_counters_are_shared_between_clones() {
        let metrics = CacheMetrics::new();
        let clone = metrics.clone();

        clone.record_hit();
        clone.record_eviction("ttl");
        metrics.record_miss();

        assert_eq!(metrics.hits(), 1);
        assert_eq!(metrics.misses(), 1);
        assert_eq!(metrics.evictions(), 1);
    }
}
