//! Cache management reports.

use hugo_reader_core::{CacheStats, ResponseCache, Result};
use serde::Serialize;

use crate::site::SiteUrl;

/// Cache statistics with hit and miss counters since startup.
#[derive(Debug, Clone, Serialize)]
pub struct CacheReport {
    pub action: String,
    #[serde(flatten)]
    pub stats: CacheStats,
    pub hits: u64,
    pub misses: u64,
    pub hit_rate: f64,
}

impl CacheReport {
    pub fn from_cache(cache: &ResponseCache) -> Self {
        let metrics = cache.metrics();
        Self {
            action: "stats".to_string(),
            stats: cache.stats(),
            hits: metrics.hits(),
            misses: metrics.misses(),
            hit_rate: metrics.hit_rate(),
        }
    }
}

/// Outcome of clearing the cache.
#[derive(Debug, Clone, Serialize)]
pub struct ClearReport {
    /// `clear_all` or `clear_targeted`.
    pub action: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
    pub removed_count: usize,
    pub message: String,
}

/// Outcome of dropping expired entries.
#[derive(Debug, Clone, Serialize)]
pub struct CleanReport {
    pub action: String,
    pub removed_count: usize,
    pub message: String,
}

/// Clears every entry, or only the entries of `target` when given.
///
/// The target is normalized like the `site` argument of a query, so
/// `example.com` clears what a query for `example.com` cached.
///
/// # Errors
///
/// Returns `InvalidSiteUrl` when the target is not a usable site URL.
pub fn clear(cache: &ResponseCache, target: Option<&str>) -> Result<ClearReport> {
    let Some(target) = target.map(str::trim).filter(|t| !t.is_empty()) else {
        let removed = cache.clear();
        return Ok(ClearReport {
            action: "clear_all".to_string(),
            target: None,
            removed_count: removed,
            message: format!("Cleared all {removed} cache entries"),
        });
    };

    let site = SiteUrl::parse(target)?;
    let origin = site.origin();
    let result = cache.invalidate_site(site.as_str());

    Ok(ClearReport {
        action: "clear_targeted".to_string(),
        message: format!("Cleared {} cache entries for {origin}", result.count),
        target: Some(origin),
        removed_count: result.count,
    })
}

/// Drops expired entries.
pub fn clean(cache: &ResponseCache) -> CleanReport {
    let removed = cache.clean_expired();
    CleanReport {
        action: "clean".to_string(),
        removed_count: removed,
        message: format!("Removed {removed} expired cache entries"),
    }
}
