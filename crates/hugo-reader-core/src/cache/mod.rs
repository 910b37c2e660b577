//! Response cache for Hugo Reader.
//!
//! This module provides the in-memory cache shared by every resolution: entries
//! keyed by site, endpoint and sorted parameters, TTL-based expiration with lazy
//! eviction, bulk cleanup, pattern-based invalidation and metrics.

pub mod entry;
pub mod invalidation;
pub mod keys;
pub mod store;

// Re-exports
pub use entry::{CacheEntry, Revalidation};
pub use invalidation::InvalidationResult;
pub use keys::CacheKey;
pub use store::{CacheConfig, CacheStats, Lookup, ResponseCache};
