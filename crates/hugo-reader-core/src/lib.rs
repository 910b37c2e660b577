//! # Hugo Reader Core
//!
//! Shared building blocks for reading statically generated content sites:
//!
//! - [`ResponseCache`]: an in-memory, TTL-bounded store of validated response bodies
//!   with entity tags and last-modified tokens for conditional revalidation.
//! - [`Resolver`]: walks an ordered [`CandidateSet`] of endpoint patterns, consulting the
//!   cache first and the injected [`Fetcher`] second, and returns the first payload whose
//!   [`Validator`] accepts it.
//! - [`SweepScheduler`]: background task that drops expired entries in bulk.
//!
//! ## Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use hugo_reader_core::{Candidate, CandidateSet, MemoryFetcher, Resolver, ResponseCache, Validator};
//!
//! let cache = Arc::new(ResponseCache::with_defaults());
//! let fetcher = Arc::new(MemoryFetcher::new().json("/index.json", r#"{"pages":[]}"#));
//! let resolver = Resolver::new(cache, fetcher);
//!
//! let set = CandidateSet::new("pages")
//!     .candidate(Candidate::new("/index.json", Validator::json("pages", |v| v["pages"].is_array())));
//! let resolved = resolver.resolve(&site, &set).await?;
//! ```

pub mod cache;
pub mod error;
pub mod fetch;
pub mod metrics;
pub mod resolver;
pub mod sweep;

// Re-exports
pub use cache::{
    CacheConfig, CacheEntry, CacheKey, CacheStats, InvalidationResult, Lookup, ResponseCache,
    Revalidation,
};
pub use error::{ErrorCode, ReaderError, Result};
pub use fetch::{FetchError, FetchRequest, FetchResponse, Fetcher, MemoryFetcher};
pub use metrics::CacheMetrics;
pub use resolver::{
    Candidate, CandidateOutcome, CandidateSet, Origin, Resolved, Resolver, SourceDescriptor,
    Unsatisfied, Validator,
};
pub use sweep::{SweepConfig, SweepHandle, SweepScheduler};

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

    #[test]
    fn version_is_semver() {
        let v = version();
        assert_eq!(v.split('.').count(), 3, "Version should be semver");
    }
}
