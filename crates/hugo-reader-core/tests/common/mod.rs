#![allow(dead_code)]
use std::sync::Arc;
use std::time::Duration;

use hugo_reader_core::{Candidate, CandidateSet, MemoryFetcher, Resolver, ResponseCache, Validator};
use url::Url;

pub const SITE: &str = "https://example.com";

/// Parses the test site URL.
pub fn site() -> Url {
    Url::parse(SITE).expect("valid test site URL")
}

/// Builds a resolver over a fresh cache with the given default TTL.
pub fn resolver_with_ttl(fetcher: Arc<MemoryFetcher>, ttl: Duration) -> Resolver {
    Resolver::new(Arc::new(ResponseCache::with_ttl(ttl)), fetcher)
}

/// Builds a resolver over a fresh cache with the default TTL.
pub fn resolver(fetcher: Arc<MemoryFetcher>) -> Resolver {
    Resolver::new(Arc::new(ResponseCache::with_defaults()), fetcher)
}

/// Accepts documents with a `taxonomies` key.
pub fn has_taxonomies() -> Validator {
    Validator::json("has_taxonomies", |v| v.get("taxonomies").is_some())
}

/// Accepts documents with a `pages` array.
pub fn has_pages() -> Validator {
    Validator::json("has_pages", |v| v["pages"].is_array())
}

/// The taxonomy candidate list used across scenarios.
pub fn taxonomy_set() -> CandidateSet {
    CandidateSet::new("taxonomies")
        .candidate(Candidate::new("/taxonomies/index.json", has_taxonomies()))
        .candidate(Candidate::new("/index.json", has_taxonomies()))
        .candidate(Candidate::new("/api/taxonomies.json", has_taxonomies()))
}
