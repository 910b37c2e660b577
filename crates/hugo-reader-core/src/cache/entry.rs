//! Cache entries and revalidation tokens.

use std::time::{Duration, Instant};

use bytes::Bytes;

/// Tokens returned by the origin that allow a conditional re-fetch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Revalidation {
    /// `ETag` response header.
    pub entity_tag: Option<String>,
    /// `Last-Modified` response header.
    pub last_modified: Option<String>,
}

impl Revalidation {
    /// Creates tokens, treating empty header values as absent.
    pub fn new(entity_tag: Option<String>, last_modified: Option<String>) -> Self {
        Self {
            entity_tag: entity_tag.filter(|v| !v.is_empty()),
            last_modified: last_modified.filter(|v| !v.is_empty()),
        }
    }

    /// No revalidation tokens.
    pub fn none() -> Self {
        Self::default()
    }

    /// Returns true if neither token is present.
    pub fn is_empty(&self) -> bool {
        self.entity_tag.is_none() && self.last_modified.is_none()
    }
}

/// A validated response body stored in the cache.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    payload: Bytes,
    revalidation: Revalidation,
    cached_at: Instant,
    ttl: Duration,
}

impl CacheEntry {
    /// Creates an entry holding its own copy of `payload`.
    pub fn new(payload: &[u8], revalidation: Revalidation, ttl: Duration) -> Self {
        Self {
            payload: Bytes::copy_from_slice(payload),
            revalidation,
            cached_at: Instant::now(),
            ttl,
        }
    }

    /// Returns the stored body.
    pub fn payload(&self) -> &Bytes {
        &self.payload
    }

    /// Returns the revalidation tokens.
    pub fn revalidation(&self) -> &Revalidation {
        &self.revalidation
    }

    /// Returns when the entry was stored.
    pub fn cached_at(&self) -> Instant {
        self.cached_at
    }

    /// Returns the time-to-live of the entry.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Returns the age of the entry.
    pub fn age(&self) -> Duration {
        self.cached_at.elapsed()
    }

    /// Returns the payload size in bytes.
    pub fn size(&self) -> usize {
        self.payload.len()
    }

    /// Returns true once the entry has outlived its TTL.
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Instant::now())
    }

    /// Returns true if the entry is expired at `now`.
    ///
    /// An entry whose age equals its TTL exactly is still fresh.
    pub fn is_expired_at(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.cached_at) > self.ttl
    }
}
