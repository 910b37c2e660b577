//! The resolver.

use std::sync::Arc;
use std::time::{Duration, Instant};

use bytes::Bytes;
use serde::Serialize;
use tracing::{debug, info};
use url::Url;

use super::{Candidate, CandidateSet};
use crate::cache::{CacheEntry, CacheKey, Lookup, ResponseCache};
use crate::fetch::{FetchRequest, FetchResponse, Fetcher};
use crate::metrics::{record_candidate, record_resolution};

const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// Where a resolved payload came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Origin {
    /// A live cache entry.
    Cache,
    /// An expired cache entry confirmed unchanged by a `304` response.
    Revalidated,
    /// A fresh network response.
    Network,
}

/// Describes which candidate satisfied a query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceDescriptor {
    /// Position of the candidate in its set.
    pub index: usize,
    /// Candidate path.
    pub path: String,
    /// Absolute URL of the candidate.
    pub url: String,
    pub origin: Origin,
}

impl SourceDescriptor {
    /// Returns true if the payload was served without downloading a body.
    pub fn is_cached(&self) -> bool {
        matches!(self.origin, Origin::Cache | Origin::Revalidated)
    }
}

/// A validated payload and its source.
#[derive(Debug, Clone)]
pub struct Resolved {
    pub payload: Bytes,
    pub source: SourceDescriptor,
}

/// Every candidate of a set was exhausted without a valid payload.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("no candidate satisfied query '{query}' ({attempted} tried)")]
pub struct Unsatisfied {
    query: String,
    attempted: usize,
}

impl Unsatisfied {
    pub fn new(query: impl Into<String>, attempted: usize) -> Self {
        Self {
            query: query.into(),
            attempted,
        }
    }

    /// Returns the name of the query.
    pub fn query(&self) -> &str {
        &self.query
    }

    /// Returns how many candidates were evaluated.
    pub fn attempted(&self) -> usize {
        self.attempted
    }
}

/// Terminal state of one candidate evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CandidateOutcome {
    /// Served from a live cache entry.
    CacheHitValid,
    /// A live cache entry failed validation and was deleted; the candidate is fetched.
    CacheHitInvalid,
    /// A `304` confirmed an expired entry.
    Revalidated,
    /// A fetched body passed validation.
    Validated,
    /// A fetched body failed validation.
    Rejected,
    /// Transport error or non-success status.
    FetchFailed,
    /// The fetch exceeded its deadline.
    TimedOut,
}

impl CandidateOutcome {
    /// Returns the label used in metrics and logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CacheHitValid => "cache_hit_valid",
            Self::CacheHitInvalid => "cache_hit_invalid",
            Self::Revalidated => "revalidated",
            Self::Validated => "validated",
            Self::Rejected => "rejected",
            Self::FetchFailed => "fetch_failed",
            Self::TimedOut => "timed_out",
        }
    }

    fn record(self) {
        record_candidate(self.as_str());
    }
}

/// Walks candidate sets against the shared cache and an injected fetcher.
///
/// Candidates are evaluated strictly in order and never concurrently. Given the
/// same candidates, cache contents and fetch responses, the outcome is the same.
///
/// # Example
///
/// ```ignore
/// let resolver = Resolver::new(cache, Arc::new(http_fetcher))
///     .with_fetch_timeout(Duration::from_secs(5));
///
/// match resolver.resolve(&site, &set).await {
///     Ok(resolved) => println!("served by {}", resolved.source.url),
///     Err(unsatisfied) => println!("{unsatisfied}"),
/// }
/// ```
#[derive(Clone)]
pub struct Resolver {
    cache: Arc<ResponseCache>,
    fetcher: Arc<dyn Fetcher>,
    fetch_timeout: Duration,
}

impl Resolver {
    /// Creates a resolver with a 10 second per-fetch deadline.
    pub fn new(cache: Arc<ResponseCache>, fetcher: Arc<dyn Fetcher>) -> Self {
        Self {
            cache,
            fetcher,
            fetch_timeout: DEFAULT_FETCH_TIMEOUT,
        }
    }

    /// Sets the per-fetch deadline.
    pub fn with_fetch_timeout(mut self, timeout: Duration) -> Self {
        self.fetch_timeout = timeout;
        self
    }

    /// Returns the shared cache.
    pub fn cache(&self) -> &Arc<ResponseCache> {
        &self.cache
    }

    /// Returns the per-fetch deadline.
    pub fn fetch_timeout(&self) -> Duration {
        self.fetch_timeout
    }

    /// Returns the first candidate payload that passes validation.
    ///
    /// For each candidate, in order:
    /// 1. A live cache entry that validates is returned without network access.
    ///    One that fails validation is deleted and the same candidate is fetched.
    /// 2. An expired entry with revalidation tokens triggers a conditional fetch;
    ///    `304 Not Modified` reuses the stored body.
    /// 3. A successful, validating response is cached and returned. Transport
    ///    errors, timeouts, non-success statuses and rejected bodies move on to
    ///    the next candidate.
    ///
    /// # Errors
    ///
    /// Returns [`Unsatisfied`] once every candidate is exhausted. Nothing is
    /// cached in that case.
    pub async fn resolve(&self, site: &Url, set: &CandidateSet) -> Result<Resolved, Unsatisfied> {
        let started = Instant::now();
        let result = self.walk(site, set).await;
        record_resolution(set.name(), result.is_ok(), started.elapsed());

        match &result {
            Ok(resolved) => info!(
                query = %set.name(),
                url = %resolved.source.url,
                origin = ?resolved.source.origin,
                "Query resolved"
            ),
            Err(e) => debug!(query = %set.name(), attempted = e.attempted(), "Query unsatisfied"),
        }
        result
    }

    async fn walk(&self, site: &Url, set: &CandidateSet) -> Result<Resolved, Unsatisfied> {
        for (index, candidate) in set.candidates().iter().enumerate() {
            let url = match candidate.url(site) {
                Ok(url) => url,
                Err(e) => {
                    debug!(path = %candidate.path(), error = %e, "Candidate path does not form a URL");
                    CandidateOutcome::FetchFailed.record();
                    continue;
                },
            };
            let key = CacheKey::build(site.as_str(), candidate.path(), candidate.key_params());

            debug!(
                query = %set.name(),
                url = %url,
                cache_key = %key,
                validator = %candidate.validator().name(),
                "Trying candidate"
            );

            let stale = match self.cache.lookup(&key) {
                Lookup::Fresh(payload) => {
                    if candidate.validator().validate(&payload) {
                        CandidateOutcome::CacheHitValid.record();
                        return Ok(Resolved {
                            payload,
                            source: Self::describe(index, candidate, &url, Origin::Cache),
                        });
                    }
                    debug!(url = %url, "Cached payload failed validation, invalidating");
                    self.cache.delete(&key);
                    CandidateOutcome::CacheHitInvalid.record();
                    None
                },
                Lookup::Expired(entry) if !entry.revalidation().is_empty() => Some(entry),
                Lookup::Expired(_) | Lookup::Missing => None,
            };

            let (outcome, resolved) = self
                .fetch_candidate(index, candidate, url, key, stale, set)
                .await;
            outcome.record();
            if let Some(resolved) = resolved {
                return Ok(resolved);
            }
        }

        Err(Unsatisfied::new(set.name(), set.len()))
    }

    async fn fetch_candidate(
        &self,
        index: usize,
        candidate: &Candidate,
        url: Url,
        key: CacheKey,
        stale: Option<CacheEntry>,
        set: &CandidateSet,
    ) -> (CandidateOutcome, Option<Resolved>) {
        let mut request = FetchRequest::new(url.clone(), candidate.path());
        if let Some(entry) = &stale {
            request = request.conditional(entry.revalidation());
        }

        let response = match tokio::time::timeout(self.fetch_timeout, self.fetcher.fetch(&request)).await {
            Ok(Ok(response)) => response,
            Ok(Err(e)) => {
                debug!(url = %url, fetcher = %self.fetcher.name(), error = %e, "Failed to fetch candidate");
                return (CandidateOutcome::FetchFailed, None);
            },
            Err(_) => {
                debug!(url = %url, timeout = ?self.fetch_timeout, "Candidate fetch timed out");
                return (CandidateOutcome::TimedOut, None);
            },
        };

        if response.is_not_modified() {
            return match stale {
                Some(entry) => self.revalidated(index, candidate, url, key, entry, &response, set),
                None => {
                    debug!(url = %url, "Unexpected 304 for unconditional request");
                    (CandidateOutcome::FetchFailed, None)
                },
            };
        }

        if !response.is_success() {
            debug!(url = %url, status = response.status, "HTTP error from candidate");
            return (CandidateOutcome::FetchFailed, None);
        }

        if !candidate.validator().validate(&response.body) {
            debug!(
                url = %url,
                validator = %candidate.validator().name(),
                "Response failed validation"
            );
            return (CandidateOutcome::Rejected, None);
        }

        self.store(key, &response.body, response.revalidation(), set);
        let source = Self::describe(index, candidate, &url, Origin::Network);
        (
            CandidateOutcome::Validated,
            Some(Resolved {
                payload: response.body,
                source,
            }),
        )
    }

    #[allow(clippy::too_many_arguments)]
    fn revalidated(
        &self,
        index: usize,
        candidate: &Candidate,
        url: Url,
        key: CacheKey,
        entry: CacheEntry,
        response: &FetchResponse,
        set: &CandidateSet,
    ) -> (CandidateOutcome, Option<Resolved>) {
        let payload = entry.payload().clone();
        if !candidate.validator().validate(&payload) {
            debug!(url = %url, "Revalidated payload failed validation");
            return (CandidateOutcome::Rejected, None);
        }

        let mut tokens = entry.revalidation().clone();
        let fresh = response.revalidation();
        if fresh.entity_tag.is_some() {
            tokens.entity_tag = fresh.entity_tag;
        }
        if fresh.last_modified.is_some() {
            tokens.last_modified = fresh.last_modified;
        }

        self.store(key, &payload, tokens, set);
        debug!(url = %url, "Cache entry revalidated");
        (
            CandidateOutcome::Revalidated,
            Some(Resolved {
                payload,
                source: Self::describe(index, candidate, &url, Origin::Revalidated),
            }),
        )
    }

    fn store(
        &self,
        key: CacheKey,
        payload: &[u8],
        tokens: crate::cache::Revalidation,
        set: &CandidateSet,
    ) {
        match set.ttl_override() {
            Some(ttl) => self.cache.set_with_ttl(key, payload, tokens, ttl),
            None => self.cache.set(key, payload, tokens),
        }
    }

    fn describe(index: usize, candidate: &Candidate, url: &Url, origin: Origin) -> SourceDescriptor {
        SourceDescriptor {
            index,
            path: candidate.path().to_string(),
            url: url.to_string(),
            origin,
        }
    }
}

impl std::fmt::Debug for Resolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Resolver")
            .field("fetcher", &self.fetcher.name())
            .field("fetch_timeout", &self.fetch_timeout)
            .finish_non_exhaustive()
    }
}
