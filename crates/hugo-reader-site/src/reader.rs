//! Entry point for querying Hugo sites.

use std::sync::Arc;

use hugo_reader_core::{Fetcher, Resolver, ResponseCache, Result};
use tracing::instrument;

use crate::cache_ops::{self, CacheReport, ClearReport, CleanReport};
use crate::config::SiteClientConfig;
use crate::http::HttpFetcher;
use crate::query::content::{self, ContentRequest, ContentResult};
use crate::query::discovery::{self, DiscoveryRequest, DiscoveryResult};
use crate::query::search::{self, SearchRequest, SearchResult};
use crate::query::taxonomies::{self, TaxonomiesResult};
use crate::query::terms::{self, TermsResult};
use crate::site::SiteUrl;

/// Runs every query operation against one shared cache.
///
/// Cheap to clone; clones share the cache and the fetcher.
///
/// # Example
///
/// ```ignore
/// let cache = Arc::new(ResponseCache::with_defaults());
/// let reader = SiteReader::http(cache, SiteClientConfig::default())?;
///
/// let terms = reader.terms("example.com", "tags").await?;
/// println!("{} tags", terms.metadata.term_count);
/// ```
#[derive(Debug, Clone)]
pub struct SiteReader {
    resolver: Arc<Resolver>,
    config: SiteClientConfig,
}

impl SiteReader {
    /// Creates a reader over an arbitrary fetcher.
    pub fn new(cache: Arc<ResponseCache>, fetcher: Arc<dyn Fetcher>, config: SiteClientConfig) -> Self {
        let resolver = Resolver::new(cache, fetcher).with_fetch_timeout(config.http_timeout());
        Self {
            resolver: Arc::new(resolver),
            config,
        }
    }

    /// Creates a reader that fetches over HTTP.
    ///
    /// # Errors
    ///
    /// Returns an internal error if the HTTP client cannot be built.
    pub fn http(cache: Arc<ResponseCache>, config: SiteClientConfig) -> Result<Self> {
        let fetcher = HttpFetcher::new(&config)?;
        Ok(Self::new(cache, Arc::new(fetcher), config))
    }

    pub fn config(&self) -> &SiteClientConfig {
        &self.config
    }

    pub fn cache(&self) -> &Arc<ResponseCache> {
        self.resolver.cache()
    }

    #[instrument(skip(self))]
    pub async fn taxonomies(&self, site: &str) -> Result<TaxonomiesResult> {
        let site = SiteUrl::parse(site)?;
        taxonomies::run(&self.resolver, &site).await
    }

    #[instrument(skip(self))]
    pub async fn terms(&self, site: &str, taxonomy: &str) -> Result<TermsResult> {
        let site = SiteUrl::parse(site)?;
        terms::run(&self.resolver, &site, taxonomy).await
    }

    #[instrument(skip(self, request), fields(paths = request.paths.len()))]
    pub async fn content(&self, site: &str, request: &ContentRequest) -> Result<ContentResult> {
        let site = SiteUrl::parse(site)?;
        content::run(&self.resolver, &site, request).await
    }

    #[instrument(skip(self, request), fields(query = %request.query))]
    pub async fn search(&self, site: &str, request: &SearchRequest) -> Result<SearchResult> {
        let site = SiteUrl::parse(site)?;
        search::run(&self.resolver, &site, request, self.config.search_ttl()).await
    }

    #[instrument(skip(self, request))]
    pub async fn discover(&self, site: &str, request: &DiscoveryRequest) -> Result<DiscoveryResult> {
        let site = SiteUrl::parse(site)?;
        discovery::run(&self.resolver, &site, request, self.config.discovery_ttl()).await
    }

    pub fn cache_stats(&self) -> CacheReport {
        CacheReport::from_cache(self.cache())
    }

    /// Clears the cache, or only the entries of the `site` given.
    pub fn clear_cache(&self, site: Option<&str>) -> Result<ClearReport> {
        cache_ops::clear(self.cache(), site)
    }

    pub fn clean_cache(&self) -> CleanReport {
        cache_ops::clean(self.cache())
    }
}
