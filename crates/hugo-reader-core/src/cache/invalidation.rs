//! Cache invalidation with pattern matching support.

use glob::Pattern;
use serde::Serialize;
use tracing::{debug, info};
use url::Url;

use super::store::ResponseCache;

/// Resultado de una operación de invalidación.
#[derive(Debug, Clone, Serialize)]
pub struct InvalidationResult {
    /// Número de entries invalidadas.
    pub count: usize,
    /// Patrones aplicados.
    pub patterns: Vec<String>,
}

impl ResponseCache {
    /// Invalidates every entry belonging to a site.
    ///
    /// The site is reduced to its origin (`scheme://host[:port]`), so any path
    /// on the site matches. Keys collapsed to a digest carry no site and are
    /// left in place.
    ///
    /// # Examples
    ///
    /// ```
    /// use hugo_reader_core::{CacheKey, ResponseCache, Revalidation};
    ///
    /// let cache = ResponseCache::with_defaults();
    /// let no_params: [(&str, &str); 0] = [];
    /// cache.set(CacheKey::build("https://a.example", "/index.json", no_params), b"{}", Revalidation::none());
    /// cache.set(CacheKey::build("https://b.example", "/index.json", no_params), b"{}", Revalidation::none());
    ///
    /// let result = cache.invalidate_site("https://a.example/blog/");
    /// assert_eq!(result.count, 1);
    /// assert_eq!(cache.len(), 1);
    /// ```
    pub fn invalidate_site(&self, site: &str) -> InvalidationResult {
        let pattern = match Url::parse(site) {
            Ok(url) if url.has_host() => {
                format!("{}/*", Pattern::escape(&url.origin().ascii_serialization()))
            },
            _ => format!("{}*", Pattern::escape(site)),
        };
        self.invalidate_by_pattern(&pattern)
    }

    /// Invalida entradas usando un patrón glob sobre la key completa.
    ///
    /// - `*`: coincide con cualquier secuencia de caracteres
    /// - `?`: coincide con un carácter
    pub fn invalidate_by_pattern(&self, pattern_str: &str) -> InvalidationResult {
        let pattern = match Pattern::new(pattern_str) {
            Ok(p) => p,
            Err(e) => {
                debug!(pattern = %pattern_str, error = %e, "Invalid glob pattern");
                return InvalidationResult {
                    count: 0,
                    patterns: vec![pattern_str.to_string()],
                };
            },
        };

        let count = self.remove_where(|key| !key.is_hashed() && pattern.matches(key.as_str()));
        for _ in 0..count {
            self.metrics().record_eviction("manual");
        }

        info!(
            pattern = %pattern_str,
            count = count,
            "Cache entries invalidated by pattern"
        );

        InvalidationResult {
            count,
            patterns: vec![pattern_str.to_string()],
        }
    }
}
