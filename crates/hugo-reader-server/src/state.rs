//! Application state.

use std::sync::Arc;

use hugo_reader_core::{ResponseCache, Result};
use hugo_reader_site::SiteReader;

use crate::settings::Settings;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    reader: SiteReader,
}

impl AppState {
    /// Creates a new AppState around the given reader.
    pub fn new(reader: SiteReader) -> Self {
        Self { reader }
    }

    /// Builds the HTTP-backed reader described by `settings`.
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let cache = Arc::new(ResponseCache::with_ttl(settings.cache.default_ttl));
        let reader = SiteReader::http(cache, settings.client.clone())?;
        Ok(Self::new(reader))
    }

    pub fn reader(&self) -> &SiteReader {
        &self.reader
    }

    /// Returns the shared response cache.
    pub fn cache(&self) -> &Arc<ResponseCache> {
        self.reader.cache()
    }
}
