#![allow(dead_code)]
use std::sync::Arc;

use hugo_reader_core::{MemoryFetcher, ResponseCache};
use hugo_reader_site::{SiteClientConfig, SiteReader};

pub const SITE: &str = "https://example.com";

/// Builds a reader over a fresh cache and the given canned routes.
pub fn reader(fetcher: Arc<MemoryFetcher>) -> SiteReader {
    SiteReader::new(
        Arc::new(ResponseCache::with_defaults()),
        fetcher,
        SiteClientConfig::default(),
    )
}

/// A small Hugo site index.
pub const INDEX: &str = r#"{
  "pages": [
    {
      "title": "Hello World",
      "url": "/posts/hello-world/",
      "slug": "hello-world",
      "section": "posts",
      "date": "2024-01-10",
      "summary": "A first post about Rust",
      "content": "Rust is fast. Rust is safe.",
      "tags": ["rust", "intro"],
      "categories": ["programming"],
      "type": "post"
    },
    {
      "title": "Rust",
      "url": "/posts/rust/",
      "section": "posts",
      "date": "2024-02-01",
      "content": "All about rust",
      "tags": ["rust"],
      "type": "post"
    },
    {
      "title": "About",
      "url": "/about/",
      "section": "pages",
      "content": "Who we are",
      "type": "page"
    }
  ]
}"#;
