//! # Hugo Reader Site
//!
//! Read-only queries over Hugo static sites: taxonomies, terms, content,
//! search and structure discovery.
//!
//! Each query describes the endpoints where its data may live as a
//! [`CandidateSet`](hugo_reader_core::CandidateSet); the shared
//! [`Resolver`](hugo_reader_core::Resolver) finds the first valid one, served
//! from cache when possible.
//!
//! [`SiteReader`] is the entry point. [`HttpFetcher`] performs the network
//! I/O with `reqwest`.

pub mod cache_ops;
pub mod config;
pub mod http;
pub mod query;
pub mod reader;
pub mod site;

pub use cache_ops::{CacheReport, CleanReport, ClearReport};
pub use config::{SiteClientConfig, SiteClientConfigBuilder};
pub use http::HttpFetcher;
pub use query::content::{ContentItem, ContentMetadata, ContentRequest, ContentResult, Include};
pub use query::discovery::{
    DiscoveryItems, DiscoveryMetadata, DiscoveryRequest, DiscoveryResult, DiscoveryType,
};
pub use query::search::{SearchHit, SearchMetadata, SearchRequest, SearchResult};
pub use query::taxonomies::{TaxonomiesMetadata, TaxonomiesResult};
pub use query::terms::{TermsMetadata, TermsResult};
pub use reader::SiteReader;
pub use site::SiteUrl;
