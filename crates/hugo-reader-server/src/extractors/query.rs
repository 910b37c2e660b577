//! Query string parameters for the read endpoints.
//!
//! Every field is optional at this layer so that a missing value reaches the
//! reader and comes back as a structured `INVALID_REQUEST` error.

use hugo_reader_site::{DiscoveryRequest, SearchRequest};
use serde::Deserialize;

/// `?site=`
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct SiteQuery {
    pub site: String,
}

/// `?site=&taxonomy=`
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct TermsQuery {
    pub site: String,
    pub taxonomy: String,
}

/// `?site=&query=&content_type=&taxonomy=&term=&limit=`
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct SearchQuery {
    pub site: String,
    pub query: String,
    pub content_type: Option<String>,
    pub taxonomy: Option<String>,
    pub term: Option<String>,
    pub limit: Option<usize>,
}

impl SearchQuery {
    pub fn to_request(&self) -> SearchRequest {
        SearchRequest {
            query: self.query.clone(),
            content_type: self.content_type.clone(),
            taxonomy: self.taxonomy.clone(),
            term: self.term.clone(),
            limit: self.limit,
        }
    }
}

/// `?site=&type=&limit=`
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct DiscoverQuery {
    pub site: String,
    #[serde(rename = "type")]
    pub discovery_type: Option<String>,
    pub limit: Option<usize>,
}

impl DiscoverQuery {
    pub fn to_request(&self) -> DiscoveryRequest {
        DiscoveryRequest {
            discovery_type: self.discovery_type.clone(),
            limit: self.limit,
        }
    }
}

/// `DELETE /cache?site=`
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct CacheQuery {
    pub site: Option<String>,
}

/// `GET /info?include_runtime=&include_tools=`
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct InfoQuery {
    pub include_runtime: bool,
    pub include_tools: bool,
}
