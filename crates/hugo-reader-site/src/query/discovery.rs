//! Site structure discovery: endpoint overview, sections, pages and sitemap.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;
use std::time::Duration;

use hugo_reader_core::{Candidate, CandidateSet, ReaderError, Resolved, Resolver, Result, Validator};
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info};

use super::{pages, parse_payload, resolve_limit, text};
use crate::site::SiteUrl;

const DEFAULT_LIMIT: usize = 50;
const MAX_LIMIT: usize = 200;

const OVERVIEW_JSON: [&str; 2] = ["/index.json", "/api/index.json"];
const OVERVIEW_OTHER: [&str; 2] = ["/sitemap.xml", "/robots.txt"];

static LOC: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"<loc>\s*([^<]*?)\s*</loc>").expect("Invalid sitemap regex - this is a compile-time bug")
});

/// What to discover.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiscoveryType {
    #[default]
    Overview,
    Sections,
    Pages,
    Sitemap,
}

impl DiscoveryType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Overview => "overview",
            Self::Sections => "sections",
            Self::Pages => "pages",
            Self::Sitemap => "sitemap",
        }
    }
}

impl fmt::Display for DiscoveryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DiscoveryType {
    type Err = ReaderError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "overview" => Ok(Self::Overview),
            "sections" => Ok(Self::Sections),
            "pages" => Ok(Self::Pages),
            "sitemap" => Ok(Self::Sitemap),
            other => Err(ReaderError::invalid_request(
                "type",
                format!("invalid discovery type: {other} (must be: overview, sections, pages, or sitemap)"),
            )),
        }
    }
}

/// Discovery request. A missing type means `overview`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DiscoveryRequest {
    #[serde(default, rename = "type")]
    pub discovery_type: Option<String>,
    #[serde(default)]
    pub limit: Option<usize>,
}

impl DiscoveryRequest {
    pub fn new(discovery_type: DiscoveryType) -> Self {
        Self {
            discovery_type: Some(discovery_type.as_str().to_string()),
            limit: None,
        }
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// An endpoint found by the overview probe.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EndpointSummary {
    pub endpoint: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pages_count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sections: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub taxonomies: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SectionSummary {
    pub section: String,
    pub count: usize,
    pub example_path: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageSummary {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub section: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SitemapEntry {
    pub url: String,
    pub path: String,
    pub source: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum DiscoveryItems {
    Endpoints(Vec<EndpointSummary>),
    Sections(Vec<SectionSummary>),
    Pages(Vec<PageSummary>),
    Sitemap(Vec<SitemapEntry>),
}

impl DiscoveryItems {
    pub fn len(&self) -> usize {
        match self {
            Self::Endpoints(items) => items.len(),
            Self::Sections(items) => items.len(),
            Self::Pages(items) => items.len(),
            Self::Sitemap(items) => items.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum DiscoveryMetadata {
    Overview {
        discovery_method: DiscoveryType,
        endpoints_found: usize,
        endpoints_checked: usize,
        available_endpoints: Vec<String>,
    },
    Sections {
        discovery_method: DiscoveryType,
        total_sections: usize,
        source: String,
    },
    Listing {
        discovery_method: DiscoveryType,
        total_found: usize,
        source: String,
        limited: bool,
    },
}

#[derive(Debug, Clone, Serialize)]
pub struct DiscoveryResult {
    pub discovery_type: DiscoveryType,
    pub results: DiscoveryItems,
    pub metadata: DiscoveryMetadata,
}

/// Accepts a JSON document with a `pages` array.
pub fn page_index_validator() -> Validator {
    Validator::json("page_index", |doc| pages(doc).is_some())
}

/// Accepts an XML sitemap or sitemap index.
pub fn sitemap_validator() -> Validator {
    Validator::new("sitemap", |body| {
        std::str::from_utf8(body)
            .is_ok_and(|xml| xml.contains("<urlset") || xml.contains("<sitemapindex") || xml.contains("<loc>"))
    })
}

fn single(name: &str, path: &str, validator: Validator, ttl: Duration) -> CandidateSet {
    CandidateSet::new(name)
        .candidate(Candidate::new(path, validator))
        .ttl(ttl)
}

/// Summarizes a JSON endpoint.
pub fn summarize_json(endpoint: &str, url: &str, doc: &Value) -> EndpointSummary {
    EndpointSummary {
        endpoint: endpoint.to_string(),
        kind: "json".to_string(),
        url: url.to_string(),
        pages_count: pages(doc).map(Vec::len),
        sections: doc.get("sections").cloned(),
        taxonomies: doc.get("taxonomies").cloned(),
        status: None,
    }
}

/// Counts pages per section, most populated first.
///
/// A page counts toward its `section` field and toward the first segment of
/// its `url`; both may name the same section.
pub fn count_sections(doc: &Value) -> Vec<SectionSummary> {
    let mut counts: HashMap<String, usize> = HashMap::new();

    for page in pages(doc).into_iter().flatten() {
        if let Some(section) = page.get("section").map(text) {
            *counts.entry(section).or_default() += 1;
        }
        if let Some(url) = page.get("url").map(text) {
            let first = url.trim_matches('/').split('/').next().unwrap_or_default();
            if !first.is_empty() {
                *counts.entry(first.to_string()).or_default() += 1;
            }
        }
    }

    let mut sections: Vec<SectionSummary> = counts
        .into_iter()
        .map(|(section, count)| SectionSummary {
            example_path: format!("/{section}/"),
            section,
            count,
        })
        .collect();
    sections.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.section.cmp(&b.section)));
    sections
}

/// Lists up to `limit` pages of an index.
pub fn list_pages(doc: &Value, limit: usize) -> Vec<PageSummary> {
    pages(doc)
        .into_iter()
        .flatten()
        .take(limit)
        .map(|page| {
            let string = |field: &str| page.get(field).map(text);
            PageSummary {
                title: string("title"),
                url: string("url"),
                path: string("url"),
                date: string("date"),
                section: string("section"),
            }
        })
        .collect()
}

/// Extracts up to `limit` absolute URLs from a sitemap.
pub fn parse_sitemap(xml: &str, site: &SiteUrl, limit: usize) -> Vec<SitemapEntry> {
    LOC.captures_iter(xml)
        .filter_map(|caps| caps.get(1).map(|m| m.as_str()))
        .filter(|loc| loc.starts_with("http"))
        .take(limit)
        .map(|loc| SitemapEntry {
            url: loc.to_string(),
            path: site.relative_path(loc).to_string(),
            source: "sitemap.xml".to_string(),
        })
        .collect()
}

/// Discovers the structure of `site`.
///
/// # Errors
///
/// Returns `InvalidRequest` for an unknown type or an out-of-range limit, and
/// `NotFound` when the index or sitemap required by the type is unavailable.
/// The overview never fails for lack of endpoints.
pub async fn run(
    resolver: &Resolver,
    site: &SiteUrl,
    request: &DiscoveryRequest,
    ttl: Duration,
) -> Result<DiscoveryResult> {
    let discovery_type = match request.discovery_type.as_deref().map(str::trim) {
        None | Some("") => DiscoveryType::default(),
        Some(value) => value.parse()?,
    };
    let limit = resolve_limit(request.limit, DEFAULT_LIMIT, MAX_LIMIT)?;

    let (results, metadata) = match discovery_type {
        DiscoveryType::Overview => overview(resolver, site, ttl).await?,
        DiscoveryType::Sections => {
            let (doc, resolved) = page_index(resolver, site, ttl).await?;
            let mut sections = count_sections(&doc);
            let total_sections = sections.len();
            sections.truncate(limit);
            debug!(endpoint = %resolved.source.url, total_sections, "Counted sections");
            (
                DiscoveryItems::Sections(sections),
                DiscoveryMetadata::Sections {
                    discovery_method: discovery_type,
                    total_sections,
                    source: "index.json".to_string(),
                },
            )
        },
        DiscoveryType::Pages => {
            let (doc, _) = page_index(resolver, site, ttl).await?;
            let pages = list_pages(&doc, limit);
            let metadata = DiscoveryMetadata::listing(discovery_type, pages.len(), "index.json", limit);
            (DiscoveryItems::Pages(pages), metadata)
        },
        DiscoveryType::Sitemap => {
            let resolved = resolver
                .resolve(site.url(), &single("discovery_sitemap", "/sitemap.xml", sitemap_validator(), ttl))
                .await
                .map_err(|_| ReaderError::not_found("sitemap"))?;
            let xml = String::from_utf8_lossy(&resolved.payload);
            let entries = parse_sitemap(&xml, site, limit);
            let metadata = DiscoveryMetadata::listing(discovery_type, entries.len(), "sitemap.xml", limit);
            (DiscoveryItems::Sitemap(entries), metadata)
        },
    };

    info!(
        site = %site,
        discovery_type = %discovery_type,
        results = results.len(),
        "Discovery completed"
    );

    Ok(DiscoveryResult {
        discovery_type,
        results,
        metadata,
    })
}

impl DiscoveryMetadata {
    fn listing(discovery_type: DiscoveryType, found: usize, source: &str, limit: usize) -> Self {
        Self::Listing {
            discovery_method: discovery_type,
            total_found: found,
            source: source.to_string(),
            limited: found >= limit,
        }
    }
}

async fn page_index(resolver: &Resolver, site: &SiteUrl, ttl: Duration) -> Result<(Value, Resolved)> {
    let resolved = resolver
        .resolve(site.url(), &single("discovery_index", "/index.json", page_index_validator(), ttl))
        .await
        .map_err(|_| ReaderError::not_found("site index"))?;
    let doc = parse_payload("site index", &resolved.payload)?;
    Ok((doc, resolved))
}

async fn overview(
    resolver: &Resolver,
    site: &SiteUrl,
    ttl: Duration,
) -> Result<(DiscoveryItems, DiscoveryMetadata)> {
    let mut endpoints = Vec::new();
    let mut available = Vec::new();

    for endpoint in OVERVIEW_JSON {
        let set = single("discovery_overview", endpoint, Validator::any_json(), ttl);
        if let Ok(resolved) = resolver.resolve(site.url(), &set).await {
            let doc = parse_payload(endpoint, &resolved.payload)?;
            endpoints.push(summarize_json(endpoint, &resolved.source.url, &doc));
            available.push(endpoint.to_string());
        }
    }

    for endpoint in OVERVIEW_OTHER {
        let set = single("discovery_overview", endpoint, Validator::non_empty(), ttl);
        if let Ok(resolved) = resolver.resolve(site.url(), &set).await {
            endpoints.push(EndpointSummary {
                endpoint: endpoint.to_string(),
                kind: "other".to_string(),
                url: resolved.source.url,
                pages_count: None,
                sections: None,
                taxonomies: None,
                status: Some("available".to_string()),
            });
            available.push(endpoint.to_string());
        }
    }

    let metadata = DiscoveryMetadata::Overview {
        discovery_method: DiscoveryType::Overview,
        endpoints_found: available.len(),
        endpoints_checked: OVERVIEW_JSON.len() + OVERVIEW_OTHER.len(),
        available_endpoints: available,
    };
    Ok((DiscoveryItems::Endpoints(endpoints), metadata))
}
