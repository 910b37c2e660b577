//! Content retrieval by path.

use hugo_reader_core::{Candidate, CandidateSet, ReaderError, Resolver, Result, Validator};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, warn};

use super::{any_page_has, pages, resolve_limit, text};
use crate::site::SiteUrl;

const DEFAULT_LIMIT: usize = 50;
const MAX_LIMIT: usize = 100;

/// Fields that count toward a content document.
const CONTENT_FIELDS: [&str; 7] = ["title", "content", "body", "summary", "date", "slug", "url"];

/// Front matter reported first, in this order.
const METADATA_FIELDS: [&str; 11] = [
    "title",
    "date",
    "slug",
    "url",
    "summary",
    "tags",
    "categories",
    "author",
    "description",
    "draft",
    "publishDate",
];

/// Body fields, never reported as metadata except `summary`.
const BODY_FIELDS: [&str; 4] = ["content", "body", "html", "summary"];

/// Which parts of a document to return.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Include {
    Metadata,
    Body,
    Both,
}

impl Include {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Metadata => "metadata",
            Self::Body => "body",
            Self::Both => "both",
        }
    }

    fn parse(value: &str) -> Result<Self> {
        match value {
            "metadata" => Ok(Self::Metadata),
            "body" => Ok(Self::Body),
            "both" => Ok(Self::Both),
            other => Err(ReaderError::invalid_request(
                "include",
                format!("invalid include value: {other} (must be: metadata, body, or both)"),
            )),
        }
    }
}

/// Content request.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContentRequest {
    /// Content paths such as `/posts/hello/`.
    pub paths: Vec<String>,
    /// Any of `metadata`, `body`, `both` (default: `both`).
    #[serde(default)]
    pub include: Vec<String>,
    /// Maximum number of documents returned (1-100, default 50).
    #[serde(default)]
    pub limit: Option<usize>,
}

impl ContentRequest {
    /// Creates a request for `paths` with default options.
    pub fn new<I, S>(paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            paths: paths.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    pub fn include(mut self, include: impl Into<String>) -> Self {
        self.include.push(include.into());
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}

#[derive(Debug, Clone)]
struct Validated {
    paths: Vec<String>,
    include: Vec<Include>,
    limit: usize,
}

impl Validated {
    fn from_request(request: &ContentRequest) -> Result<Self> {
        if request.paths.is_empty() {
            return Err(ReaderError::invalid_request("paths", "at least one path is required"));
        }

        let include = if request.include.is_empty() {
            vec![Include::Both]
        } else {
            request
                .include
                .iter()
                .map(|value| Include::parse(value))
                .collect::<Result<Vec<_>>>()?
        };

        Ok(Self {
            paths: request.paths.clone(),
            include,
            limit: resolve_limit(request.limit, DEFAULT_LIMIT, MAX_LIMIT)?,
        })
    }

    fn wants_metadata(&self) -> bool {
        self.include
            .iter()
            .any(|i| matches!(i, Include::Metadata | Include::Both))
    }

    fn wants_body(&self) -> bool {
        self.include
            .iter()
            .any(|i| matches!(i, Include::Body | Include::Both))
    }

    fn include_names(&self) -> Vec<String> {
        self.include.iter().map(|i| i.as_str().to_string()).collect()
    }
}

/// One retrieved document.
#[derive(Debug, Clone, Serialize)]
pub struct ContentItem {
    /// Path as requested.
    pub path: String,
    pub source_endpoint: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<IndexMap<String, Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<IndexMap<String, String>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ContentMetadata {
    pub requested_paths: usize,
    pub retrieved_count: usize,
    pub error_count: usize,
    pub limit_applied: usize,
    pub include_fields: Vec<String>,
}

/// Documents found plus one message per path that could not be retrieved.
#[derive(Debug, Clone, Serialize)]
pub struct ContentResult {
    pub content: Vec<ContentItem>,
    pub metadata: ContentMetadata,
    /// Per-path failures, e.g. `Path '/x/': content not found`.
    #[serde(skip)]
    pub errors: Vec<String>,
}

/// Accepts documents with at least two content fields.
pub fn content_structure_validator() -> Validator {
    Validator::json("content_structure", has_content_structure)
}

/// Accepts a page index whose pages carry content, else a content document.
pub fn content_index_validator() -> Validator {
    Validator::json("content_index", |doc| {
        any_page_has(doc, &["content", "body", "summary"])
            .unwrap_or_else(|| has_content_structure(doc))
    })
}

fn has_content_structure(doc: &Value) -> bool {
    CONTENT_FIELDS
        .iter()
        .filter(|field| doc.get(**field).is_some())
        .count()
        >= 2
}

/// Trims slashes; the site root becomes `index`.
pub fn clean_path(path: &str) -> String {
    let cleaned = path.trim().trim_matches('/');
    if cleaned.is_empty() {
        "index".to_string()
    } else {
        cleaned.to_string()
    }
}

/// The ordered candidates for one content path.
pub fn candidates(path: &str, include: &str) -> CandidateSet {
    let clean = clean_path(path);
    let scoped = |endpoint: String, validator: Validator| {
        Candidate::new(endpoint, validator)
            .scope("path", path)
            .scope("include", include)
    };

    CandidateSet::new("content")
        .candidate(scoped(format!("/{clean}.json"), content_structure_validator()))
        .candidate(scoped(format!("/{clean}/index.json"), content_structure_validator()))
        .candidate(scoped(format!("/content/{clean}.json"), content_structure_validator()))
        .candidate(scoped(
            format!("/content/{clean}/index.json"),
            content_structure_validator(),
        ))
        .candidate(scoped("/index.json".to_string(), content_index_validator()))
}

fn matches_path(candidate: Option<&Value>, requested: &str) -> bool {
    match candidate.and_then(Value::as_str) {
        Some(value) if !value.is_empty() => value.contains(requested) || requested.contains(value),
        _ => false,
    }
}

/// Selects the document for `requested` from a validated payload.
///
/// A page index yields the first page whose `url` or `slug` contains the
/// requested path or is contained in it; no match means the path is absent.
pub fn select_document<'a>(doc: &'a Value, requested: &str) -> Option<&'a Value> {
    match pages(doc) {
        Some(pages) => pages.iter().find(|page| {
            matches_path(page.get("url"), requested) || matches_path(page.get("slug"), requested)
        }),
        None => Some(doc),
    }
}

/// Known metadata fields first, then remaining front matter.
pub fn extract_metadata(document: &Value) -> IndexMap<String, Value> {
    let mut metadata = IndexMap::new();
    for field in METADATA_FIELDS {
        if let Some(value) = document.get(field) {
            metadata.insert(field.to_string(), value.clone());
        }
    }
    if let Some(map) = document.as_object() {
        for (key, value) in map {
            if matches!(key.as_str(), "content" | "body" | "html") || metadata.contains_key(key) {
                continue;
            }
            metadata.insert(key.clone(), value.clone());
        }
    }
    metadata
}

/// Body fields as text.
pub fn extract_body(document: &Value) -> IndexMap<String, String> {
    BODY_FIELDS
        .iter()
        .filter_map(|field| document.get(*field).map(|v| (field.to_string(), text(v))))
        .collect()
}

/// Retrieves content for each requested path.
///
/// Paths are processed in order until `limit` documents have been found.
/// Failures are collected per path and never abort the request.
///
/// # Errors
///
/// Returns `InvalidRequest` for an empty path list, an unknown include value
/// or an out-of-range limit.
pub async fn run(resolver: &Resolver, site: &SiteUrl, request: &ContentRequest) -> Result<ContentResult> {
    let request = Validated::from_request(request)?;
    let include = request.include_names().join(",");

    let mut content = Vec::new();
    let mut errors = Vec::new();

    for path in &request.paths {
        if content.len() >= request.limit {
            break;
        }

        match fetch_one(resolver, site, path, &include, &request).await {
            Ok(item) => content.push(item),
            Err(e) => {
                warn!(path = %path, error = %e, "Failed to retrieve content for path");
                errors.push(format!("Path '{path}': content not found"));
            },
        }
    }

    info!(
        site = %site,
        requested = request.paths.len(),
        retrieved = content.len(),
        errors = errors.len(),
        "Retrieved content"
    );

    Ok(ContentResult {
        metadata: ContentMetadata {
            requested_paths: request.paths.len(),
            retrieved_count: content.len(),
            error_count: errors.len(),
            limit_applied: request.limit,
            include_fields: request.include_names(),
        },
        content,
        errors,
    })
}

async fn fetch_one(
    resolver: &Resolver,
    site: &SiteUrl,
    path: &str,
    include: &str,
    request: &Validated,
) -> Result<ContentItem> {
    let resolved = resolver.resolve(site.url(), &candidates(path, include)).await?;
    let doc = super::parse_payload("content", &resolved.payload)?;
    let document =
        select_document(&doc, path).ok_or_else(|| ReaderError::not_found(format!("content '{path}'")))?;

    Ok(ContentItem {
        path: path.to_string(),
        source_endpoint: resolved.source.url,
        metadata: request.wants_metadata().then(|| extract_metadata(document)),
        body: request.wants_body().then(|| extract_body(document)),
    })
}
