//! Keyword search.
//!
//! Native search endpoints are tried first. When none answers, content
//! indexes are scanned and scored locally.

use std::time::Duration;

use hugo_reader_core::{Candidate, CandidateSet, ReaderError, Resolved, Resolver, Result, Validator};
use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info};

use super::{pages, parse_payload, resolve_limit, text};
use crate::site::SiteUrl;

const DEFAULT_LIMIT: usize = 20;
const MAX_LIMIT: usize = 100;
const SNIPPET_CHARS: usize = 200;

pub const HUGO_NATIVE: &str = "hugo_native";
pub const CONTENT_SCAN: &str = "content_scan";

/// Search request.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchRequest {
    pub query: String,
    #[serde(default)]
    pub content_type: Option<String>,
    #[serde(default)]
    pub taxonomy: Option<String>,
    #[serde(default)]
    pub term: Option<String>,
    #[serde(default)]
    pub limit: Option<usize>,
}

impl SearchRequest {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            ..Self::default()
        }
    }

    pub fn content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    pub fn taxonomy_term(mut self, taxonomy: impl Into<String>, term: impl Into<String>) -> Self {
        self.taxonomy = Some(taxonomy.into());
        self.term = Some(term.into());
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// Request after defaults and validation; blank filters are dropped.
#[derive(Debug, Clone)]
struct Criteria {
    query: String,
    content_type: Option<String>,
    taxonomy_term: Option<(String, String)>,
    limit: usize,
}

fn non_blank(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

impl Criteria {
    fn from_request(request: &SearchRequest) -> Result<Self> {
        let query = request.query.trim();
        if query.is_empty() {
            return Err(ReaderError::invalid_request("query", "query is required"));
        }

        Ok(Self {
            query: query.to_string(),
            content_type: non_blank(&request.content_type),
            taxonomy_term: non_blank(&request.taxonomy).zip(non_blank(&request.term)),
            limit: resolve_limit(request.limit, DEFAULT_LIMIT, MAX_LIMIT)?,
        })
    }

    /// Filter parameters forwarded to native endpoints.
    fn filter_params(&self) -> Vec<(String, String)> {
        let mut params = Vec::new();
        if let Some(content_type) = &self.content_type {
            params.push(("type".to_string(), content_type.clone()));
        }
        if let Some((taxonomy, term)) = &self.taxonomy_term {
            params.push((taxonomy.clone(), term.clone()));
        }
        params.push(("limit".to_string(), self.limit.to_string()));
        params
    }
}

/// One search hit.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SearchHit {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub categories: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
}

impl SearchHit {
    fn from_item(item: &Value) -> Self {
        let string = |field: &str| item.get(field).map(text);
        Self {
            title: string("title"),
            url: string("url"),
            content: string("content"),
            summary: string("summary"),
            date: string("date"),
            categories: item.get("categories").cloned(),
            tags: item.get("tags").cloned(),
            score: item.get("score").and_then(Value::as_f64),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SearchMetadata {
    pub search_method: String,
    pub source_endpoint: String,
    /// Hits found before the limit was applied.
    pub result_count: usize,
    pub cached: bool,
    pub fallback_used: bool,
    pub limited: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct SearchResult {
    pub query: String,
    pub results: Vec<SearchHit>,
    pub metadata: SearchMetadata,
}

/// Accepts `results` or `hits` arrays, or a root array.
pub fn search_results_validator() -> Validator {
    Validator::json("search_results", |doc| {
        doc.get("results").is_some_and(Value::is_array)
            || doc.get("hits").is_some_and(Value::is_array)
            || doc.is_array()
    })
}

/// Accepts a non-empty page index, or a non-empty root array.
pub fn search_index_validator() -> Validator {
    Validator::json("search_index", |doc| match pages(doc) {
        Some(pages) => !pages.is_empty(),
        None => doc.as_array().is_some_and(|items| !items.is_empty()),
    })
}

fn native_candidates(criteria: &Criteria) -> CandidateSet {
    let endpoints = [
        ("/search.json", "q", search_results_validator()),
        ("/api/search.json", "query", search_results_validator()),
        ("/search/index.json", "q", search_results_validator()),
        ("/index.json", "search", search_index_validator()),
    ];

    endpoints
        .into_iter()
        .fold(CandidateSet::new("search"), |set, (path, param, validator)| {
            set.candidate(
                Candidate::new(path, validator)
                    .param(param, criteria.query.as_str())
                    .params(criteria.filter_params()),
            )
        })
}

fn scan_candidates() -> CandidateSet {
    CandidateSet::new("search_scan")
        .candidate(Candidate::new("/index.json", search_index_validator()))
        .candidate(Candidate::new("/content/index.json", search_results_validator()))
        .candidate(Candidate::new("/posts/index.json", search_results_validator()))
        .candidate(Candidate::new("/api/content.json", search_results_validator()))
        .candidate(Candidate::new("/all.json", search_results_validator()))
        .candidate(Candidate::new("/site.json", search_results_validator()))
}

/// Hits as returned by a native endpoint.
pub fn extract_native(doc: &Value) -> Vec<SearchHit> {
    result_items(doc)
        .map(|items| items.iter().map(SearchHit::from_item).collect())
        .unwrap_or_default()
}

fn result_items(doc: &Value) -> Option<&Vec<Value>> {
    doc.get("results")
        .and_then(Value::as_array)
        .or_else(|| doc.get("hits").and_then(Value::as_array))
        .or_else(|| doc.as_array())
}

/// Relevance of `item` for a lowercased query; `None` if nothing matches.
pub fn score(item: &Value, query: &str) -> Option<f64> {
    let mut matched = false;
    let mut score = 0.0;

    if let Some(title) = item.get("title").map(|v| text(v).to_lowercase())
        && title.contains(query)
    {
        matched = true;
        score += 10.0;
        if title == query {
            score += 20.0;
        }
    }

    for field in ["content", "body", "summary"] {
        if let Some(value) = item.get(field).map(|v| text(v).to_lowercase())
            && value.contains(query)
        {
            matched = true;
            score += 1.0 + value.matches(query).count() as f64;
        }
    }

    matched.then_some(score)
}

fn passes_filters(item: &Value, criteria: &Criteria) -> bool {
    if let Some(content_type) = &criteria.content_type
        && let Some(item_type) = item.get("type")
        && !text(item_type).eq_ignore_ascii_case(content_type)
    {
        return false;
    }

    if let Some((taxonomy, term)) = &criteria.taxonomy_term {
        return match item.get(taxonomy) {
            Some(Value::Array(values)) => values.iter().any(|v| text(v).eq_ignore_ascii_case(term)),
            Some(value) => text(value).eq_ignore_ascii_case(term),
            None => false,
        };
    }

    true
}

fn snippet(content: &str) -> String {
    match content.char_indices().nth(SNIPPET_CHARS) {
        Some((cut, _)) => format!("{}...", &content[..cut]),
        None => content.to_string(),
    }
}

/// Scores and filters the items of a content index, best first.
fn scan(doc: &Value, criteria: &Criteria) -> Vec<SearchHit> {
    let items = pages(doc).or_else(|| result_items(doc));
    let query = criteria.query.to_lowercase();

    let mut hits: Vec<SearchHit> = items
        .into_iter()
        .flatten()
        .filter_map(|item| {
            let score = score(item, &query)?;
            if !passes_filters(item, criteria) {
                return None;
            }
            let mut hit = SearchHit::from_item(item);
            hit.content = hit.content.as_deref().map(snippet);
            hit.score = Some(score);
            Some(hit)
        })
        .collect();

    hits.sort_by_key(|hit| std::cmp::Reverse(OrderedFloat(hit.score.unwrap_or_default())));
    hits
}

struct Outcome {
    method: &'static str,
    hits: Vec<SearchHit>,
    resolved: Resolved,
    fallback_used: bool,
}

/// Searches `site` for `request.query`.
///
/// # Errors
///
/// Returns `InvalidRequest` for a blank query or an out-of-range limit and
/// `NotFound` when neither a search endpoint nor a content index exists.
pub async fn run(
    resolver: &Resolver,
    site: &SiteUrl,
    request: &SearchRequest,
    ttl: Duration,
) -> Result<SearchResult> {
    let criteria = Criteria::from_request(request)?;

    let outcome = match resolver
        .resolve(site.url(), &native_candidates(&criteria).ttl(ttl))
        .await
    {
        Ok(resolved) => {
            let doc = parse_payload("search results", &resolved.payload)?;
            // A static page index ignores the query string.
            let hits = if pages(&doc).is_some() {
                scan(&doc, &criteria)
            } else {
                extract_native(&doc)
            };
            Outcome {
                method: HUGO_NATIVE,
                hits,
                resolved,
                fallback_used: false,
            }
        },
        Err(unsatisfied) => {
            debug!(site = %site, error = %unsatisfied, "Native search unavailable, scanning content");
            let resolved = resolver
                .resolve(site.url(), &scan_candidates().ttl(ttl))
                .await
                .map_err(|_| ReaderError::not_found("searchable content"))?;
            let doc = parse_payload("search content", &resolved.payload)?;
            Outcome {
                method: CONTENT_SCAN,
                hits: scan(&doc, &criteria),
                resolved,
                fallback_used: true,
            }
        },
    };

    let Outcome {
        method,
        mut hits,
        resolved,
        fallback_used,
    } = outcome;

    let result_count = hits.len();
    let limited = result_count > criteria.limit;
    hits.truncate(criteria.limit);

    info!(
        site = %site,
        query = %criteria.query,
        method = method,
        results = hits.len(),
        fallback = fallback_used,
        "Search completed"
    );

    Ok(SearchResult {
        query: criteria.query,
        results: hits,
        metadata: SearchMetadata {
            search_method: method.to_string(),
            cached: resolved.source.is_cached(),
            source_endpoint: resolved.source.url,
            result_count,
            fallback_used,
            limited,
        },
    })
}
