//! Terms of one taxonomy.

use hugo_reader_core::{Candidate, CandidateSet, Resolver, Result, Validator};
use indexmap::IndexSet;
use serde::Serialize;
use serde_json::Value;
use tracing::info;

use super::{any_page_has, pages, parse_payload, path_segment, text};
use crate::site::SiteUrl;

#[derive(Debug, Clone, Serialize)]
pub struct TermsResult {
    pub taxonomy: String,
    pub terms: Vec<String>,
    pub metadata: TermsMetadata,
}

#[derive(Debug, Clone, Serialize)]
pub struct TermsMetadata {
    pub source_endpoint: String,
    pub term_count: usize,
    pub cached: bool,
}

fn is_collection(value: &Value) -> bool {
    value.is_array() || value.is_object()
}

/// Accepts the term layouts a taxonomy endpoint may use.
///
/// The first key present decides: `terms`, then `{taxonomy}`, then a Hugo
/// `taxonomies` array whose first item has `name` plus `count` or `url`, then
/// pages carrying `{taxonomy}`.
pub fn terms_structure_validator(taxonomy: &str) -> Validator {
    let taxonomy = taxonomy.to_string();
    Validator::json("terms_structure", move |doc| {
        if let Some(terms) = doc.get("terms") {
            return is_collection(terms);
        }
        if let Some(terms) = doc.get(&taxonomy) {
            return is_collection(terms);
        }
        if let Some(first) = doc
            .get("taxonomies")
            .and_then(Value::as_array)
            .and_then(|items| items.first())
        {
            return first.get("name").is_some()
                && (first.get("count").is_some() || first.get("url").is_some());
        }
        any_page_has(doc, &[taxonomy.as_str()]).unwrap_or(false)
    })
}

/// Accepts a page index whose pages carry `{taxonomy}`, or a root `{taxonomy}` key.
pub fn terms_index_validator(taxonomy: &str) -> Validator {
    let taxonomy = taxonomy.to_string();
    Validator::json("terms_index", move |doc| {
        any_page_has(doc, &[taxonomy.as_str()]).unwrap_or_else(|| doc.get(&taxonomy).is_some())
    })
}

/// The ordered candidates for the terms of `taxonomy`.
pub fn candidates(taxonomy: &str) -> CandidateSet {
    let scoped = |path: String, validator: Validator| {
        Candidate::new(path, validator).scope("taxonomy", taxonomy)
    };

    CandidateSet::new("terms")
        .candidate(scoped(
            format!("/taxonomies/{taxonomy}/index.json"),
            terms_structure_validator(taxonomy),
        ))
        .candidate(scoped(
            format!("/{taxonomy}/index.json"),
            terms_structure_validator(taxonomy),
        ))
        .candidate(scoped(
            format!("/api/taxonomies/{taxonomy}.json"),
            terms_structure_validator(taxonomy),
        ))
        .candidate(scoped("/index.json".to_string(), terms_index_validator(taxonomy)))
}

/// Extracts term names from a validated document.
pub fn extract(doc: &Value, taxonomy: &str) -> Vec<String> {
    if let Some(terms) = doc.get("terms") {
        return names_of(terms, |item| Some(text(item)));
    }

    if let Some(terms) = doc.get(taxonomy) {
        return names_of(terms, |item| match item {
            Value::String(s) => Some(s.clone()),
            Value::Object(_) => item.get("name").or_else(|| item.get("title")).map(text),
            _ => None,
        });
    }

    if let Some(items) = doc.get("taxonomies").and_then(Value::as_array) {
        return items
            .iter()
            .filter_map(|item| item.get("name").map(text))
            .collect();
    }

    // Agregado sobre las paginas, en orden de aparicion y sin duplicados.
    let mut seen = IndexSet::new();
    for page in pages(doc).into_iter().flatten() {
        match page.get(taxonomy) {
            Some(Value::Array(values)) => {
                for value in values {
                    seen.insert(text(value));
                }
            },
            Some(Value::String(s)) => {
                seen.insert(s.clone());
            },
            _ => {},
        }
    }
    seen.into_iter().collect()
}

/// Array items through `item_name`, or object keys.
fn names_of<F>(value: &Value, item_name: F) -> Vec<String>
where
    F: Fn(&Value) -> Option<String>,
{
    match value {
        Value::Array(items) => items.iter().filter_map(item_name).collect(),
        Value::Object(map) => map.keys().cloned().collect(),
        _ => Vec::new(),
    }
}

/// Lists the terms of `taxonomy` on `site`.
///
/// # Errors
///
/// Returns `InvalidRequest` for a blank or path-like taxonomy and `NotFound`
/// when no endpoint has terms for it.
pub async fn run(resolver: &Resolver, site: &SiteUrl, taxonomy: &str) -> Result<TermsResult> {
    let taxonomy = path_segment("taxonomy", taxonomy)?;
    let resolved = resolver.resolve(site.url(), &candidates(&taxonomy)).await?;

    let doc = parse_payload("terms", &resolved.payload)?;
    let terms = extract(&doc, &taxonomy);

    info!(
        site = %site,
        taxonomy = %taxonomy,
        count = terms.len(),
        endpoint = %resolved.source.url,
        "Retrieved taxonomy terms"
    );

    let cached = resolved.source.is_cached();
    Ok(TermsResult {
        taxonomy,
        metadata: TermsMetadata {
            source_endpoint: resolved.source.url,
            term_count: terms.len(),
            cached,
        },
        terms,
    })
}
