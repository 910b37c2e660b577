//! Taxonomy listing.

use hugo_reader_core::{Candidate, CandidateSet, ReaderError, Resolver, Result, Validator};
use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info};

use super::{any_page_has, pages, parse_payload};
use crate::site::SiteUrl;

/// Keys that identify a taxonomy at the document root.
const COMMON_TAXONOMIES: [&str; 5] = ["categories", "tags", "series", "authors", "topics"];

/// Keys reported as taxonomies when extracting; `types` is listed but does not validate.
const EXTRACTED_TAXONOMIES: [&str; 6] = ["categories", "tags", "series", "authors", "topics", "types"];

/// Per-taxonomy endpoints probed when no aggregate endpoint exists.
const INDIVIDUAL_TAXONOMIES: [&str; 7] = [
    "categories",
    "tags",
    "themes",
    "methods",
    "authors",
    "series",
    "topics",
];

/// Reported as the source when taxonomies come from individual probes.
pub const INDIVIDUAL_DISCOVERY: &str = "individual_discovery";

/// Taxonomies of a site.
#[derive(Debug, Clone, Serialize)]
pub struct TaxonomiesResult {
    /// Taxonomy name mapped to its definition, in document order.
    pub taxonomies: IndexMap<String, Value>,
    pub metadata: TaxonomiesMetadata,
}

#[derive(Debug, Clone, Serialize)]
pub struct TaxonomiesMetadata {
    pub source_endpoint: String,
    pub taxonomy_count: usize,
    pub cached: bool,
}

/// Accepts a non-empty `taxonomies` object or any well-known taxonomy key.
pub fn taxonomy_structure_validator() -> Validator {
    Validator::json("taxonomy_structure", has_taxonomy_structure)
}

/// Accepts a page index whose pages carry taxonomy data, else a taxonomy structure.
pub fn taxonomy_index_validator() -> Validator {
    Validator::json("taxonomy_index", |doc| {
        any_page_has(doc, &["taxonomies", "categories", "tags"])
            .unwrap_or_else(|| has_taxonomy_structure(doc))
    })
}

fn has_taxonomy_structure(doc: &Value) -> bool {
    if let Some(Value::Object(map)) = doc.get("taxonomies") {
        return !map.is_empty();
    }
    COMMON_TAXONOMIES.iter().any(|key| doc.get(*key).is_some())
}

/// The ordered candidates for the taxonomy listing.
pub fn candidates() -> CandidateSet {
    CandidateSet::new("taxonomies")
        .candidate(Candidate::new("/taxonomies/index.json", taxonomy_structure_validator()))
        .candidate(Candidate::new("/index.json", taxonomy_index_validator()))
        .candidate(Candidate::new("/api/taxonomies.json", taxonomy_structure_validator()))
}

fn individual_candidates(name: &str) -> CandidateSet {
    CandidateSet::new("taxonomy_probe").candidate(Candidate::new(
        format!("/{name}/index.json"),
        Validator::json("taxonomies_array", |doc| doc["taxonomies"].is_array()),
    ))
}

/// Extracts taxonomy names from a validated document.
///
/// A `taxonomies` object is returned as is. Otherwise well-known root keys and
/// keys ending in `_taxonomy`/`_tax` are reported by name; for a page index,
/// the taxonomy keys found on pages are reported.
pub fn extract(doc: &Value) -> IndexMap<String, Value> {
    if let Some(Value::Object(map)) = doc.get("taxonomies") {
        return map.iter().map(|(k, v)| (k.clone(), v.clone())).collect();
    }

    let mut taxonomies = IndexMap::new();
    for key in EXTRACTED_TAXONOMIES {
        if doc.get(key).is_some() {
            taxonomies.insert(key.to_string(), Value::String(key.to_string()));
        }
    }

    if let Some(root) = doc.as_object() {
        for key in root.keys() {
            let base = key
                .strip_suffix("_taxonomy")
                .or_else(|| key.strip_suffix("_tax"));
            if let Some(base) = base {
                taxonomies.insert(base.to_string(), Value::String(base.to_string()));
            }
        }
    }

    if let Some(pages) = pages(doc) {
        for page in pages {
            for key in EXTRACTED_TAXONOMIES {
                if page.get(key).is_some() && !taxonomies.contains_key(key) {
                    taxonomies.insert(key.to_string(), Value::String(key.to_string()));
                }
            }
            if let Some(Value::Object(map)) = page.get("taxonomies") {
                for name in map.keys() {
                    if !taxonomies.contains_key(name) {
                        taxonomies.insert(name.clone(), Value::String(name.clone()));
                    }
                }
            }
        }
    }

    taxonomies
}

/// Lists the taxonomies of `site`.
///
/// # Errors
///
/// Returns `NotFound` if neither an aggregate endpoint nor any individual
/// taxonomy endpoint yields data.
pub async fn run(resolver: &Resolver, site: &SiteUrl) -> Result<TaxonomiesResult> {
    match resolver.resolve(site.url(), &candidates()).await {
        Ok(resolved) => {
            let doc = parse_payload("taxonomies", &resolved.payload)?;
            let taxonomies = extract(&doc);

            info!(
                site = %site,
                count = taxonomies.len(),
                endpoint = %resolved.source.url,
                "Retrieved taxonomies"
            );
            let cached = resolved.source.is_cached();
            Ok(TaxonomiesResult {
                metadata: TaxonomiesMetadata {
                    source_endpoint: resolved.source.url,
                    taxonomy_count: taxonomies.len(),
                    cached,
                },
                taxonomies,
            })
        },
        Err(unsatisfied) => {
            debug!(site = %site, error = %unsatisfied, "Aggregate taxonomy endpoints failed, probing individually");
            discover_individually(resolver, site).await
        },
    }
}

async fn discover_individually(resolver: &Resolver, site: &SiteUrl) -> Result<TaxonomiesResult> {
    let mut taxonomies = IndexMap::new();
    let mut all_cached = true;

    for name in INDIVIDUAL_TAXONOMIES {
        if let Ok(resolved) = resolver.resolve(site.url(), &individual_candidates(name)).await {
            debug!(name = name, url = %resolved.source.url, "Discovered taxonomy");
            all_cached &= resolved.source.is_cached();
            taxonomies.insert(name.to_string(), Value::String(name.to_string()));
        }
    }

    if taxonomies.is_empty() {
        return Err(ReaderError::not_found("taxonomies"));
    }

    info!(site = %site, count = taxonomies.len(), "Discovered taxonomies via individual endpoints");
    Ok(TaxonomiesResult {
        metadata: TaxonomiesMetadata {
            source_endpoint: INDIVIDUAL_DISCOVERY.to_string(),
            taxonomy_count: taxonomies.len(),
            cached: all_cached,
        },
        taxonomies,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_structure_validator() {
        let v = taxonomy_structure_validator();

        assert!(v.validate(br#"{"taxonomies":{"tags":{}}}"#));
        assert!(!v.validate(br#"{"taxonomies":{}}"#));
        assert!(v.validate(br#"{"tags":[]}"#));
        assert!(!v.validate(br#"{"types":[]}"#));
        assert!(!v.validate(b"[]"));
    }

    #[test]
    fn test_array_taxonomies_fall_back_to_common_keys() {
        let v = taxonomy_structure_validator();

        assert!(!v.validate(br#"{"taxonomies":["tags"]}"#));
        assert!(v.validate(br#"{"taxonomies":["tags"],"tags":[]}"#));
    }

    #[test]
    fn test_index_validator() {
        let v = taxonomy_index_validator();

        assert!(v.validate(br#"{"pages":[{"title":"a"},{"tags":["x"]}]}"#));
        assert!(!v.validate(br#"{"pages":[{"title":"a"}],"tags":[]}"#));
        assert!(v.validate(br#"{"categories":["x"]}"#));
    }

    #[test]
    fn test_extract_taxonomies_object_preserves_values() {
        let doc = json!({"taxonomies":{"tags":{"weight":1},"categories":"categories"}});
        let taxonomies = extract(&doc);

        assert_eq!(taxonomies.len(), 2);
        assert_eq!(taxonomies["tags"], json!({"weight":1}));
        let names: Vec<_> = taxonomies.keys().cloned().collect();
        assert_eq!(names, vec!["tags", "categories"]);
    }

    #[test]
    fn test_extract_root_keys_and_suffixes() {
        let doc = json!({"tags":[],"types":[],"region_taxonomy":[],"mood_tax":{}});
        let taxonomies = extract(&doc);

        assert_eq!(taxonomies["tags"], json!("tags"));
        assert_eq!(taxonomies["types"], json!("types"));
        assert_eq!(taxonomies["region"], json!("region"));
        assert_eq!(taxonomies["mood"], json!("mood"));
    }

    #[test]
    fn test_extract_from_pages() {
        let doc = json!({"pages":[
            {"title":"a","tags":["x"]},
            {"title":"b","taxonomies":{"series":["s"]},"categories":["c"]}
        ]});
        let names: Vec<_> = extract(&doc).keys().cloned().collect();

        assert_eq!(names, vec!["tags", "categories", "series"]);
    }
}
