//! Query operations.
//!
//! Each operation builds a [`CandidateSet`](hugo_reader_core::CandidateSet)
//! describing where its data may live, hands it to the resolver and turns the
//! winning payload into a typed result with pure extraction functions.

pub mod content;
pub mod discovery;
pub mod search;
pub mod taxonomies;
pub mod terms;

use hugo_reader_core::{ReaderError, Result};
use serde_json::Value;

/// Default and maximum for a `limit` request field.
pub(crate) fn resolve_limit(limit: Option<usize>, default: usize, max: usize) -> Result<usize> {
    match limit {
        None => Ok(default),
        Some(n) if (1..=max).contains(&n) => Ok(n),
        Some(_) => Err(ReaderError::invalid_request(
            "limit",
            format!("limit must be between 1 and {max}"),
        )),
    }
}

/// Parses a validated payload.
pub(crate) fn parse_payload(resource: &str, payload: &[u8]) -> Result<Value> {
    serde_json::from_slice(payload).map_err(|e| ReaderError::parse(resource, e.to_string()))
}

/// Renders a JSON value as plain text: strings unquoted, other values compact.
pub(crate) fn text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Returns the `pages` array of a document, if it has one.
pub(crate) fn pages(doc: &Value) -> Option<&Vec<Value>> {
    doc.get("pages").and_then(Value::as_array)
}

/// Returns true if any page carries one of `keys`.
pub(crate) fn any_page_has(doc: &Value, keys: &[&str]) -> Option<bool> {
    pages(doc).map(|pages| {
        pages
            .iter()
            .any(|page| keys.iter().any(|key| page.get(*key).is_some()))
    })
}

/// Rejects names that would escape the endpoint path they are spliced into.
pub(crate) fn path_segment(field: &str, value: &str) -> Result<String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ReaderError::invalid_request(field, format!("{field} is required")));
    }
    if value
        .chars()
        .any(|c| matches!(c, '/' | '\\' | '?' | '#') || c.is_whitespace())
        || value == "."
        || value == ".."
    {
        return Err(ReaderError::invalid_request(
            field,
            format!("{field} must be a single path segment"),
        ));
    }
    Ok(value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_resolve_limit() {
        assert_eq!(resolve_limit(None, 50, 100).unwrap(), 50);
        assert_eq!(resolve_limit(Some(1), 50, 100).unwrap(), 1);
        assert_eq!(resolve_limit(Some(100), 50, 100).unwrap(), 100);
        assert!(resolve_limit(Some(0), 50, 100).is_err());
        assert!(resolve_limit(Some(101), 50, 100).is_err());
    }

    #[test]
    fn test_text() {
        assert_eq!(text(&json!("hello")), "hello");
        assert_eq!(text(&json!(3)), "3");
        assert_eq!(text(&json!(null)), "");
        assert_eq!(text(&json!({"a":1})), r#"{"a":1}"#);
    }

    #[test]
    fn test_any_page_has() {
        let doc = json!({"pages":[{"title":"a"},{"tags":["x"]}]});
        assert_eq!(any_page_has(&doc, &["tags"]), Some(true));
        assert_eq!(any_page_has(&doc, &["categories"]), Some(false));
        assert_eq!(any_page_has(&json!({}), &["tags"]), None);
    }

    #[test]
    fn test_path_segment() {
        assert_eq!(path_segment("taxonomy", " tags ").unwrap(), "tags");
        assert!(path_segment("taxonomy", "").is_err());
        assert!(path_segment("taxonomy", "../etc").is_err());
        assert!(path_segment("taxonomy", "..").is_err());
        assert!(path_segment("taxonomy", "a b").is_err());
    }
}
