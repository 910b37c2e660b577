//! Payload validators.

use std::fmt;
use std::sync::Arc;

use serde_json::Value;

type Check = dyn Fn(&[u8]) -> bool + Send + Sync;

/// A named predicate deciding whether a response body has the expected shape.
///
/// Validators are pure: they see only the bytes (plus whatever context their
/// closure captured) and never mutate shared state. Malformed input is a
/// rejection, never a panic.
#[derive(Clone)]
pub struct Validator {
    name: String,
    check: Arc<Check>,
}

impl Validator {
    /// Creates a validator over raw bytes.
    pub fn new<F>(name: impl Into<String>, check: F) -> Self
    where
        F: Fn(&[u8]) -> bool + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            check: Arc::new(check),
        }
    }

    /// Creates a validator over parsed JSON. Bodies that are not valid JSON fail.
    ///
    /// # Examples
    ///
    /// ```
    /// use hugo_reader_core::Validator;
    ///
    /// let pages = Validator::json("pages", |v| v["pages"].is_array());
    /// assert!(pages.validate(br#"{"pages":[]}"#));
    /// assert!(!pages.validate(b"<html>"));
    /// ```
    pub fn json<F>(name: impl Into<String>, check: F) -> Self
    where
        F: Fn(&Value) -> bool + Send + Sync + 'static,
    {
        Self::new(name, move |body| {
            serde_json::from_slice::<Value>(body)
                .map(|value| check(&value))
                .unwrap_or(false)
        })
    }

    /// Accepts any well-formed JSON document.
    pub fn any_json() -> Self {
        Self::json("any_json", |_| true)
    }

    /// Accepts any non-empty body.
    pub fn non_empty() -> Self {
        Self::new("non_empty", |body| !body.iter().all(u8::is_ascii_whitespace))
    }

    /// Returns the validator name, used in logs.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Runs the predicate.
    pub fn validate(&self, body: &[u8]) -> bool {
        (self.check)(body)
    }
}

impl fmt::Debug for Validator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Validator")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_validator_rejects_malformed() {
        let v = Validator::json("terms", |v| v.get("terms").is_some());

        assert!(v.validate(br#"{"terms":[]}"#));
        assert!(!v.validate(br#"{"other":1}"#));
        assert!(!v.validate(b"{not json"));
        assert!(!v.validate(b""));
    }

    #[test]
    fn test_captured_context() {
        let taxonomy = "tags".to_string();
        let v = Validator::json("named", move |v| v.get(&taxonomy).is_some());

        assert!(v.validate(br#"{"tags":["a"]}"#));
        assert!(!v.validate(br#"{"categories":["a"]}"#));
    }

    #[test]
    fn test_non_empty() {
        let v = Validator::non_empty();

        assert!(v.validate(b"User-agent: *"));
        assert!(!v.validate(b"  \n"));
        assert!(!v.validate(b""));
    }

    #[test]
    fn test_debug_shows_name() {
        let v = Validator::any_json();
        assert!(format!("{v:?}").contains("any_json"));
    }
}
