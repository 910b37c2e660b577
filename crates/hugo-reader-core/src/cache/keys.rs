//! Cache key generation and normalization.

use std::collections::BTreeMap;
use std::fmt;

use sha2::{Digest, Sha256};
use tracing::warn;
use url::Url;

/// Keys longer than this are collapsed to a digest.
pub const MAX_KEY_LEN: usize = 200;

const HASH_PREFIX: &str = "hash:";

/// Canonical cache key for one candidate of one site.
///
/// Built from the site root, the candidate path and the parameters sorted by
/// name, so the same inputs always produce the same key regardless of the
/// order the parameters were supplied in.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CacheKey(String);

impl CacheKey {
    /// Builds a key from a base URL, an endpoint path and parameters.
    ///
    /// A base that does not parse as an absolute URL with a host degrades to
    /// plain concatenation of base and path; this never fails.
    ///
    /// # Examples
    ///
    /// ```
    /// use hugo_reader_core::CacheKey;
    ///
    /// let a = CacheKey::build("https://example.com", "/search.json", [("q", "rust"), ("limit", "5")]);
    /// let b = CacheKey::build("https://example.com", "/search.json", [("limit", "5"), ("q", "rust")]);
    /// assert_eq!(a, b);
    /// assert_eq!(a.as_str(), "https://example.com/search.json?limit=5&q=rust");
    /// ```
    pub fn build<I, K, V>(base: &str, path: &str, params: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let sorted: BTreeMap<String, String> = params
            .into_iter()
            .map(|(k, v)| (k.as_ref().to_string(), v.as_ref().to_string()))
            .collect();

        let raw = match Url::parse(base) {
            Ok(url) if url.has_host() => Self::canonical(url, path, &sorted),
            Ok(_) => format!("{base}{path}"),
            Err(e) => {
                warn!(base = %base, error = %e, "Failed to parse base URL for cache key");
                format!("{base}{path}")
            },
        };

        Self::from_canonical(raw)
    }

    fn canonical(mut url: Url, path: &str, params: &BTreeMap<String, String>) -> String {
        url.set_path(path);
        url.set_fragment(None);
        url.set_query(None);
        if !params.is_empty() {
            // form-encoded: `&` and `=` inside values stay escaped
            url.query_pairs_mut().extend_pairs(params.iter());
        }
        url.into()
    }

    fn from_canonical(raw: String) -> Self {
        if raw.len() > MAX_KEY_LEN {
            let digest = Sha256::digest(raw.as_bytes());
            Self(format!("{HASH_PREFIX}{}", hex::encode(digest)))
        } else {
            Self(raw)
        }
    }

    /// Returns the key as a string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns true if the key was collapsed to a digest.
    pub fn is_hashed(&self) -> bool {
        self.0.starts_with(HASH_PREFIX)
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
