//! Candidate endpoints and ordered candidate sets.

use std::collections::BTreeMap;
use std::time::Duration;

use url::Url;

use super::Validator;

/// One endpoint pattern to try for a query.
///
/// `params` are sent as the URL query string and take part in the cache key.
/// `scope` entries only take part in the cache key; they keep entries for the
/// same URL apart when different queries interpret the body differently.
#[derive(Debug, Clone)]
pub struct Candidate {
    path: String,
    params: BTreeMap<String, String>,
    scope: BTreeMap<String, String>,
    validator: Validator,
}

impl Candidate {
    /// Creates a candidate for an already expanded path.
    pub fn new(path: impl Into<String>, validator: Validator) -> Self {
        Self {
            path: path.into(),
            params: BTreeMap::new(),
            scope: BTreeMap::new(),
            validator,
        }
    }

    /// Adds a query parameter.
    pub fn param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(name.into(), value.into());
        self
    }

    /// Adds several query parameters.
    pub fn params<I, K, V>(mut self, params: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.params
            .extend(params.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    /// Adds a cache-key-only discriminator.
    pub fn scope(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.scope.insert(name.into(), value.into());
        self
    }

    /// Returns the endpoint path.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Returns the query parameters.
    pub fn query_params(&self) -> &BTreeMap<String, String> {
        &self.params
    }

    /// Returns the validator.
    pub fn validator(&self) -> &Validator {
        &self.validator
    }

    /// Returns every pair that takes part in the cache key.
    ///
    /// A query parameter wins over a scope entry of the same name.
    pub fn key_params(&self) -> BTreeMap<&str, &str> {
        self.scope
            .iter()
            .chain(self.params.iter())
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect()
    }

    /// Resolves the candidate against a site root.
    ///
    /// The path is absolute, so it replaces any path the site URL carried.
    pub fn url(&self, site: &Url) -> Result<Url, url::ParseError> {
        let mut url = site.join(&self.path)?;
        url.set_fragment(None);
        if self.params.is_empty() {
            url.set_query(None);
        } else {
            url.query_pairs_mut()
                .clear()
                .extend_pairs(self.params.iter());
        }
        Ok(url)
    }
}

/// A named, ordered list of candidates for one logical query.
#[derive(Debug, Clone)]
pub struct CandidateSet {
    name: String,
    candidates: Vec<Candidate>,
    ttl: Option<Duration>,
}

impl CandidateSet {
    /// Creates an empty set.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            candidates: Vec::new(),
            ttl: None,
        }
    }

    /// Appends a candidate.
    pub fn candidate(mut self, candidate: Candidate) -> Self {
        self.candidates.push(candidate);
        self
    }

    /// Appends a candidate in place.
    pub fn push(&mut self, candidate: Candidate) {
        self.candidates.push(candidate);
    }

    /// Caches winners with `ttl` instead of the cache default.
    pub fn ttl(mut self, ttl: Duration) -> Self {
        self.ttl = Some(ttl);
        self
    }

    /// Returns the query name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the TTL override, if any.
    pub fn ttl_override(&self) -> Option<Duration> {
        self.ttl
    }

    /// Returns the candidates in order.
    pub fn candidates(&self) -> &[Candidate] {
        &self.candidates
    }

    /// Returns the number of candidates.
    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    /// Returns true if the set is empty.
    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }
}
