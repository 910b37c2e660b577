//! Fetch capability used by the resolver.
//!
//! The resolver never talks to the network directly; it calls a [`Fetcher`].
//! Production code plugs in an HTTP implementation, tests use [`MemoryFetcher`].

mod error;
mod memory;
mod traits;

pub use error::FetchError;
pub use memory::MemoryFetcher;
pub use traits::Fetcher;

use bytes::Bytes;
use url::Url;

use crate::cache::Revalidation;

/// One GET request for a candidate URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    /// Absolute URL, query parameters included.
    pub url: Url,
    /// Candidate path the URL was built from.
    pub path: String,
    /// Value for `If-None-Match`.
    pub if_none_match: Option<String>,
    /// Value for `If-Modified-Since`.
    pub if_modified_since: Option<String>,
}

impl FetchRequest {
    /// Creates an unconditional request.
    pub fn new(url: Url, path: impl Into<String>) -> Self {
        Self {
            url,
            path: path.into(),
            if_none_match: None,
            if_modified_since: None,
        }
    }

    /// Makes the request conditional on previously stored tokens.
    pub fn conditional(mut self, revalidation: &Revalidation) -> Self {
        self.if_none_match = revalidation.entity_tag.clone();
        self.if_modified_since = revalidation.last_modified.clone();
        self
    }

    /// Returns true if any conditional header will be sent.
    pub fn is_conditional(&self) -> bool {
        self.if_none_match.is_some() || self.if_modified_since.is_some()
    }
}

/// Status, body and revalidation headers of a completed fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchResponse {
    pub status: u16,
    pub body: Bytes,
    pub entity_tag: Option<String>,
    pub last_modified: Option<String>,
}

impl FetchResponse {
    /// A `200 OK` response with the given body.
    pub fn ok(body: impl Into<Bytes>) -> Self {
        Self::with_status(200, body)
    }

    /// A response with an arbitrary status.
    pub fn with_status(status: u16, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            body: body.into(),
            entity_tag: None,
            last_modified: None,
        }
    }

    /// A `304 Not Modified` response.
    pub fn not_modified() -> Self {
        Self::with_status(304, Bytes::new())
    }

    /// Sets the `ETag` header.
    pub fn entity_tag(mut self, value: impl Into<String>) -> Self {
        self.entity_tag = Some(value.into());
        self
    }

    /// Sets the `Last-Modified` header.
    pub fn last_modified(mut self, value: impl Into<String>) -> Self {
        self.last_modified = Some(value.into());
        self
    }

    /// Returns true for 2xx statuses.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Returns true for `304 Not Modified`.
    pub fn is_not_modified(&self) -> bool {
        self.status == 304
    }

    /// Returns the revalidation tokens carried by this response.
    pub fn revalidation(&self) -> Revalidation {
        Revalidation::new(self.entity_tag.clone(), self.last_modified.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conditional_request() {
        let url = Url::parse("https://example.com/index.json").unwrap();
        let plain = FetchRequest::new(url.clone(), "/index.json");
        assert!(!plain.is_conditional());

        let tokens = Revalidation::new(Some("\"v1\"".into()), Some("Mon, 01 Jan 2024".into()));
        let conditional = FetchRequest::new(url, "/index.json").conditional(&tokens);
        assert_eq!(conditional.if_none_match.as_deref(), Some("\"v1\""));
        assert!(conditional.is_conditional());
    }

    #[test]
    fn test_response_status_helpers() {
        assert!(FetchResponse::ok("{}").is_success());
        assert!(!FetchResponse::with_status(404, "").is_success());
        assert!(FetchResponse::not_modified().is_not_modified());
        assert!(!FetchResponse::not_modified().is_success());
    }

    #[test]
    fn test_response_revalidation() {
        let response = FetchResponse::ok("{}").entity_tag("\"abc\"");
        assert_eq!(
            response.revalidation().entity_tag.as_deref(),
            Some("\"abc\"")
        );
        assert!(FetchResponse::ok("{}").revalidation().is_empty());
    }
}
