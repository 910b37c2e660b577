//! Site URL normalization.

use std::fmt;

use hugo_reader_core::{ReaderError, Result};
use url::Url;

/// A validated site root URL.
///
/// Input without a scheme is assumed to be `https`. Query strings and
/// fragments are dropped. Any path is ignored when endpoints are built:
/// candidate paths and cache keys are resolved against the site root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteUrl {
    url: Url,
}

impl SiteUrl {
    /// Parses and normalizes a site URL.
    ///
    /// # Errors
    ///
    /// Returns `InvalidRequest` for blank input and `InvalidSiteUrl` when the
    /// value cannot be parsed, has no host, or uses a scheme other than
    /// `http`/`https`.
    ///
    /// # Examples
    ///
    /// ```
    /// use hugo_reader_site::SiteUrl;
    ///
    /// let site = SiteUrl::parse("example.com").unwrap();
    /// assert_eq!(site.as_str(), "https://example.com/");
    /// ```
    pub fn parse(input: &str) -> Result<Self> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(ReaderError::invalid_request("site", "site URL is required"));
        }

        let candidate = if trimmed.contains("://") {
            trimmed.to_string()
        } else {
            format!("https://{trimmed}")
        };

        let mut url = Url::parse(&candidate)
            .map_err(|e| ReaderError::invalid_site_url(trimmed, e.to_string()))?;

        if !matches!(url.scheme(), "http" | "https") {
            return Err(ReaderError::invalid_site_url(
                trimmed,
                format!("unsupported scheme '{}'", url.scheme()),
            ));
        }
        if !url.has_host() {
            return Err(ReaderError::invalid_site_url(trimmed, "missing host"));
        }

        url.set_query(None);
        url.set_fragment(None);
        Ok(Self { url })
    }

    /// Returns the parsed URL.
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Returns the normalized URL as a string.
    pub fn as_str(&self) -> &str {
        self.url.as_str()
    }

    /// Returns `scheme://host[:port]`.
    pub fn origin(&self) -> String {
        self.url.origin().ascii_serialization()
    }

    /// Returns `url` relative to this site, or `url` unchanged if it points elsewhere.
    pub fn relative_path<'a>(&self, url: &'a str) -> &'a str {
        let origin = self.origin();
        match url.strip_prefix(origin.as_str()) {
            Some("") => "/",
            Some(rest) if rest.starts_with('/') => rest,
            _ => url,
        }
    }
}

impl fmt::Display for SiteUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.url.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hugo_reader_core::ErrorCode;

    #[test]
    fn test_adds_https_scheme() {
        let site = SiteUrl::parse("blog.example.com").unwrap();
        assert_eq!(site.url().scheme(), "https");
        assert_eq!(site.origin(), "https://blog.example.com");
    }

    #[test]
    fn test_keeps_http_and_path() {
        let site = SiteUrl::parse("http://localhost:1313/docs/?x=1#top").unwrap();
        assert_eq!(site.as_str(), "http://localhost:1313/docs/");
        assert_eq!(site.origin(), "http://localhost:1313");
    }

    #[test]
    fn test_blank_is_invalid_request() {
        let err = SiteUrl::parse("   ").unwrap_err();
        assert_eq!(err.code(), ErrorCode::InvalidRequest);
    }

    #[test]
    fn test_rejects_other_schemes() {
        let err = SiteUrl::parse("ftp://example.com").unwrap_err();
        assert_eq!(err.code(), ErrorCode::InvalidUrl);
    }

    #[test]
    fn test_rejects_garbage() {
        let err = SiteUrl::parse("https://exa mple.com").unwrap_err();
        assert_eq!(err.code(), ErrorCode::InvalidUrl);
    }

    #[test]
    fn test_relative_path() {
        let site = SiteUrl::parse("https://example.com").unwrap();

        assert_eq!(site.relative_path("https://example.com/posts/a/"), "/posts/a/");
        assert_eq!(site.relative_path("https://example.com"), "/");
        assert_eq!(site.relative_path("https://other.com/x/"), "https://other.com/x/");
        assert_eq!(
            site.relative_path("https://example.com.evil/x/"),
            "https://example.com.evil/x/"
        );
    }
}
