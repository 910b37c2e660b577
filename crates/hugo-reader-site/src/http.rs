//! HTTP fetcher backed by `reqwest`.

use async_trait::async_trait;
use hugo_reader_core::{FetchError, FetchRequest, FetchResponse, Fetcher, ReaderError, Result};
use reqwest::Client;
use reqwest::header::{ETAG, IF_MODIFIED_SINCE, IF_NONE_MATCH, LAST_MODIFIED};
use tracing::debug;

use crate::config::SiteClientConfig;

/// Fetches candidate URLs over HTTP(S).
///
/// Sends `If-None-Match`/`If-Modified-Since` for conditional requests and
/// reports `ETag`/`Last-Modified` from the response. Any status is returned as
/// a response; only transport failures are errors.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
    timeout: std::time::Duration,
}

impl HttpFetcher {
    /// Creates a fetcher using the timeout and user agent of `config`.
    ///
    /// # Errors
    ///
    /// Returns an internal error if the HTTP client cannot be built.
    pub fn new(config: &SiteClientConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.http_timeout())
            .user_agent(config.user_agent())
            .build()
            .map_err(|e| ReaderError::internal(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            timeout: config.http_timeout(),
        })
    }

    fn header(response: &reqwest::Response, name: reqwest::header::HeaderName) -> Option<String> {
        response
            .headers()
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, request: &FetchRequest) -> std::result::Result<FetchResponse, FetchError> {
        let mut builder = self.client.get(request.url.clone());
        if let Some(tag) = &request.if_none_match {
            builder = builder.header(IF_NONE_MATCH, tag);
        }
        if let Some(since) = &request.if_modified_since {
            builder = builder.header(IF_MODIFIED_SINCE, since);
        }

        let response = builder.send().await.map_err(|e| {
            if e.is_timeout() {
                FetchError::timeout(request.url.as_str(), self.timeout)
            } else {
                FetchError::transport(request.url.as_str(), e.to_string())
            }
        })?;

        let status = response.status().as_u16();
        let entity_tag = Self::header(&response, ETAG);
        let last_modified = Self::header(&response, LAST_MODIFIED);

        let body = response.bytes().await.map_err(|e| {
            if e.is_timeout() {
                FetchError::timeout(request.url.as_str(), self.timeout)
            } else {
                FetchError::body(request.url.as_str(), e.to_string())
            }
        })?;

        debug!(
            url = %request.url,
            status = status,
            bytes = body.len(),
            "Fetched candidate"
        );

        let mut fetched = FetchResponse::with_status(status, body);
        if let Some(tag) = entity_tag {
            fetched = fetched.entity_tag(tag);
        }
        if let Some(modified) = last_modified {
            fetched = fetched.last_modified(modified);
        }
        Ok(fetched)
    }

    fn name(&self) -> &str {
        "http"
    }
}
