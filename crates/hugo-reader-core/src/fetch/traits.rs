//! Fetcher trait definition.

use async_trait::async_trait;

use super::{FetchError, FetchRequest, FetchResponse};

/// A source of raw response bodies.
///
/// Implementations perform exactly one GET per call and report what came back.
/// Non-success statuses are returned as responses, not errors; the resolver
/// decides what to do with them.
///
/// # Example
///
/// ```ignore
/// use hugo_reader_core::{Fetcher, FetchError, FetchRequest, FetchResponse};
///
/// struct StaticFetcher;
///
/// #[async_trait]
/// impl Fetcher for StaticFetcher {
///     async fn fetch(&self, request: &FetchRequest) -> Result<FetchResponse, FetchError> {
///         Ok(FetchResponse::ok(r#"{"pages":[]}"#))
///     }
///
///     fn name(&self) -> &str {
///         "static"
///     }
/// }
/// ```
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Fetches one URL.
    ///
    /// # Errors
    ///
    /// - `FetchError::Transport` if the request could not be completed
    /// - `FetchError::Timeout` if the implementation enforces its own deadline
    /// - `FetchError::Body` if the body could not be read
    async fn fetch(&self, request: &FetchRequest) -> Result<FetchResponse, FetchError>;

    /// Returns the name of this fetcher.
    ///
    /// This is used for logging and identification purposes.
    fn name(&self) -> &str;
}

#[cfg(test)]
mod tests {
    use super::*;
    use url::Url;

    struct EchoFetcher {
        name: String,
    }

    #[async_trait]
    impl Fetcher for EchoFetcher {
        async fn fetch(&self, request: &FetchRequest) -> Result<FetchResponse, FetchError> {
            Ok(FetchResponse::ok(request.path.clone()))
        }

        fn name(&self) -> &str {
            &self.name
        }
    }

    #[tokio::test]
    async fn test_trait_object() {
        let fetcher: Box<dyn Fetcher> = Box::new(EchoFetcher {
            name: "echo".to_string(),
        });
        let url = Url::parse("https://example.com/tags/index.json").unwrap();

        let response = fetcher
            .fetch(&FetchRequest::new(url, "/tags/index.json"))
            .await
            .unwrap();

        assert_eq!(fetcher.name(), "echo");
        assert_eq!(response.body.as_ref(), b"/tags/index.json");
    }
}
