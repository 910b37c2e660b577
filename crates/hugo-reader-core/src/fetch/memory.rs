//! In-memory fetcher.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::{Mutex, RwLock};

use super::{FetchError, FetchRequest, FetchResponse, Fetcher};

#[derive(Debug, Clone)]
enum Route {
    Respond(FetchResponse),
    Fail(String),
    Delay(Duration, FetchResponse),
}

/// Fetcher serving canned responses by path.
///
/// Paths without a route answer `404`. A route whose response carries an
/// entity tag answers `304` to a request presenting the same tag in
/// `If-None-Match`. Every request is recorded in arrival order.
///
/// # Examples
///
/// ```
/// use hugo_reader_core::{FetchResponse, MemoryFetcher};
///
/// let fetcher = MemoryFetcher::new()
///     .json("/index.json", r#"{"pages":[]}"#)
///     .route("/tags/index.json", FetchResponse::with_status(500, "boom"));
/// assert_eq!(fetcher.call_count(), 0);
/// ```
#[derive(Debug, Default)]
pub struct MemoryFetcher {
    routes: RwLock<HashMap<String, Route>>,
    calls: Mutex<Vec<FetchRequest>>,
}

impl MemoryFetcher {
    /// Creates a fetcher with no routes.
    pub fn new() -> Self {
        Self::default()
    }

    /// Serves `body` with status 200 at `path`.
    pub fn json(self, path: impl Into<String>, body: impl Into<String>) -> Self {
        self.route(path, FetchResponse::ok(body.into()))
    }

    /// Serves `response` at `path`.
    pub fn route(self, path: impl Into<String>, response: FetchResponse) -> Self {
        self.set_route(path, response);
        self
    }

    /// Fails every request to `path` with a transport error.
    pub fn fail(self, path: impl Into<String>, message: impl Into<String>) -> Self {
        self.routes
            .write()
            .insert(path.into(), Route::Fail(message.into()));
        self
    }

    /// Serves `response` at `path` after sleeping for `delay`.
    pub fn delay(self, path: impl Into<String>, delay: Duration, response: FetchResponse) -> Self {
        self.routes
            .write()
            .insert(path.into(), Route::Delay(delay, response));
        self
    }

    /// Replaces the route for `path` on a shared fetcher.
    pub fn set_route(&self, path: impl Into<String>, response: FetchResponse) {
        self.routes
            .write()
            .insert(path.into(), Route::Respond(response));
    }

    /// Returns every recorded request.
    pub fn requests(&self) -> Vec<FetchRequest> {
        self.calls.lock().clone()
    }

    /// Returns the paths requested, in order.
    pub fn paths(&self) -> Vec<String> {
        self.calls.lock().iter().map(|r| r.path.clone()).collect()
    }

    /// Returns the total number of requests.
    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }

    /// Returns how many times `path` was requested.
    pub fn calls_to(&self, path: &str) -> usize {
        self.calls.lock().iter().filter(|r| r.path == path).count()
    }

    fn answer(response: &FetchResponse, request: &FetchRequest) -> FetchResponse {
        let unchanged = match (&response.entity_tag, &request.if_none_match) {
            (Some(tag), Some(presented)) => tag == presented,
            _ => false,
        };
        if unchanged {
            FetchResponse::not_modified().entity_tag(request.if_none_match.clone().unwrap_or_default())
        } else {
            response.clone()
        }
    }
}

#[async_trait]
impl Fetcher for MemoryFetcher {
    async fn fetch(&self, request: &FetchRequest) -> Result<FetchResponse, FetchError> {
        self.calls.lock().push(request.clone());
        let route = self.routes.read().get(&request.path).cloned();

        match route {
            None => Ok(FetchResponse::with_status(404, "not found")),
            Some(Route::Respond(response)) => Ok(Self::answer(&response, request)),
            Some(Route::Fail(message)) => Err(FetchError::transport(request.url.as_str(), message)),
            Some(Route::Delay(delay, response)) => {
                tokio::time::sleep(delay).await;
                Ok(Self::answer(&response, request))
            },
        }
    }

    fn name(&self) -> &str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::Revalidation;
    use url::Url;

    fn request(path: &str) -> FetchRequest {
        let url = Url::parse("https://example.com").unwrap().join(path).unwrap();
        FetchRequest::new(url, path)
    }

    #[tokio::test]
    async fn test_routes_and_missing_paths() {
        let fetcher = MemoryFetcher::new().json("/index.json", "{}");

        let found = fetcher.fetch(&request("/index.json")).await.unwrap();
        let missing = fetcher.fetch(&request("/nope.json")).await.unwrap();

        assert_eq!(found.status, 200);
        assert_eq!(missing.status, 404);
        assert_eq!(fetcher.paths(), vec!["/index.json", "/nope.json"]);
    }

    #[tokio::test]
    async fn test_failure_route() {
        let fetcher = MemoryFetcher::new().fail("/index.json", "connection reset");

        let err = fetcher.fetch(&request("/index.json")).await.unwrap_err();

        assert!(matches!(err, FetchError::Transport { .. }));
        assert_eq!(fetcher.calls_to("/index.json"), 1);
    }

    #[tokio::test]
    async fn test_not_modified_on_matching_tag() {
        let fetcher =
            MemoryFetcher::new().route("/index.json", FetchResponse::ok("{}").entity_tag("\"v1\""));
        let tokens = Revalidation::new(Some("\"v1\"".into()), None);

        let response = fetcher
            .fetch(&request("/index.json").conditional(&tokens))
            .await
            .unwrap();
        assert!(response.is_not_modified());

        let stale = Revalidation::new(Some("\"v0\"".into()), None);
        let response = fetcher
            .fetch(&request("/index.json").conditional(&stale))
            .await
            .unwrap();
        assert_eq!(response.status, 200);
    }
}
