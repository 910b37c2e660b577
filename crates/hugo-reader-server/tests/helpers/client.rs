//! Test client helpers.

use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Request, Response, StatusCode},
};
use http_body_util::BodyExt;
use hugo_reader_core::{MemoryFetcher, ResponseCache};
use hugo_reader_server::{AppState, create_router, create_router_with_state, metrics};
use hugo_reader_site::{SiteClientConfig, SiteReader};
use tower::ServiceExt;

/// Helper para tests de integracion HTTP.
pub struct TestClient {
    app: Router,
    state: Option<AppState>,
}

impl TestClient {
    /// Crea un nuevo test client con el router proporcionado.
    pub fn new(app: Router) -> Self {
        Self { app, state: None }
    }

    /// Shared state, when the router was built with one.
    pub fn state(&self) -> &AppState {
        self.state.as_ref().expect("client built without state")
    }

    pub async fn get(&self, uri: &str) -> TestResponse {
        self.send("GET", uri, &[], Body::empty()).await
    }

    /// GET con header Accept personalizado.
    pub async fn get_with_accept(&self, uri: &str, accept: &str) -> TestResponse {
        self.send("GET", uri, &[("accept", accept)], Body::empty())
            .await
    }

    /// GET con headers personalizados.
    pub async fn get_with_headers(&self, uri: &str, headers: Vec<(&str, &str)>) -> TestResponse {
        self.send("GET", uri, &headers, Body::empty()).await
    }

    /// POST con body JSON.
    pub async fn post_json(&self, uri: &str, body: &str) -> TestResponse {
        let headers = [("content-type", "application/json")];
        self.send("POST", uri, &headers, Body::from(body.to_string()))
            .await
    }

    pub async fn post(&self, uri: &str) -> TestResponse {
        self.send("POST", uri, &[], Body::empty()).await
    }

    pub async fn delete(&self, uri: &str) -> TestResponse {
        self.send("DELETE", uri, &[], Body::empty()).await
    }

    async fn send(
        &self,
        method: &str,
        uri: &str,
        headers: &[(&str, &str)],
        body: Body,
    ) -> TestResponse {
        let mut builder = Request::builder().uri(uri).method(method);
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }

        self.request(builder.body(body).unwrap()).await
    }

    /// Ejecuta un request arbitrario.
    async fn request(&self, request: Request<Body>) -> TestResponse {
        let response = self
            .app
            .clone()
            .oneshot(request)
            .await
            .expect("Request failed");

        TestResponse::from_response(response).await
    }
}

/// Wrapper sobre Response con helpers para assertions.
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: axum::http::HeaderMap,
    pub body: Vec<u8>,
}

impl TestResponse {
    async fn from_response(response: Response<Body>) -> Self {
        let status = response.status();
        let headers = response.headers().clone();
        let body = response
            .into_body()
            .collect()
            .await
            .expect("Failed to read body")
            .to_bytes()
            .to_vec();

        Self {
            status,
            headers,
            body,
        }
    }

    /// Retorna el body como string.
    pub fn text(&self) -> String {
        String::from_utf8(self.body.clone()).expect("Body is not valid UTF-8")
    }

    /// Parsea el body como JSON.
    pub fn json<T: serde::de::DeserializeOwned>(&self) -> T {
        serde_json::from_slice(&self.body).expect("Failed to parse JSON")
    }

    /// Retorna un header especifico.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Verifica que el status sea el esperado.
    pub fn assert_status(&self, expected: StatusCode) -> &Self {
        assert_eq!(
            self.status,
            expected,
            "Expected status {} but got {}. Body: {}",
            expected,
            self.status,
            self.text()
        );
        self
    }

    /// Verifica que el Content-Type contenga el valor esperado.
    pub fn assert_content_type_contains(&self, expected: &str) -> &Self {
        let content_type = self
            .header("content-type")
            .expect("Response missing Content-Type header");

        assert!(
            content_type.contains(expected),
            "Expected Content-Type to contain '{}' but got '{}'",
            expected,
            content_type
        );
        self
    }

    /// Verifica que un header exista.
    pub fn assert_header_exists(&self, name: &str) -> &Self {
        assert!(
            self.headers.contains_key(name),
            "Expected header '{}' to exist",
            name
        );
        self
    }

    /// Verifica que un header tenga un valor especifico.
    pub fn assert_header(&self, name: &str, expected: &str) -> &Self {
        let value = self
            .header(name)
            .unwrap_or_else(|| panic!("Header '{}' not found", name));

        assert_eq!(
            value, expected,
            "Expected header '{}' to be '{}' but got '{}'",
            name, expected, value
        );
        self
    }
}

/// Crea un TestClient con el router sin state (health e info).
pub fn client() -> TestClient {
    TestClient::new(create_router())
}

/// Crea un TestClient con el router completo sobre rutas en memoria.
pub fn site_client(fetcher: Arc<MemoryFetcher>) -> TestClient {
    let reader = SiteReader::new(
        Arc::new(ResponseCache::with_defaults()),
        fetcher,
        SiteClientConfig::default(),
    );
    let state = AppState::new(reader);
    let handle = metrics::build_recorder().expect("recorder").handle();

    TestClient {
        app: create_router_with_state(state.clone(), handle),
        state: Some(state),
    }
}
