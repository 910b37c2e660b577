//! Query endpoint handlers.

use axum::{
    Json,
    extract::{
        Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    response::Response,
};
use hugo_reader_core::ErrorCode;
use hugo_reader_site::ContentRequest;
use serde::Deserialize;
use tracing::instrument;

use crate::error::AppError;
use crate::extractors::{
    accept::AcceptFormat,
    query::{DiscoverQuery, SearchQuery, SiteQuery, TermsQuery},
};
use crate::handlers::response::{Envelope, ErrorDetail};
use crate::response::to_format;
use crate::state::AppState;

/// Body for POST /content.
#[derive(Debug, Deserialize)]
pub struct ContentBody {
    #[serde(default)]
    pub site: String,
    #[serde(flatten)]
    pub request: ContentRequest,
}

/// GET /taxonomies?site=
#[instrument(skip_all)]
pub async fn get_taxonomies(
    State(state): State<AppState>,
    params: Result<Query<SiteQuery>, QueryRejection>,
    AcceptFormat(format): AcceptFormat,
) -> Result<Response, AppError> {
    let Query(params) = params?;

    let result = state.reader().taxonomies(&params.site).await?;

    Ok(to_format(&Envelope::ok(result), format)?)
}

/// GET /terms?site=&taxonomy=
#[instrument(skip_all)]
pub async fn get_terms(
    State(state): State<AppState>,
    params: Result<Query<TermsQuery>, QueryRejection>,
    AcceptFormat(format): AcceptFormat,
) -> Result<Response, AppError> {
    let Query(params) = params?;

    let result = state.reader().terms(&params.site, &params.taxonomy).await?;

    Ok(to_format(&Envelope::ok(result), format)?)
}

/// POST /content
///
/// Paths that could not be resolved are reported in `errors` while the
/// request as a whole still succeeds.
#[instrument(skip_all)]
pub async fn post_content(
    State(state): State<AppState>,
    AcceptFormat(format): AcceptFormat,
    body: Result<Json<ContentBody>, JsonRejection>,
) -> Result<Response, AppError> {
    let Json(body) = body?;

    let result = state.reader().content(&body.site, &body.request).await?;

    let errors = result
        .errors
        .iter()
        .map(|message| ErrorDetail::new(ErrorCode::NotFound, message.clone()))
        .collect();

    Ok(to_format(&Envelope::with_errors(result, errors), format)?)
}

/// GET /search?site=&query=&content_type=&taxonomy=&term=&limit=
#[instrument(skip_all)]
pub async fn get_search(
    State(state): State<AppState>,
    params: Result<Query<SearchQuery>, QueryRejection>,
    AcceptFormat(format): AcceptFormat,
) -> Result<Response, AppError> {
    let Query(params) = params?;

    let result = state.reader().search(&params.site, &params.to_request()).await?;

    Ok(to_format(&Envelope::ok(result), format)?)
}

/// GET /discover?site=&type=&limit=
#[instrument(skip_all)]
pub async fn get_discover(
    State(state): State<AppState>,
    params: Result<Query<DiscoverQuery>, QueryRejection>,
    AcceptFormat(format): AcceptFormat,
) -> Result<Response, AppError> {
    let Query(params) = params?;

    let result = state.reader().discover(&params.site, &params.to_request()).await?;

    Ok(to_format(&Envelope::ok(result), format)?)
}
