//! Cache management endpoint handlers.

use axum::{
    extract::{Query, State, rejection::QueryRejection},
    response::Response,
};
use tracing::instrument;

use crate::error::AppError;
use crate::extractors::{accept::AcceptFormat, query::CacheQuery};
use crate::handlers::response::Envelope;
use crate::response::to_format;
use crate::state::AppState;

/// GET /cache
/// Estadisticas de la cache.
#[instrument(skip_all)]
pub async fn cache_stats(
    State(state): State<AppState>,
    AcceptFormat(format): AcceptFormat,
) -> Result<Response, AppError> {
    let report = state.reader().cache_stats();
    Ok(to_format(&Envelope::ok(report), format)?)
}

/// DELETE /cache[?site=]
/// Invalida toda la cache o solo las entries de un sitio.
#[instrument(skip_all)]
pub async fn clear_cache(
    State(state): State<AppState>,
    params: Result<Query<CacheQuery>, QueryRejection>,
    AcceptFormat(format): AcceptFormat,
) -> Result<Response, AppError> {
    let Query(params) = params?;

    let report = state.reader().clear_cache(params.site.as_deref())?;

    tracing::info!(
        action = %report.action,
        count = report.removed_count,
        "Cache entries invalidated"
    );

    Ok(to_format(&Envelope::ok(report), format)?)
}

/// POST /cache/clean
/// Elimina las entries expiradas.
#[instrument(skip_all)]
pub async fn clean_cache(
    State(state): State<AppState>,
    AcceptFormat(format): AcceptFormat,
) -> Result<Response, AppError> {
    let report = state.reader().clean_cache();

    tracing::info!(count = report.removed_count, "Expired cache entries removed");

    Ok(to_format(&Envelope::ok(report), format)?)
}
