use axum::{
    Json,
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use hugo_reader_core::{ErrorCode, ReaderError};

use crate::handlers::response::{ErrorDetail, ErrorEnvelope};
use crate::response::SerializeError;

#[derive(Debug)]
pub enum AppError {
    /// Error de una operacion de consulta
    Reader(ReaderError),

    /// Parametros o body que no se pudieron decodificar
    BadRequest(String),

    /// Fallo al serializar la respuesta
    Serialize(SerializeError),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Reader(err) if err.is_not_found() => StatusCode::NOT_FOUND,
            AppError::Reader(err) if err.is_client_error() => StatusCode::BAD_REQUEST,
            AppError::Reader(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Serialize(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Error entry sent to the caller. Server-side failures only expose the
    /// generic message for their code.
    pub fn detail(&self) -> ErrorDetail {
        match self {
            AppError::Reader(err) if err.is_not_found() || err.is_client_error() => {
                ErrorDetail::new(err.code(), err.to_string())
            },
            AppError::Reader(err) => ErrorDetail::new(err.code(), err.code().user_message()),
            AppError::BadRequest(msg) => ErrorDetail::new(ErrorCode::InvalidRequest, msg.clone()),
            AppError::Serialize(_) => ErrorDetail::new(
                ErrorCode::InternalError,
                ErrorCode::InternalError.user_message(),
            ),
        }
    }
}

impl From<ReaderError> for AppError {
    fn from(err: ReaderError) -> Self {
        AppError::Reader(err)
    }
}

impl From<SerializeError> for AppError {
    fn from(err: SerializeError) -> Self {
        AppError::Serialize(err)
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        match &self {
            AppError::Reader(err) if status.is_server_error() => {
                tracing::error!(error = %err, code = %err.code(), "Request failed");
            },
            AppError::Serialize(err) => tracing::error!(error = %err, "Request failed"),
            _ => tracing::debug!(status = status.as_u16(), "Request rejected"),
        }

        let body = Json(ErrorEnvelope::single(self.detail()));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_reader_errors_to_status() {
        let cases = [
            (ReaderError::invalid_request("query", "query is required"), StatusCode::BAD_REQUEST),
            (ReaderError::invalid_site_url("ftp://x", "scheme"), StatusCode::BAD_REQUEST),
            (ReaderError::not_found("taxonomies"), StatusCode::NOT_FOUND),
            (ReaderError::internal("boom"), StatusCode::INTERNAL_SERVER_ERROR),
        ];

        for (err, expected) in cases {
            assert_eq!(AppError::from(err).status(), expected);
        }
    }

    #[test]
    fn internal_details_are_not_exposed() {
        let detail = AppError::from(ReaderError::internal("pool poisoned at 0x1f")).detail();

        assert_eq!(detail.code, ErrorCode::InternalError);
        assert!(!detail.message.contains("0x1f"));
    }

    #[test]
    fn not_found_names_the_resource() {
        let detail = AppError::from(ReaderError::not_found("sitemap")).detail();

        assert_eq!(detail.code, ErrorCode::NotFound);
        assert!(detail.message.contains("sitemap"));
    }
}
