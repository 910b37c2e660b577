//! Modulo de serializacion de respuestas.
//!
//! Serializa los envelopes a JSON (por defecto) o YAML segun el header Accept.

pub mod json;
pub mod yaml;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use crate::extractors::accept::OutputFormat;

/// Error de serializacion.
#[derive(Debug)]
pub enum SerializeError {
    Json(serde_json::Error),
    Yaml(serde_yaml::Error),
}

impl From<serde_json::Error> for SerializeError {
    fn from(err: serde_json::Error) -> Self {
        SerializeError::Json(err)
    }
}

impl From<serde_yaml::Error> for SerializeError {
    fn from(err: serde_yaml::Error) -> Self {
        SerializeError::Yaml(err)
    }
}

impl std::fmt::Display for SerializeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SerializeError::Json(e) => write!(f, "JSON serialization error: {}", e),
            SerializeError::Yaml(e) => write!(f, "YAML serialization error: {}", e),
        }
    }
}

impl IntoResponse for SerializeError {
    fn into_response(self) -> Response {
        (StatusCode::INTERNAL_SERVER_ERROR, self.to_string()).into_response()
    }
}

/// Serializa `data` al formato especificado con status 200.
pub fn to_format<T: Serialize>(data: &T, format: OutputFormat) -> Result<Response, SerializeError> {
    to_format_with_status(data, format, StatusCode::OK)
}

/// Serializa `data` al formato especificado con el status dado.
pub fn to_format_with_status<T: Serialize>(
    data: &T,
    format: OutputFormat,
    status: StatusCode,
) -> Result<Response, SerializeError> {
    match format {
        OutputFormat::Json => json::to_response(data, status),
        OutputFormat::Yaml => yaml::to_response(data, status),
    }
}
