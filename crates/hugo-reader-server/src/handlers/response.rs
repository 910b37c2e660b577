//! Response envelope shared by every query endpoint.

use std::time::SystemTime;

use hugo_reader_core::ErrorCode;
use serde::Serialize;

/// `{"success": true, ...data, "errors": []}`
///
/// The payload is flattened into the top level so clients read e.g.
/// `taxonomies` and `metadata` directly.
#[derive(Debug, Clone, Serialize)]
pub struct Envelope<T> {
    pub success: bool,
    #[serde(flatten)]
    pub data: T,
    pub errors: Vec<ErrorDetail>,
}

impl<T> Envelope<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
            errors: Vec::new(),
        }
    }

    /// Success with partial, per-item errors (e.g. missing content paths).
    pub fn with_errors(data: T, errors: Vec<ErrorDetail>) -> Self {
        Self {
            success: true,
            data,
            errors,
        }
    }
}

/// Cuerpo de error: `{"success": false, "errors": [...]}`.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorEnvelope {
    pub success: bool,
    pub errors: Vec<ErrorDetail>,
}

impl ErrorEnvelope {
    pub fn single(detail: ErrorDetail) -> Self {
        Self {
            success: false,
            errors: vec![detail],
        }
    }
}

/// One user-facing error entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorDetail {
    pub code: ErrorCode,
    pub message: String,
    /// RFC 3339, second precision.
    pub timestamp: String,
}

impl ErrorDetail {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            timestamp: humantime::format_rfc3339_seconds(SystemTime::now()).to_string(),
        }
    }
}
