//! Error types for Hugo Reader.
//!
//! Every error carries a stable [`ErrorCode`] and a user-facing message. The
//! `Display` output of [`ReaderError`] is meant for logs; the transport layer
//! reports [`ErrorCode::user_message`] plus a short summary to callers, never
//! the endpoint patterns that were tried.
//!
//! # Example
//!
//! ```
//! use hugo_reader_core::{ErrorCode, ReaderError, Result};
//!
//! fn taxonomy(name: &str) -> Result<&str> {
//!     if name.is_empty() {
//!         return Err(ReaderError::invalid_request("taxonomy", "taxonomy is required"));
//!     }
//!     Ok(name)
//! }
//!
//! let err = taxonomy("").unwrap_err();
//! assert_eq!(err.code(), ErrorCode::InvalidRequest);
//! ```

use std::fmt;

use serde::Serialize;
use thiserror::Error;

use crate::fetch::FetchError;
use crate::resolver::Unsatisfied;

/// Stable machine-readable error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    InvalidRequest,
    InvalidUrl,
    NetworkError,
    ValidationFailed,
    NotFound,
    Timeout,
    Unauthorized,
    RateLimited,
    InternalError,
    CacheError,
    ParseError,
}

impl ErrorCode {
    /// Returns the wire representation of the code.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InvalidRequest => "INVALID_REQUEST",
            Self::InvalidUrl => "INVALID_URL",
            Self::NetworkError => "NETWORK_ERROR",
            Self::ValidationFailed => "VALIDATION_FAILED",
            Self::NotFound => "NOT_FOUND",
            Self::Timeout => "TIMEOUT",
            Self::Unauthorized => "UNAUTHORIZED",
            Self::RateLimited => "RATE_LIMITED",
            Self::InternalError => "INTERNAL_ERROR",
            Self::CacheError => "CACHE_ERROR",
            Self::ParseError => "PARSE_ERROR",
        }
    }

    /// Returns a message suitable for end users.
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::InvalidRequest => "The request is missing required fields or contains invalid values.",
            Self::InvalidUrl => "The provided URL is not valid. Please check the Hugo site URL format.",
            Self::NetworkError => {
                "Unable to connect to the Hugo site. Please check your internet connection and the site URL."
            },
            Self::ValidationFailed => {
                "The response from the Hugo site doesn't contain the expected data structure."
            },
            Self::NotFound => "The requested content was not found on the Hugo site.",
            Self::Timeout => "The request timed out. The Hugo site may be slow to respond.",
            Self::Unauthorized => "Access denied. The Hugo site may require authentication.",
            Self::RateLimited => "Too many requests. Please wait a moment before trying again.",
            Self::InternalError => "An internal error occurred while processing your request.",
            Self::CacheError => "There was an issue with the cache system.",
            Self::ParseError => {
                "Unable to parse the response from the Hugo site. The data may be in an unexpected format."
            },
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Main error type for Hugo Reader operations.
#[derive(Debug, Error)]
pub enum ReaderError {
    /// A request field is missing or out of range.
    #[error("Invalid request field '{field}': {reason}")]
    InvalidRequest {
        /// Field that failed validation
        field: String,
        /// Why it's invalid
        reason: String,
    },

    /// The site URL could not be normalized.
    #[error("Invalid site URL '{url}': {reason}")]
    InvalidSiteUrl {
        /// The URL as provided by the caller
        url: String,
        /// Why it's invalid
        reason: String,
    },

    /// No candidate produced a payload that passed validation.
    #[error("No valid data found for {resource}")]
    NotFound {
        /// Logical resource that was requested (e.g. "taxonomy terms for 'tags'")
        resource: String,
    },

    /// A resource was found but could not be interpreted.
    #[error("Failed to parse {resource}: {message}")]
    Parse {
        /// Resource being parsed
        resource: String,
        /// Description of the parse error
        message: String,
    },

    /// A fetch failed outside candidate resolution.
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// Generic internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ReaderError {
    // ============================================
    // Convenience constructors
    // ============================================

    /// Creates an InvalidRequest error.
    pub fn invalid_request(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidRequest {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Creates an InvalidSiteUrl error.
    pub fn invalid_site_url(url: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidSiteUrl {
            url: url.into(),
            reason: reason.into(),
        }
    }

    /// Creates a NotFound error.
    pub fn not_found(resource: impl Into<String>) -> Self {
        Self::NotFound {
            resource: resource.into(),
        }
    }

    /// Creates a Parse error.
    pub fn parse(resource: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Parse {
            resource: resource.into(),
            message: message.into(),
        }
    }

    /// Creates an Internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    // ============================================
    // Query methods
    // ============================================

    /// Returns the stable code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::InvalidRequest { .. } => ErrorCode::InvalidRequest,
            Self::InvalidSiteUrl { .. } => ErrorCode::InvalidUrl,
            Self::NotFound { .. } => ErrorCode::NotFound,
            Self::Parse { .. } => ErrorCode::ParseError,
            Self::Fetch(e) if e.is_timeout() => ErrorCode::Timeout,
            Self::Fetch(_) => ErrorCode::NetworkError,
            Self::Internal(_) => ErrorCode::InternalError,
        }
    }

    /// Returns true if no valid data was found.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Returns true if the caller sent a bad request.
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::InvalidRequest { .. } | Self::InvalidSiteUrl { .. })
    }
}

impl From<Unsatisfied> for ReaderError {
    fn from(err: Unsatisfied) -> Self {
        Self::NotFound {
            resource: err.query().to_string(),
        }
    }
}

/// Type alias for Results with ReaderError.
pub type Result<T> = std::result::Result<T, ReaderError>;
