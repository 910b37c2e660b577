//! Fetch errors.

use std::time::Duration;

/// Errors raised by a [`Fetcher`](super::Fetcher).
///
/// Inside candidate resolution these are never fatal: the candidate is
/// abandoned and the next one is tried.
#[derive(Debug, Clone, thiserror::Error)]
pub enum FetchError {
    /// The request could not be sent or the connection failed.
    #[error("transport error for {url}: {message}")]
    Transport { url: String, message: String },

    /// The request did not complete within its deadline.
    #[error("request to {url} timed out after {}ms", after.as_millis())]
    Timeout { url: String, after: Duration },

    /// The response body could not be read.
    #[error("failed to read body from {url}: {message}")]
    Body { url: String, message: String },
}

impl FetchError {
    /// Creates a transport error.
    pub fn transport(url: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Transport {
            url: url.into(),
            message: message.into(),
        }
    }

    /// Creates a timeout error.
    pub fn timeout(url: impl Into<String>, after: Duration) -> Self {
        Self::Timeout {
            url: url.into(),
            after,
        }
    }

    /// Creates a body read error.
    pub fn body(url: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Body {
            url: url.into(),
            message: message.into(),
        }
    }

    /// Returns true if the fetch timed out.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = FetchError::transport("https://example.com/a.json", "connection refused");
        assert_eq!(
            err.to_string(),
            "transport error for https://example.com/a.json: connection refused"
        );

        let err = FetchError::timeout("https://example.com/a.json", Duration::from_millis(1500));
        assert_eq!(
            err.to_string(),
            "request to https://example.com/a.json timed out after 1500ms"
        );
        assert!(err.is_timeout());
    }
}
