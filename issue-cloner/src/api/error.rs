//! Tracker API error types.

use thiserror::Error;

/// Errors surfaced by a Jira-compatible tracker API.
///
/// This is a closed taxonomy rather than an ad hoc status field so that
/// every catch site matches exhaustively. Retryability is a property of the
/// variant, not of the call site.
#[derive(Debug, Clone, Error)]
pub enum ApiError {
    /// Request never reached the server (DNS, connect, CORS, timeout).
    /// Corresponds to HTTP status 0 in browser terms. Retryable.
    #[error("network error: {0}")]
    Network(String),

    /// The server failed transiently (5xx). Retryable.
    #[error("server error ({status}): {message}")]
    Server { status: u16, message: String },

    /// The server explicitly refused the request (400, 403, 404).
    /// Repeating an invalid request cannot succeed, so never retried.
    #[error("request rejected ({status}): {message}")]
    Rejected { status: u16, message: String },

    /// Authentication failed (401). Not retryable; the credentials are wrong.
    #[error("authentication failed: {0}")]
    Auth(String),
}

impl ApiError {
    /// Returns true for failures worth repeating (transient network or
    /// server conditions), false for ones a retry cannot fix.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Network(_) | Self::Server { .. } => true,
            Self::Rejected { .. } | Self::Auth(_) => false,
        }
    }

    /// Maps an HTTP status and response body to the matching variant.
    #[must_use]
    pub fn from_status(status: u16, message: String) -> Self {
        match status {
            0 => Self::Network(message),
            401 => Self::Auth(message),
            s if s >= 500 => Self::Server { status: s, message },
            s => Self::Rejected { status: s, message },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn retryability_follows_the_taxonomy() {
        assert!(ApiError::Network("connection refused".into()).is_retryable());
        assert!(ApiError::from_status(503, "unavailable".into()).is_retryable());
        assert!(!ApiError::from_status(400, "bad jql".into()).is_retryable());
        assert!(!ApiError::from_status(403, "forbidden".into()).is_retryable());
        assert!(!ApiError::from_status(401, "bad token".into()).is_retryable());
    }
}
