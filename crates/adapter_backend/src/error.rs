//! Error types for backend communication.

use std::time::Duration;
use thiserror::Error;

/// Failure of a single backend call.
///
/// None of these are retried by the client; the caller decides whether to
/// re-invoke the operation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BackendError {
    /// Connection refused, DNS failure, broken pipe and the like
    #[error("Transport error: {0}")]
    Transport(String),

    /// No response within the configured timeout
    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    /// Requested resource does not exist on the backend
    #[error("Not found: {0}")]
    NotFound(String),

    /// Non-success HTTP status
    #[error("Backend returned {status}: {message}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Response body or reason phrase
        message: String,
    },

    /// Response body did not match the expected shape
    #[error("Decode error: {0}")]
    Decode(String),

    /// Request could not be built
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl BackendError {
    /// Create a transport error
    pub fn transport(msg: impl Into<String>) -> Self {
        Self::Transport(msg.into())
    }

    /// Create a decode error
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    /// Whether the backend answered at all.
    ///
    /// Transport failures and timeouts mean the outcome on the backend side is
    /// unknown; everything else is a definite answer.
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_) | Self::Timeout(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = BackendError::Status {
            status: 503,
            message: "goAML bridge unavailable".to_string(),
        };
        assert_eq!(err.to_string(), "Backend returned 503: goAML bridge unavailable");

        let err = BackendError::Timeout(Duration::from_secs(30));
        assert!(err.to_string().contains("30s"));
    }

    #[test]
    fn test_is_transport() {
        assert!(BackendError::transport("connection refused").is_transport());
        assert!(BackendError::Timeout(Duration::from_millis(5)).is_transport());
        assert!(!BackendError::NotFound("r1".into()).is_transport());
        assert!(!BackendError::decode("bad json").is_transport());
    }
}
