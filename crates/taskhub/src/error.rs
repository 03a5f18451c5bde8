//! Unified error handling for the dashboard core.
//!
//! Every user-triggered action returns [`ApiResult`]; callers report the
//! error where the action started. Nothing here is retried.

use thiserror::Error;

/// Failure of the local key-value store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Storage encoding error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Unified error type for dashboard actions
#[derive(Debug, Error)]
pub enum ApiError {
    /// Request never produced a response (connection, DNS, TLS...)
    #[error("Network error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Backend answered with a non-success status
    #[error("Request failed ({status}): {message}")]
    Status { status: u16, message: String },

    /// Response body was not the JSON we expected
    #[error("Invalid response: {0}")]
    Decode(#[from] serde_json::Error),

    /// Response body was valid JSON of the wrong shape
    #[error("Unexpected response: {0}")]
    UnexpectedResponse(String),

    /// Input rejected before any request was sent
    #[error("Invalid input: {0}")]
    Validation(#[from] validator::ValidationErrors),

    /// Input rejected before any request was sent, outside derive validation
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Entity missing from the local cache
    #[error("{0} not found")]
    NotFound(String),

    /// Action needs a signed-in user
    #[error("Not signed in")]
    Unauthenticated,

    /// Third-party identity provider failed
    #[error("Identity provider error: {0}")]
    Identity(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl ApiError {
    pub fn not_found(what: impl Into<String>) -> Self {
        ApiError::NotFound(what.into())
    }

    pub fn invalid(message: impl Into<String>) -> Self {
        ApiError::InvalidInput(message.into())
    }

    /// Network/transport failure: the action was aborted without any state change.
    pub fn is_transport(&self) -> bool {
        matches!(self, ApiError::Transport(_))
    }

    /// Local validation failure: no request was sent.
    pub fn is_validation(&self) -> bool {
        matches!(self, ApiError::Validation(_) | ApiError::InvalidInput(_))
    }

    /// Backend refused the caller (401/403).
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::Status { status: 401 | 403, .. })
    }
}

/// Result type alias for dashboard actions
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classification() {
        let err = ApiError::Status {
            status: 403,
            message: "Forbidden".to_string(),
        };
        assert!(err.is_unauthorized());
        assert!(!err.is_validation());
        assert!(!err.is_transport());

        assert!(ApiError::invalid("title is required").is_validation());

        let err = ApiError::UnexpectedResponse("expected a list".to_string());
        assert!(!err.is_validation());
        assert!(!err.is_transport());
    }

    #[test]
    fn test_status_message() {
        let err = ApiError::Status {
            status: 400,
            message: "Invalid credentials".to_string(),
        };
        assert_eq!(err.to_string(), "Request failed (400): Invalid credentials");
    }
}
