//! Sync error types.

use reqwest::StatusCode;
use thiserror::Error;

/// Errors returned by [`ApiClient`](super::ApiClient) calls.
#[derive(Error, Debug)]
pub enum ApiError {
    /// The request never produced a response.
    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The server answered with a non-2xx status.
    #[error("Server returned {status}{}", .message.as_deref().map(|m| format!(": {}", m)).unwrap_or_default())]
    Status {
        status: StatusCode,
        /// The body's `error` field, when present.
        message: Option<String>,
    },

    /// The response body could not be decoded.
    #[error("Invalid response body: {0}")]
    Decode(#[from] serde_json::Error),
}

impl ApiError {
    /// Message the server wants shown to the user, if it sent one.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            ApiError::Status { message, .. } => message.as_deref(),
            _ => None,
        }
    }

    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            ApiError::Transport(e) => e.status(),
            ApiError::Decode(_) => None,
        }
    }
}

/// Problems caught locally before any request is made.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Missing required field(s): {}", .0.join(", "))]
    MissingFields(Vec<&'static str>),

    #[error("At least one field is required to update.")]
    NoChanges,

    #[error("Unknown field '{0}'")]
    UnknownField(String),
}

/// Errors surfaced by a [`ResourceController`](super::ResourceController).
///
/// Each variant carries the same text the controller put in its notice.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SyncError {
    /// Loading the collection failed; the previous items were kept.
    #[error("{0}")]
    Fetch(String),

    /// The server rejected a create, update or delete.
    #[error("{0}")]
    Mutation(String),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The caller lacks the privilege the resource requires.
    #[error("{0}")]
    Authorization(String),

    #[error("No record is being edited")]
    NoEditSession,

    #[error("No {kind} with id {id}")]
    UnknownRecord { kind: &'static str, id: String },

    /// A record could not be turned into a form draft.
    #[error("Invalid record: {0}")]
    InvalidRecord(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_error_display_includes_message() {
        let err = ApiError::Status {
            status: StatusCode::BAD_REQUEST,
            message: Some("title is required".into()),
        };
        assert_eq!(
            err.to_string(),
            "Server returned 400 Bad Request: title is required"
        );
        assert_eq!(err.server_message(), Some("title is required"));
        assert_eq!(err.status(), Some(StatusCode::BAD_REQUEST));
    }

    #[test]
    fn test_status_error_display_without_message() {
        let err = ApiError::Status {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: None,
        };
        assert_eq!(err.to_string(), "Server returned 500 Internal Server Error");
        assert!(err.server_message().is_none());
    }

    #[test]
    fn test_validation_messages() {
        assert_eq!(
            ValidationError::MissingFields(vec!["title", "amount"]).to_string(),
            "Missing required field(s): title, amount"
        );
        assert_eq!(
            SyncError::from(ValidationError::NoChanges).to_string(),
            "At least one field is required to update."
        );
    }
}
