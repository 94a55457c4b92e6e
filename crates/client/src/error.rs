//! Client error types.

use buzzgram_core::forms::ValidationError;
use reqwest::StatusCode;
use thiserror::Error;

/// Errors from the persisted key/value store.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Reading or writing the backing file failed.
    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The backing file is not a JSON object of strings.
    #[error("Storage parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Errors surfaced by the HTTP client, sessions and pages.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Transport failure (connection refused, timeout, TLS...).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-2xx response. `message` is the envelope's `message` when the body
    /// carried one.
    #[error("API error ({status}): {}", message.as_deref().unwrap_or("no message"))]
    Api {
        status: StatusCode,
        message: Option<String>,
    },

    /// 2xx response with `success: false` or without a `data` field.
    #[error("Unexpected response envelope: {}", message.as_deref().unwrap_or("missing data"))]
    Envelope { message: Option<String> },

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Local persistence failed.
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// The same mutation is already in flight.
    #[error("Request already in progress")]
    Busy,

    /// The item is not among those the session can see.
    #[error("{0} not found")]
    NotFound(&'static str),

    /// The operation needs a signed-in session.
    #[error("Not signed in")]
    NotAuthenticated,

    /// Input rejected before any request was made.
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

impl ClientError {
    /// Message to show the user: the server's message when one came back,
    /// the validation message for local rejections, `fallback` otherwise.
    #[must_use]
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            Self::Api {
                message: Some(message),
                ..
            }
            | Self::Envelope {
                message: Some(message),
            } => message.clone(),
            Self::Validation(e) => e.to_string(),
            Self::NotFound(_) => self.to_string(),
            _ => fallback.to_string(),
        }
    }

    /// HTTP status of an API error.
    #[must_use]
    pub const fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Whether the server rejected the credentials (401).
    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(StatusCode::UNAUTHORIZED)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_message_prefers_server_message() {
        let err = ClientError::Api {
            status: StatusCode::BAD_REQUEST,
            message: Some("Email already registered".to_string()),
        };
        assert_eq!(err.user_message("Registration failed"), "Email already registered");
        assert_eq!(err.status(), Some(StatusCode::BAD_REQUEST));
    }

    #[test]
    fn test_user_message_falls_back() {
        let err = ClientError::Api {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: None,
        };
        assert_eq!(err.user_message("Approval failed"), "Approval failed");
        assert_eq!(ClientError::Busy.user_message("Rejection failed"), "Rejection failed");
    }

    #[test]
    fn test_validation_message_is_shown() {
        let err = ClientError::from(ValidationError::RejectionNotesRequired);
        assert_eq!(
            err.user_message("Rejection failed"),
            "Please provide feedback for rejection"
        );
    }

    #[test]
    fn test_is_unauthorized() {
        let err = ClientError::Api {
            status: StatusCode::UNAUTHORIZED,
            message: Some("Invalid token".to_string()),
        };
        assert!(err.is_unauthorized());
        assert!(!ClientError::NotAuthenticated.is_unauthorized());
    }
}
