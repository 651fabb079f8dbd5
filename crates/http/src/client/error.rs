//! Client error types

use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

use crate::notify::{
    FORBIDDEN_MESSAGE, NOT_FOUND_MESSAGE, SERVER_ERROR_MESSAGE, UNEXPECTED_ERROR_MESSAGE,
};
use crate::store::StoreError;

/// Client error types
#[derive(Debug, Error)]
pub enum ClientError {
    /// The request never received a response (connection, DNS or timeout failure)
    #[error("Network error: {0}")]
    Network(#[source] reqwest::Error),

    /// Request construction or response decoding error
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The server rejected the credentials and no refresh was attempted
    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    /// Credentials could not be recovered; the session was purged
    #[error("Session expired")]
    SessionExpired,

    /// Bad request
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Forbidden
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Resource not found
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// Server returned a 5xx status
    #[error("Server error {status}: {message}")]
    ServerError { status: u16, message: String },

    /// Any other non-success status
    #[error("Request failed with status {status}: {message}")]
    Status { status: u16, message: String },

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    Configuration(String),

    /// Configuration source could not be loaded
    #[error("Configuration error: {0}")]
    ConfigSource(#[from] config::ConfigError),

    /// Session store failure
    #[error("Session store error: {0}")]
    Store(#[from] StoreError),
}

/// Error payload shapes the API returns. `detail` wins over `message`.
#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    detail: Option<Value>,
    #[serde(default)]
    message: Option<Value>,
}

impl ClientError {
    /// Create error from HTTP status code and the raw response body
    ///
    /// The carried message is the server-supplied `detail`/`message` field when
    /// present, otherwise a fixed message for the status class.
    pub fn from_status(status: StatusCode, body: &str) -> Self {
        let message = server_message(body).unwrap_or_else(|| fallback_message(status).to_string());

        match status.as_u16() {
            400 => Self::BadRequest(message),
            401 => Self::AuthenticationFailed(message),
            403 => Self::Forbidden(message),
            404 => Self::NotFound(message),
            code if status.is_server_error() => Self::ServerError {
                status: code,
                message,
            },
            code => Self::Status {
                status: code,
                message,
            },
        }
    }

    /// Classify an error returned by `send()`
    pub(crate) fn from_transport(error: reqwest::Error) -> Self {
        if error.is_builder() {
            Self::Request(error)
        } else {
            Self::Network(error)
        }
    }

    /// Whether this error means the caller has to log in again
    pub const fn is_auth_expired(&self) -> bool {
        matches!(self, Self::AuthenticationFailed(_) | Self::SessionExpired)
    }

    /// HTTP status carried by the error, if any
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::BadRequest(_) => Some(400),
            Self::AuthenticationFailed(_) => Some(401),
            Self::Forbidden(_) => Some(403),
            Self::NotFound(_) => Some(404),
            Self::ServerError { status, .. } | Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// User-facing message for status errors
    pub fn user_message(&self) -> Option<&str> {
        match self {
            Self::BadRequest(message)
            | Self::AuthenticationFailed(message)
            | Self::Forbidden(message)
            | Self::NotFound(message)
            | Self::ServerError { message, .. }
            | Self::Status { message, .. } => Some(message),
            _ => None,
        }
    }
}

fn server_message(body: &str) -> Option<String> {
    let body: ErrorBody = serde_json::from_str(body).ok()?;
    body.detail
        .and_then(message_text)
        .or_else(|| body.message.and_then(message_text))
}

fn message_text(value: Value) -> Option<String> {
    let text = match value {
        Value::Null => return None,
        Value::String(text) => text,
        // Validation errors arrive as lists or objects; show them verbatim.
        other => other.to_string(),
    };
    let trimmed = text.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

fn fallback_message(status: StatusCode) -> &'static str {
    match status.as_u16() {
        403 => FORBIDDEN_MESSAGE,
        404 => NOT_FOUND_MESSAGE,
        500..=599 => SERVER_ERROR_MESSAGE,
        _ => UNEXPECTED_ERROR_MESSAGE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detail_wins_over_message() {
        let error = ClientError::from_status(
            StatusCode::BAD_REQUEST,
            r#"{"detail": "Email already registered", "message": "ignored"}"#,
        );
        assert!(matches!(error, ClientError::BadRequest(ref m) if m == "Email already registered"));
    }

    #[test]
    fn test_message_field_used_without_detail() {
        let error = ClientError::from_status(StatusCode::CONFLICT, r#"{"message": "Duplicate"}"#);
        assert_eq!(error.status(), Some(409));
        assert_eq!(error.user_message(), Some("Duplicate"));
    }

    #[test]
    fn test_fallback_messages_per_status() {
        let cases = [
            (StatusCode::FORBIDDEN, FORBIDDEN_MESSAGE),
            (StatusCode::NOT_FOUND, NOT_FOUND_MESSAGE),
            (StatusCode::INTERNAL_SERVER_ERROR, SERVER_ERROR_MESSAGE),
            (StatusCode::BAD_GATEWAY, SERVER_ERROR_MESSAGE),
            (StatusCode::UNPROCESSABLE_ENTITY, UNEXPECTED_ERROR_MESSAGE),
        ];

        for (status, expected) in cases {
            let error = ClientError::from_status(status, "<html>oops</html>");
            assert_eq!(error.user_message(), Some(expected), "status {status}");
        }
    }

    #[test]
    fn test_blank_detail_falls_back() {
        let error = ClientError::from_status(StatusCode::INTERNAL_SERVER_ERROR, r#"{"detail": "  "}"#);
        assert!(matches!(
            error,
            ClientError::ServerError { status: 500, ref message } if message == SERVER_ERROR_MESSAGE
        ));
    }

    #[test]
    fn test_structured_detail_is_rendered() {
        let error =
            ClientError::from_status(StatusCode::BAD_REQUEST, r#"{"detail": ["too short"]}"#);
        assert_eq!(error.user_message(), Some(r#"["too short"]"#));
    }

    #[test]
    fn test_auth_expired() {
        assert!(ClientError::SessionExpired.is_auth_expired());
        assert!(ClientError::from_status(StatusCode::UNAUTHORIZED, "").is_auth_expired());
        assert!(!ClientError::Forbidden("no".into()).is_auth_expired());
    }
}
