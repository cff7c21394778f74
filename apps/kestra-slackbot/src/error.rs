//! Error types for the kestra-slackbot application.
//!
//! Defines [`ServerError`] as the primary error type for all operations
//! within `kestra-slackbot`. Uses `thiserror` for ergonomic error definitions.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;
use tracing::warn;

/// Error type for kestra-slackbot operations.
///
/// Variants are grouped by subsystem: configuration, Slack API communication,
/// Kestra API communication, request authentication, payload dispatch, and
/// serialization.
///
/// # Examples
///
/// ```
/// use kestra_slackbot::error::ServerError;
///
/// let err = ServerError::Config("SLACK_BOT_TOKEN is not set".into());
/// assert!(err.to_string().contains("SLACK_BOT_TOKEN"));
/// ```
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ServerError {
    /// A configuration error (missing or invalid environment values).
    #[error("Config error: {0}")]
    Config(String),

    /// An error from a Slack Web API call.
    #[error("Slack API error: {0}")]
    SlackApi(String),

    /// A transport error talking to the Kestra server.
    #[error("Kestra API error: {0}")]
    Kestra(String),

    /// The inbound request failed Slack signature verification.
    #[error("Signature error: {0}")]
    Signature(String),

    /// An inbound payload could not be decoded into a known shape.
    #[error("Dispatch error: {0}")]
    Dispatch(String),

    /// A JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ServerError {
    /// HTTP status returned to Slack when this error ends a webhook request.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Signature(_) => StatusCode::UNAUTHORIZED,
            Self::Dispatch(_) | Self::Json(_) => StatusCode::BAD_REQUEST,
            Self::Config(_) | Self::SlackApi(_) | Self::Kestra(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        warn!(error = %self, status = status.as_u16(), "Rejecting webhook request");
        status.into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_should_display_config_error() {
        let err = ServerError::Config("token missing".into());
        assert_eq!(err.to_string(), "Config error: token missing");
    }

    #[test]
    fn test_should_display_slack_api_error() {
        let err = ServerError::SlackApi("invalid_auth".into());
        assert_eq!(err.to_string(), "Slack API error: invalid_auth");
    }

    #[test]
    fn test_should_display_kestra_error() {
        let err = ServerError::Kestra("connection refused".into());
        assert_eq!(err.to_string(), "Kestra API error: connection refused");
    }

    #[test]
    fn test_should_convert_from_json_error() {
        let json_err = serde_json::from_str::<serde_json::Value>("invalid").unwrap_err();
        let err: ServerError = json_err.into();
        assert!(matches!(err, ServerError::Json(_)));
    }

    #[test]
    fn test_should_map_errors_to_status_codes() {
        assert_eq!(
            ServerError::Signature("bad".into()).status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ServerError::Dispatch("bad".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ServerError::SlackApi("bad".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
