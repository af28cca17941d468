//! HTTP error responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use relay_core::RelayError;
use serde_json::json;
use std::net::SocketAddr;

/// Returned to the client when every credential failed
pub const EXHAUSTED_MESSAGE: &str = "Failed to generate image. All available API keys failed.";

/// Returned to the client when no credentials are configured
pub const NOT_CONFIGURED_MESSAGE: &str = "API keys are not configured on the server.";

const INTERNAL_MESSAGE: &str = "Internal server error";

/// Error rendered as `{"error": message}`
#[derive(Debug, Clone)]
pub struct ApiError {
    /// Response status
    pub status: StatusCode,
    /// Client-facing message
    pub message: String,
}

impl ApiError {
    /// Create an error with an explicit status
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    /// 400 Bad Request
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }
}

impl From<RelayError> for ApiError {
    fn from(err: RelayError) -> Self {
        let status =
            StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let message = match err {
            RelayError::Validation { message } | RelayError::Configuration { message } => message,
            // Attempt count and upstream detail stay in the logs.
            RelayError::Exhausted { .. } => EXHAUSTED_MESSAGE.to_string(),
            RelayError::Internal { .. } => INTERNAL_MESSAGE.to_string(),
        };
        Self::new(status, message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}

/// Server startup and runtime errors
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// Host and port do not form a socket address
    #[error("Invalid listen address {address}: {reason}")]
    InvalidAddress {
        /// The rejected address
        address: String,
        /// Parser message
        reason: String,
    },

    /// Listener could not be bound
    #[error("Failed to bind {address}: {source}")]
    Bind {
        /// Address that was requested
        address: SocketAddr,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// Serving loop failed
    #[error("Server error: {0}")]
    Serve(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    async fn body_json(err: ApiError) -> (StatusCode, serde_json::Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_validation_maps_to_400() {
        let (status, body) = body_json(RelayError::validation("Prompt is required").into()).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({"error": "Prompt is required"}));
    }

    #[tokio::test]
    async fn test_exhaustion_hides_attempt_count() {
        let (status, body) = body_json(RelayError::exhausted(7).into()).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({"error": EXHAUSTED_MESSAGE}));
    }

    #[tokio::test]
    async fn test_internal_detail_not_exposed() {
        let (status, body) =
            body_json(RelayError::internal("client pool poisoned").into()).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Internal server error");
    }

    #[tokio::test]
    async fn test_configuration_message_passed_through() {
        let (status, body) =
            body_json(RelayError::configuration(NOT_CONFIGURED_MESSAGE).into()).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], NOT_CONFIGURED_MESSAGE);
    }

    #[test]
    fn test_status_follows_relay_error() {
        let errors = [
            RelayError::validation("Prompt is required"),
            RelayError::configuration(NOT_CONFIGURED_MESSAGE),
            RelayError::exhausted(2),
            RelayError::internal("boom"),
        ];

        for err in errors {
            let expected = err.status_code();
            let api: ApiError = err.into();
            assert_eq!(api.status.as_u16(), expected);
        }
    }
}
