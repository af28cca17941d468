//! HTTP request handlers for the relay API.

use axum::{
    extract::State,
    http::header,
    response::{IntoResponse, Response},
};
use relay_core::{GenerationRequest, LogEvent, RelayError};
use serde_json::Value;
use tracing::{debug, instrument};

use crate::{
    error::{ApiError, NOT_CONFIGURED_MESSAGE},
    extractors::{JsonBody, RequestId},
    state::AppState,
};

/// Handler-level log messages
pub mod messages {
    /// Body had no usable prompt
    pub const MISSING_PROMPT: &str = "Request received without a prompt.";
    /// No credentials configured
    pub const NOT_CONFIGURED: &str =
        "STABILITY_API_KEYS not found in environment variables. Server is not configured.";
}

/// Generate an image with credential failover
///
/// The prompt is validated before the credential check so that a bad request
/// never depends on server configuration. On success the upstream body is
/// returned byte-for-byte.
#[instrument(skip_all, fields(request_id = %request_id.0))]
pub async fn generate_image(
    State(state): State<AppState>,
    request_id: RequestId,
    JsonBody(body): JsonBody<Value>,
) -> Result<Response, ApiError> {
    let request = GenerationRequest::from_json(&body)
        .inspect_err(|_| state.sink().emit(LogEvent::warn(messages::MISSING_PROMPT)))?;

    if state.credentials().is_empty() {
        state.sink().emit(LogEvent::error(messages::NOT_CONFIGURED));
        return Err(RelayError::configuration(NOT_CONFIGURED_MESSAGE).into());
    }

    let dispatched = state.dispatcher().dispatch(&request).await?;

    debug!(
        attempt = dispatched.attempt,
        key = %dispatched.credential_hint,
        bytes = dispatched.image.body().len(),
        "Relaying upstream payload"
    );

    Ok((
        [(header::CONTENT_TYPE, "application/json")],
        dispatched.image.into_body(),
    )
        .into_response())
}
