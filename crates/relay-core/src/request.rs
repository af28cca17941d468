//! Request types for the relay.

use crate::error::RelayError;
use serde::{Deserialize, Serialize};

/// Message returned to the client when the prompt is missing or empty
pub const PROMPT_REQUIRED: &str = "Prompt is required";

/// A validated image generation request
///
/// Deserializing goes through [`GenerationRequest::from_json`], so an
/// instance always carries a non-empty prompt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "serde_json::Value")]
pub struct GenerationRequest {
    prompt: String,
}

impl GenerationRequest {
    /// Create a request from a prompt
    ///
    /// # Errors
    /// Returns a validation error if the prompt is empty
    pub fn new(prompt: impl Into<String>) -> Result<Self, RelayError> {
        let prompt = prompt.into();
        if prompt.is_empty() {
            return Err(RelayError::validation(PROMPT_REQUIRED));
        }
        Ok(Self { prompt })
    }

    /// Build a request from an inbound JSON body
    ///
    /// The body must be an object with a non-empty string `prompt` field.
    /// Anything else (missing, `null`, a number, an empty string) is rejected
    /// the same way.
    ///
    /// # Errors
    /// Returns a validation error if no usable prompt is present
    pub fn from_json(body: &serde_json::Value) -> Result<Self, RelayError> {
        let prompt = body
            .get("prompt")
            .and_then(serde_json::Value::as_str)
            .ok_or_else(|| RelayError::validation(PROMPT_REQUIRED))?;

        Self::new(prompt)
    }

    /// The prompt text
    #[must_use]
    pub fn prompt(&self) -> &str {
        &self.prompt
    }
}

impl TryFrom<serde_json::Value> for GenerationRequest {
    type Error = RelayError;

    fn try_from(body: serde_json::Value) -> Result<Self, Self::Error> {
        Self::from_json(&body)
    }
}
