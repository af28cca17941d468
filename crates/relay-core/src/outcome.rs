//! Per-attempt outcome of an upstream generation call.

use bytes::Bytes;
use serde::de::IgnoredAny;

/// Upstream image payload, kept as the exact bytes the provider returned
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedImage {
    body: Bytes,
}

impl GeneratedImage {
    /// Wrap a body that is already known to be valid JSON
    ///
    /// # Errors
    /// Returns the parse error if `body` is not a JSON document
    pub fn from_json_bytes(body: Bytes) -> Result<Self, serde_json::Error> {
        serde_json::from_slice::<IgnoredAny>(&body)?;
        Ok(Self { body })
    }

    /// Raw JSON bytes, relayed to the client unmodified
    #[must_use]
    pub fn body(&self) -> &Bytes {
        &self.body
    }

    /// Consume into the raw bytes
    #[must_use]
    pub fn into_body(self) -> Bytes {
        self.body
    }
}

/// Tagged result of one credential attempt
///
/// Produced by an [`ImageProvider`](crate::ImageProvider) and consumed
/// immediately by the dispatcher to decide whether to stop or continue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerationOutcome {
    /// 2xx with a JSON body
    Success(GeneratedImage),
    /// 401: the key is invalid or out of credits
    Unauthorized,
    /// Any other non-2xx status
    OtherHttpError {
        /// HTTP status code
        status: u16,
        /// Raw response body as text
        body: String,
    },
    /// The call did not produce a usable HTTP response
    TransportError {
        /// Description of the failure
        message: String,
    },
}

impl GenerationOutcome {
    /// Create a transport error outcome
    pub fn transport(message: impl Into<String>) -> Self {
        Self::TransportError {
            message: message.into(),
        }
    }

    /// Classify a complete HTTP response
    ///
    /// A 2xx whose body is not JSON is a transport error: the exchange
    /// completed but yielded nothing that can be relayed.
    #[must_use]
    pub fn from_response(status: u16, body: Bytes) -> Self {
        match status {
            200..=299 => match GeneratedImage::from_json_bytes(body) {
                Ok(image) => Self::Success(image),
                Err(e) => Self::transport(format!("Invalid JSON in success response: {e}")),
            },
            401 => Self::Unauthorized,
            _ => Self::OtherHttpError {
                status,
                body: String::from_utf8_lossy(&body).into_owned(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_keeps_exact_bytes() {
        let body = Bytes::from_static(br#"{"artifacts":[{"base64":"AAAA","seed":1}],"z":0,"a":1}"#);
        let outcome = GenerationOutcome::from_response(200, body.clone());

        match outcome {
            GenerationOutcome::Success(image) => assert_eq!(image.body(), &body),
            other => panic!("expected success, got {other:?}"),
        }
    }

    #[test]
    fn test_any_2xx_is_success() {
        let outcome = GenerationOutcome::from_response(201, Bytes::from_static(b"{}"));
        assert!(matches!(outcome, GenerationOutcome::Success(_)));
    }

    #[test]
    fn test_non_json_success_is_transport_error() {
        let outcome = GenerationOutcome::from_response(200, Bytes::from_static(b"<html>"));
        assert!(matches!(outcome, GenerationOutcome::TransportError { .. }));
    }

    #[test]
    fn test_401_is_unauthorized() {
        let outcome = GenerationOutcome::from_response(401, Bytes::from_static(b"denied"));
        assert_eq!(outcome, GenerationOutcome::Unauthorized);
    }

    #[test]
    fn test_other_status_keeps_body_text() {
        let outcome =
            GenerationOutcome::from_response(400, Bytes::from_static(b"{\"message\":\"bad prompt\"}"));
        assert_eq!(
            outcome,
            GenerationOutcome::OtherHttpError {
                status: 400,
                body: "{\"message\":\"bad prompt\"}".to_string(),
            }
        );
    }

    #[test]
    fn test_403_and_429_are_not_unauthorized() {
        for status in [403, 429, 500, 503] {
            let outcome = GenerationOutcome::from_response(status, Bytes::new());
            assert!(
                matches!(outcome, GenerationOutcome::OtherHttpError { status: s, .. } if s == status)
            );
        }
    }
}
