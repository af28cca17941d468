//! Error types for the relay.
//!
//! Only the errors defined here cross the system boundary to the caller.
//! Per-attempt upstream failures are never errors: they are
//! [`GenerationOutcome`](crate::GenerationOutcome) variants swallowed and
//! logged by the failover dispatcher.

use thiserror::Error;

/// Errors surfaced to the caller of the relay
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RelayError {
    /// Bad client input, rejected before any upstream call
    #[error("Validation error: {message}")]
    Validation {
        /// Human-readable message returned to the client
        message: String,
    },

    /// The relay is missing configuration required to serve the request
    #[error("Configuration error: {message}")]
    Configuration {
        /// Description of what is missing
        message: String,
    },

    /// Every configured credential was tried without success
    #[error("All {attempts} credential attempts failed")]
    Exhausted {
        /// Number of upstream attempts made
        attempts: usize,
    },

    /// Unexpected internal failure
    #[error("Internal error: {message}")]
    Internal {
        /// Description of the failure
        message: String,
    },
}

impl RelayError {
    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create an exhaustion error
    #[must_use]
    pub fn exhausted(attempts: usize) -> Self {
        Self::Exhausted { attempts }
    }

    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// HTTP status code this error maps to at the boundary
    #[must_use]
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Validation { .. } => 400,
            Self::Configuration { .. } | Self::Exhausted { .. } | Self::Internal { .. } => 500,
        }
    }
}
