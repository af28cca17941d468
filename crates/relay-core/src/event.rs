//! Structured log events.
//!
//! Every decision point in the relay emits exactly one [`LogEvent`] to an
//! [`EventSink`]. The production sink forwards to `tracing`; tests install a
//! recording sink to assert on event order.

use crate::credential::CredentialHint;
use serde::Serialize;
use std::fmt;

/// Severity of a log event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Normal progress
    Info,
    /// Recoverable problem
    Warn,
    /// Failure
    Error,
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Info => write!(f, "info"),
            Self::Warn => write!(f, "warn"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// One structured record emitted at a decision point
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogEvent {
    /// Severity
    pub level: LogLevel,
    /// What happened
    pub message: String,
    /// Redacted credential, when one was involved
    #[serde(rename = "key", skip_serializing_if = "Option::is_none")]
    pub credential_hint: Option<CredentialHint>,
    /// Upstream HTTP status, when one was received
    #[serde(rename = "statusCode", skip_serializing_if = "Option::is_none")]
    pub status_code: Option<u16>,
    /// Upstream error body or transport error description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl LogEvent {
    /// Create an event with no credential, status or details
    pub fn new(level: LogLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
            credential_hint: None,
            status_code: None,
            details: None,
        }
    }

    /// Info-level event
    pub fn info(message: impl Into<String>) -> Self {
        Self::new(LogLevel::Info, message)
    }

    /// Warn-level event
    pub fn warn(message: impl Into<String>) -> Self {
        Self::new(LogLevel::Warn, message)
    }

    /// Error-level event
    pub fn error(message: impl Into<String>) -> Self {
        Self::new(LogLevel::Error, message)
    }

    /// Attach a credential hint
    #[must_use]
    pub fn with_hint(mut self, hint: CredentialHint) -> Self {
        self.credential_hint = Some(hint);
        self
    }

    /// Attach an upstream status code
    #[must_use]
    pub fn with_status(mut self, status: u16) -> Self {
        self.status_code = Some(status);
        self
    }

    /// Attach details
    #[must_use]
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}

/// Destination for log events
pub trait EventSink: Send + Sync {
    /// Record one event
    fn emit(&self, event: LogEvent);
}

/// Sink that discards every event
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopSink;

impl EventSink for NoopSink {
    fn emit(&self, _event: LogEvent) {}
}
