//! `tracing`-backed event sink.

use relay_core::{CredentialHint, EventSink, LogEvent, LogLevel};
use tracing::{error, info, warn};

/// Target attached to every relay decision event
pub const EVENT_TARGET: &str = "relay::events";

/// Forwards [`LogEvent`]s to the installed `tracing` subscriber
///
/// Optional fields are recorded only when present, so the JSON formatter
/// emits `key`, `status_code` and `details` exactly when the event has them.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingEventSink;

impl TracingEventSink {
    /// Create a new sink
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for TracingEventSink {
    fn emit(&self, event: LogEvent) {
        let key = event.credential_hint.as_ref().map(CredentialHint::as_str);
        let status_code = event.status_code;
        let details = event.details.as_deref();

        match event.level {
            LogLevel::Info => {
                info!(target: EVENT_TARGET, key, status_code, details, "{}", event.message);
            }
            LogLevel::Warn => {
                warn!(target: EVENT_TARGET, key, status_code, details, "{}", event.message);
            }
            LogLevel::Error => {
                error!(target: EVENT_TARGET, key, status_code, details, "{}", event.message);
            }
        }
    }
}
