//! Shared application state.

use relay_core::{CredentialSet, EventSink};
use relay_resilience::FailoverDispatcher;
use std::sync::Arc;
use std::time::Instant;

/// State shared by every handler
///
/// Everything here is read-only after startup.
#[derive(Debug, Clone)]
pub struct AppState {
    dispatcher: Arc<FailoverDispatcher>,
    started_at: Instant,
}

impl AppState {
    /// Create state around a configured dispatcher
    #[must_use]
    pub fn new(dispatcher: FailoverDispatcher) -> Self {
        Self {
            dispatcher: Arc::new(dispatcher),
            started_at: Instant::now(),
        }
    }

    /// The failover dispatcher
    #[must_use]
    pub fn dispatcher(&self) -> &FailoverDispatcher {
        &self.dispatcher
    }

    /// Configured credentials, in try order
    #[must_use]
    pub fn credentials(&self) -> &CredentialSet {
        self.dispatcher.credentials()
    }

    /// Sink for handler-level events
    #[must_use]
    pub fn sink(&self) -> &Arc<dyn EventSink> {
        self.dispatcher.sink()
    }

    /// Time since the state was created
    #[must_use]
    pub fn uptime_seconds(&self) -> u64 {
        self.started_at.elapsed().as_secs()
    }
}
