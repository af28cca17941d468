//! Sequential credential failover.
//!
//! Tries each configured credential exactly once, in configured order, until
//! one succeeds or the list is exhausted. Every non-success outcome (401,
//! any other HTTP error, transport failure, attempt timeout) moves straight
//! to the next credential; there is no backoff and no early abort.
//!
//! Attempts are never issued concurrently: an early success must
//! short-circuit the remaining credentials.

use relay_core::{
    Credential, CredentialHint, CredentialSet, EventSink, GeneratedImage, GenerationOutcome,
    GenerationRequest, ImageProvider, LogEvent, RelayError,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;
use tracing::debug;

/// Log messages emitted at each decision point
pub mod messages {
    /// Before each attempt
    pub const ATTEMPTING: &str = "Trying API key";
    /// Attempt succeeded
    pub const SUCCESS: &str = "Image generation successful";
    /// Attempt returned 401
    pub const UNAUTHORIZED: &str =
        "API key failed (Unauthorized/Out of credits). Trying next key.";
    /// Attempt returned another non-2xx status
    pub const HTTP_ERROR: &str = "Non-recoverable response from upstream with current key.";
    /// Attempt failed below HTTP, or timed out
    pub const TRANSPORT_ERROR: &str =
        "A network or system error occurred while trying an API key.";
    /// No credential succeeded
    pub const EXHAUSTED: &str = "All available API keys failed. Unable to generate image.";
}

/// Failover configuration
#[derive(Debug, Clone)]
pub struct FailoverConfig {
    /// Upper bound on a single upstream attempt
    pub attempt_timeout: Duration,
}

impl Default for FailoverConfig {
    fn default() -> Self {
        Self {
            attempt_timeout: Duration::from_secs(60),
        }
    }
}

impl FailoverConfig {
    /// Create a configuration with default values
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the per-attempt timeout
    #[must_use]
    pub fn with_attempt_timeout(mut self, attempt_timeout: Duration) -> Self {
        self.attempt_timeout = attempt_timeout;
        self
    }
}

/// A successful dispatch
#[derive(Debug, Clone)]
pub struct Dispatched {
    /// Upstream payload, unmodified
    pub image: GeneratedImage,
    /// 1-based position of the credential that succeeded
    pub attempt: usize,
    /// Hint of the credential that succeeded
    pub credential_hint: CredentialHint,
}

/// Owns the ordered credential list and runs the failover loop
#[derive(Clone)]
pub struct FailoverDispatcher {
    provider: Arc<dyn ImageProvider>,
    credentials: CredentialSet,
    sink: Arc<dyn EventSink>,
    config: FailoverConfig,
}

impl std::fmt::Debug for FailoverDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FailoverDispatcher")
            .field("provider", &self.provider.id())
            .field("credentials", &self.credentials.len())
            .field("config", &self.config)
            .finish()
    }
}

impl FailoverDispatcher {
    /// Create a new dispatcher
    #[must_use]
    pub fn new(
        provider: Arc<dyn ImageProvider>,
        credentials: CredentialSet,
        sink: Arc<dyn EventSink>,
        config: FailoverConfig,
    ) -> Self {
        Self {
            provider,
            credentials,
            sink,
            config,
        }
    }

    /// Create a builder
    #[must_use]
    pub fn builder() -> FailoverDispatcherBuilder {
        FailoverDispatcherBuilder::default()
    }

    /// The credentials tried, in order
    #[must_use]
    pub fn credentials(&self) -> &CredentialSet {
        &self.credentials
    }

    /// Get the configuration
    #[must_use]
    pub fn config(&self) -> &FailoverConfig {
        &self.config
    }

    /// The sink events are emitted to
    #[must_use]
    pub fn sink(&self) -> &Arc<dyn EventSink> {
        &self.sink
    }

    /// Run the failover loop for one request
    ///
    /// Dropping the returned future aborts the in-flight attempt and skips
    /// the remaining credentials.
    ///
    /// # Errors
    /// Returns [`RelayError::Exhausted`] if no credential succeeded
    pub async fn dispatch(&self, request: &GenerationRequest) -> Result<Dispatched, RelayError> {
        debug!(
            provider = %self.provider.id(),
            credentials = self.credentials.len(),
            "Dispatching generation request"
        );

        let mut attempts = 0;

        for credential in &self.credentials {
            attempts += 1;
            let hint = credential.hint();

            self.sink
                .emit(LogEvent::info(messages::ATTEMPTING).with_hint(hint.clone()));

            match self.attempt(credential, request).await {
                GenerationOutcome::Success(image) => {
                    self.sink
                        .emit(LogEvent::info(messages::SUCCESS).with_hint(hint.clone()));

                    return Ok(Dispatched {
                        image,
                        attempt: attempts,
                        credential_hint: hint,
                    });
                }
                GenerationOutcome::Unauthorized => {
                    self.sink.emit(
                        LogEvent::warn(messages::UNAUTHORIZED)
                            .with_hint(hint)
                            .with_status(401),
                    );
                }
                GenerationOutcome::OtherHttpError { status, body } => {
                    // Non-auth errors fail over too.
                    self.sink.emit(
                        LogEvent::error(messages::HTTP_ERROR)
                            .with_hint(hint)
                            .with_status(status)
                            .with_details(body),
                    );
                }
                GenerationOutcome::TransportError { message } => {
                    self.sink.emit(
                        LogEvent::error(messages::TRANSPORT_ERROR)
                            .with_hint(hint)
                            .with_details(message),
                    );
                }
            }
        }

        self.sink.emit(LogEvent::error(messages::EXHAUSTED));
        Err(RelayError::exhausted(attempts))
    }

    /// One bounded upstream call
    async fn attempt(
        &self,
        credential: &Credential,
        request: &GenerationRequest,
    ) -> GenerationOutcome {
        let limit = self.config.attempt_timeout;

        match timeout(limit, self.provider.generate(credential, request)).await {
            Ok(outcome) => outcome,
            Err(_) => GenerationOutcome::transport(format!(
                "Attempt timed out after {}ms",
                limit.as_millis()
            )),
        }
    }
}

/// Builder for [`FailoverDispatcher`]
#[derive(Default)]
pub struct FailoverDispatcherBuilder {
    provider: Option<Arc<dyn ImageProvider>>,
    credentials: CredentialSet,
    sink: Option<Arc<dyn EventSink>>,
    config: FailoverConfig,
}

impl FailoverDispatcherBuilder {
    /// Set the upstream provider
    #[must_use]
    pub fn provider(mut self, provider: Arc<dyn ImageProvider>) -> Self {
        self.provider = Some(provider);
        self
    }

    /// Set the credential list
    #[must_use]
    pub fn credentials(mut self, credentials: CredentialSet) -> Self {
        self.credentials = credentials;
        self
    }

    /// Set the event sink (defaults to discarding events)
    #[must_use]
    pub fn sink(mut self, sink: Arc<dyn EventSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    /// Set the per-attempt timeout
    #[must_use]
    pub fn attempt_timeout(mut self, attempt_timeout: Duration) -> Self {
        self.config.attempt_timeout = attempt_timeout;
        self
    }

    /// Build the dispatcher
    ///
    /// # Errors
    /// Returns an internal error if no provider was set
    pub fn build(self) -> Result<FailoverDispatcher, RelayError> {
        let provider = self
            .provider
            .ok_or_else(|| RelayError::internal("FailoverDispatcher requires a provider"))?;
        let sink = self
            .sink
            .unwrap_or_else(|| Arc::new(relay_core::NoopSink));

        Ok(FailoverDispatcher::new(
            provider,
            self.credentials,
            sink,
            self.config,
        ))
    }
}
