//! Test doubles for the provider and sink seams.
//!
//! Enabled with the `testing` feature; used by the dispatcher and server
//! test suites.

use crate::credential::Credential;
use crate::event::{EventSink, LogEvent};
use crate::outcome::{GeneratedImage, GenerationOutcome};
use crate::provider::ImageProvider;
use crate::request::GenerationRequest;
use async_trait::async_trait;
use bytes::Bytes;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::time::Duration;

/// One scripted provider response
#[derive(Debug, Clone)]
struct Step {
    outcome: GenerationOutcome,
    delay: Option<Duration>,
}

/// Provider that replays scripted outcomes in call order and records the
/// credentials it was called with
#[derive(Debug)]
pub struct ScriptedProvider {
    steps: Mutex<VecDeque<Step>>,
    fallback: GenerationOutcome,
    calls: Mutex<Vec<String>>,
    prompts: Mutex<Vec<String>>,
}

impl Default for ScriptedProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl ScriptedProvider {
    /// Create a provider whose unscripted calls return `Unauthorized`
    #[must_use]
    pub fn new() -> Self {
        Self {
            steps: Mutex::new(VecDeque::new()),
            fallback: GenerationOutcome::Unauthorized,
            calls: Mutex::new(Vec::new()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Outcome returned once the script runs out
    #[must_use]
    pub fn with_fallback(mut self, outcome: GenerationOutcome) -> Self {
        self.fallback = outcome;
        self
    }

    /// Append an outcome to the script
    #[must_use]
    pub fn then(self, outcome: GenerationOutcome) -> Self {
        self.steps.lock().push_back(Step {
            outcome,
            delay: None,
        });
        self
    }

    /// Append an outcome that is returned after `delay`
    #[must_use]
    pub fn then_after(self, delay: Duration, outcome: GenerationOutcome) -> Self {
        self.steps.lock().push_back(Step {
            outcome,
            delay: Some(delay),
        });
        self
    }

    /// Raw credentials passed to each call, in call order
    #[must_use]
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().clone()
    }

    /// Number of calls made so far
    #[must_use]
    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }

    /// Prompts passed to each call, in call order
    #[must_use]
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().clone()
    }
}

#[async_trait]
impl ImageProvider for ScriptedProvider {
    fn id(&self) -> &str {
        "scripted"
    }

    async fn generate(
        &self,
        credential: &Credential,
        request: &GenerationRequest,
    ) -> GenerationOutcome {
        self.calls.lock().push(credential.expose().to_string());
        self.prompts.lock().push(request.prompt().to_string());

        let step = self.steps.lock().pop_front();
        match step {
            Some(Step { outcome, delay }) => {
                if let Some(delay) = delay {
                    tokio::time::sleep(delay).await;
                }
                outcome
            }
            None => self.fallback.clone(),
        }
    }
}

/// Sink that keeps every event in memory
#[derive(Debug, Default)]
pub struct RecordingSink {
    events: Mutex<Vec<LogEvent>>,
}

impl RecordingSink {
    /// Create an empty sink
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the recorded events
    #[must_use]
    pub fn events(&self) -> Vec<LogEvent> {
        self.events.lock().clone()
    }

    /// Messages of the recorded events, in order
    #[must_use]
    pub fn messages(&self) -> Vec<String> {
        self.events.lock().iter().map(|e| e.message.clone()).collect()
    }
}

impl EventSink for RecordingSink {
    fn emit(&self, event: LogEvent) {
        self.events.lock().push(event);
    }
}

/// A success outcome carrying `json` as the upstream body
///
/// # Panics
/// Panics if `json` is not valid JSON
#[must_use]
#[allow(clippy::expect_used)]
pub fn success(json: &str) -> GenerationOutcome {
    let image = GeneratedImage::from_json_bytes(Bytes::copy_from_slice(json.as_bytes()))
        .expect("scripted success body must be JSON");
    GenerationOutcome::Success(image)
}

/// A non-401 HTTP error outcome
#[must_use]
pub fn http_error(status: u16, body: &str) -> GenerationOutcome {
    GenerationOutcome::OtherHttpError {
        status,
        body: body.to_string(),
    }
}
