//! Upstream provider abstraction.

use crate::credential::Credential;
use crate::outcome::GenerationOutcome;
use crate::request::GenerationRequest;
use async_trait::async_trait;

/// An upstream image generation API
///
/// Implementations perform exactly one outbound call per invocation and
/// classify the result. They never return an error: every failure mode is
/// a [`GenerationOutcome`] variant.
#[async_trait]
pub trait ImageProvider: Send + Sync {
    /// Provider identifier used in logs
    fn id(&self) -> &str;

    /// Issue one generation call using `credential`
    async fn generate(
        &self,
        credential: &Credential,
        request: &GenerationRequest,
    ) -> GenerationOutcome;
}
