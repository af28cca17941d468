//! Stability AI text-to-image provider.
//!
//! # API Format
//! `POST {API_HOST}/v1/generation/{ENGINE_ID}/text-to-image` with a bearer
//! API key. Generation parameters are fixed; only the prompt varies.

use async_trait::async_trait;
use relay_core::{
    Credential, GenerationOutcome, GenerationRequest, ImageProvider, RelayError,
};
use reqwest::header::ACCEPT;
use reqwest::Client;
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, trace};

/// Default Stability API host
pub const DEFAULT_API_HOST: &str = "https://api.stability.ai";

/// Default engine (SDXL 1.0)
pub const DEFAULT_ENGINE_ID: &str = "stable-diffusion-xl-1024-v1-0";

const CFG_SCALE: u32 = 7;
const IMAGE_SIZE: u32 = 1024;
const STEPS: u32 = 30;
const SAMPLES: u32 = 1;

/// Stability provider configuration
#[derive(Debug, Clone)]
pub struct StabilityConfig {
    /// API host, without a trailing path
    pub api_host: String,
    /// Engine identifier placed in the endpoint path
    pub engine_id: String,
    /// Total request timeout for one call
    pub timeout: Duration,
    /// TCP connect timeout
    pub connect_timeout: Duration,
}

impl Default for StabilityConfig {
    fn default() -> Self {
        Self {
            api_host: DEFAULT_API_HOST.to_string(),
            engine_id: DEFAULT_ENGINE_ID.to_string(),
            timeout: Duration::from_secs(60),
            connect_timeout: Duration::from_secs(10),
        }
    }
}

impl StabilityConfig {
    /// Create a configuration with default host and engine
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the API host
    #[must_use]
    pub fn with_api_host(mut self, api_host: impl Into<String>) -> Self {
        self.api_host = api_host.into();
        self
    }

    /// Set the engine identifier
    #[must_use]
    pub fn with_engine_id(mut self, engine_id: impl Into<String>) -> Self {
        self.engine_id = engine_id.into();
        self
    }

    /// Set the request timeout
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Full text-to-image endpoint URL
    #[must_use]
    pub fn endpoint_url(&self) -> String {
        format!(
            "{}/v1/generation/{}/text-to-image",
            self.api_host.trim_end_matches('/'),
            self.engine_id
        )
    }
}

/// Stability text-to-image request body
#[derive(Debug, Serialize)]
struct TextToImageRequest<'a> {
    text_prompts: [TextPrompt<'a>; 1],
    cfg_scale: u32,
    height: u32,
    width: u32,
    steps: u32,
    samples: u32,
}

#[derive(Debug, Serialize)]
struct TextPrompt<'a> {
    text: &'a str,
}

impl<'a> TextToImageRequest<'a> {
    fn new(prompt: &'a str) -> Self {
        Self {
            text_prompts: [TextPrompt { text: prompt }],
            cfg_scale: CFG_SCALE,
            height: IMAGE_SIZE,
            width: IMAGE_SIZE,
            steps: STEPS,
            samples: SAMPLES,
        }
    }
}

/// Stability AI provider implementation
#[derive(Debug, Clone)]
pub struct StabilityProvider {
    client: Client,
    endpoint: String,
}

impl StabilityProvider {
    /// Create a new Stability provider
    ///
    /// # Errors
    /// Returns error if the API host is not a valid URL or the HTTP client
    /// cannot be created
    pub fn new(config: StabilityConfig) -> Result<Self, RelayError> {
        url::Url::parse(&config.api_host).map_err(|e| {
            RelayError::configuration(format!("Invalid Stability API host {}: {e}", config.api_host))
        })?;

        if config.engine_id.is_empty() {
            return Err(RelayError::configuration("Stability engine id cannot be empty"));
        }

        let client = Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .pool_max_idle_per_host(16)
            .build()
            .map_err(|e| RelayError::internal(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            endpoint: config.endpoint_url(),
        })
    }

    /// The endpoint every attempt is sent to
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl ImageProvider for StabilityProvider {
    fn id(&self) -> &str {
        "stability"
    }

    async fn generate(
        &self,
        credential: &Credential,
        request: &GenerationRequest,
    ) -> GenerationOutcome {
        debug!(
            provider = "stability",
            url = %self.endpoint,
            key = %credential.hint(),
            "Sending text-to-image request"
        );

        let response = match self
            .client
            .post(&self.endpoint)
            .header(ACCEPT, "application/json")
            .bearer_auth(credential.expose())
            .json(&TextToImageRequest::new(request.prompt()))
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => return GenerationOutcome::transport(format!("Request failed: {e}")),
        };

        let status = response.status();
        let body = match response.bytes().await {
            Ok(body) => body,
            Err(e) => {
                return GenerationOutcome::transport(format!("Failed to read response: {e}"));
            }
        };

        trace!(status = %status, bytes = body.len(), "Received Stability response");

        GenerationOutcome::from_response(status.as_u16(), body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const ENDPOINT: &str = "/v1/generation/stable-diffusion-xl-1024-v1-0/text-to-image";

    fn provider_for(server: &MockServer) -> StabilityProvider {
        StabilityProvider::new(StabilityConfig::new().with_api_host(server.uri())).unwrap()
    }

    fn request(prompt: &str) -> GenerationRequest {
        GenerationRequest::new(prompt).unwrap()
    }

    #[test]
    fn test_endpoint_url() {
        let config = StabilityConfig::new();
        assert_eq!(
            config.endpoint_url(),
            "https://api.stability.ai/v1/generation/stable-diffusion-xl-1024-v1-0/text-to-image"
        );

        let config = StabilityConfig::new()
            .with_api_host("http://localhost:9000/")
            .with_engine_id("sd3");
        assert_eq!(
            config.endpoint_url(),
            "http://localhost:9000/v1/generation/sd3/text-to-image"
        );
    }

    #[test]
    fn test_request_body_shape() {
        let body = serde_json::to_value(TextToImageRequest::new("a lighthouse")).unwrap();
        assert_eq!(
            body,
            json!({
                "text_prompts": [{"text": "a lighthouse"}],
                "cfg_scale": 7,
                "height": 1024,
                "width": 1024,
                "steps": 30,
                "samples": 1
            })
        );
    }

    #[test]
    fn test_invalid_host_rejected() {
        let result = StabilityProvider::new(StabilityConfig::new().with_api_host("not a url"));
        assert!(matches!(result, Err(RelayError::Configuration { .. })));
    }

    #[test]
    fn test_empty_engine_rejected() {
        let result = StabilityProvider::new(StabilityConfig::new().with_engine_id(""));
        assert!(matches!(result, Err(RelayError::Configuration { .. })));
    }

    #[tokio::test]
    async fn test_success_sends_expected_request_and_relays_body() {
        let server = MockServer::start().await;
        let upstream_body = r#"{"artifacts":[{"base64":"iVBORw0KGgo=","seed":42,"finishReason":"SUCCESS"}]}"#;

        Mock::given(method("POST"))
            .and(path(ENDPOINT))
            .and(header("authorization", "Bearer sk-test-key-0001"))
            .and(header("accept", "application/json"))
            .and(header("content-type", "application/json"))
            .and(body_json(json!({
                "text_prompts": [{"text": "a red fox"}],
                "cfg_scale": 7,
                "height": 1024,
                "width": 1024,
                "steps": 30,
                "samples": 1
            })))
            .respond_with(ResponseTemplate::new(200).set_body_raw(upstream_body, "application/json"))
            .expect(1)
            .mount(&server)
            .await;

        let outcome = provider_for(&server)
            .generate(&Credential::new("sk-test-key-0001"), &request("a red fox"))
            .await;

        match outcome {
            GenerationOutcome::Success(image) => {
                assert_eq!(image.body().as_ref(), upstream_body.as_bytes());
            }
            other => panic!("expected success, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_unauthorized() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(ENDPOINT))
            .respond_with(ResponseTemplate::new(401).set_body_string("invalid key"))
            .mount(&server)
            .await;

        let outcome = provider_for(&server)
            .generate(&Credential::new("sk-expired-0002"), &request("x"))
            .await;

        assert_eq!(outcome, GenerationOutcome::Unauthorized);
    }

    #[tokio::test]
    async fn test_other_http_error_keeps_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(ENDPOINT))
            .respond_with(
                ResponseTemplate::new(400)
                    .set_body_string(r#"{"name":"invalid_prompts","message":"prompt blocked"}"#),
            )
            .mount(&server)
            .await;

        let outcome = provider_for(&server)
            .generate(&Credential::new("sk-test-key-0003"), &request("x"))
            .await;

        assert_eq!(
            outcome,
            GenerationOutcome::OtherHttpError {
                status: 400,
                body: r#"{"name":"invalid_prompts","message":"prompt blocked"}"#.to_string(),
            }
        );
    }

    #[tokio::test]
    async fn test_non_json_success_is_transport_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(ENDPOINT))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
            .mount(&server)
            .await;

        let outcome = provider_for(&server)
            .generate(&Credential::new("sk-test-key-0004"), &request("x"))
            .await;

        assert!(matches!(outcome, GenerationOutcome::TransportError { .. }));
    }

    #[tokio::test]
    async fn test_connection_refused_is_transport_error() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let uri = format!("http://{}", listener.local_addr().unwrap());
        drop(listener);

        let provider = StabilityProvider::new(StabilityConfig::new().with_api_host(uri)).unwrap();
        let outcome = provider
            .generate(&Credential::new("sk-test-key-0005"), &request("x"))
            .await;

        match outcome {
            GenerationOutcome::TransportError { message } => {
                assert!(message.starts_with("Request failed"));
            }
            other => panic!("expected transport error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_client_timeout_is_transport_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(ENDPOINT))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string("{}")
                    .set_delay(Duration::from_secs(5)),
            )
            .mount(&server)
            .await;

        let provider = StabilityProvider::new(
            StabilityConfig::new()
                .with_api_host(server.uri())
                .with_timeout(Duration::from_millis(100)),
        )
        .unwrap();

        let outcome = provider
            .generate(&Credential::new("sk-test-key-0006"), &request("x"))
            .await;

        assert!(matches!(outcome, GenerationOutcome::TransportError { .. }));
    }
}
