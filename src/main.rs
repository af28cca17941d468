//! # Image Relay
//!
//! HTTP relay in front of the Stability AI text-to-image API that rotates
//! through an ordered list of API keys until one succeeds.
//!
//! ## Usage
//!
//! ```bash
//! # Keys are tried left to right for every request
//! STABILITY_API_KEYS=sk-first,sk-second image-relay
//!
//! # Serve a front-end and log human-readable lines
//! STATIC_DIR=./public LOG_FORMAT=pretty PORT=8080 image-relay
//!
//! # Layer a YAML file under the environment
//! RELAY_CONFIG=/etc/image-relay.yaml image-relay
//! ```

use anyhow::Context;
use relay_config::{load_config, RelayConfig};
use relay_providers::{StabilityConfig, StabilityProvider};
use relay_resilience::FailoverDispatcher;
use relay_server::{AppState, Server, ServerConfig};
use relay_telemetry::{init_logging, LoggingConfig, TracingEventSink};
use std::sync::Arc;
use tracing::{error, info};

/// Application entry point
#[tokio::main]
async fn main() {
    // A missing .env file is normal in production
    let _ = dotenvy::dotenv();

    let config = match load_config() {
        Ok(config) => config,
        Err(e) => {
            let _ = init_logging(&LoggingConfig::default());
            error!(error = %e, "Failed to load configuration");
            std::process::exit(1);
        }
    };

    if let Err(e) = init_logging(&config.logging) {
        eprintln!("Failed to initialize logging: {e}");
    }

    info!(
        version = env!("CARGO_PKG_VERSION"),
        "Starting image relay"
    );

    if let Err(e) = run(config).await {
        error!(error = %format!("{e:#}"), "Application failed");
        std::process::exit(1);
    }
}

/// Main application logic
async fn run(config: RelayConfig) -> anyhow::Result<()> {
    config.log_summary();

    let provider = StabilityProvider::new(
        StabilityConfig::new()
            .with_api_host(&config.upstream.api_host)
            .with_engine_id(&config.upstream.engine_id)
            .with_timeout(config.upstream.timeout),
    )
    .context("Failed to create Stability provider")?;

    info!(endpoint = %provider.endpoint(), "Upstream provider initialized");

    let dispatcher = FailoverDispatcher::builder()
        .provider(Arc::new(provider))
        .credentials(config.upstream.api_keys.clone())
        .sink(Arc::new(TracingEventSink::new()))
        .attempt_timeout(config.upstream.timeout)
        .build()
        .context("Failed to create failover dispatcher")?;

    let server = Server::new(ServerConfig::from(&config.server), AppState::new(dispatcher));

    server.run().await.context("Server failed")?;

    Ok(())
}
