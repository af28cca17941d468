//! Configuration types.

use crate::error::ConfigError;
use relay_core::CredentialSet;
use relay_telemetry::LoggingConfig;
use serde::{Deserialize, Deserializer};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{info, warn};
use validator::Validate;

/// Default listen port
pub const DEFAULT_PORT: u16 = 3000;

/// Default bind address
pub const DEFAULT_HOST: &str = "0.0.0.0";

/// Complete relay configuration
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(default)]
pub struct RelayConfig {
    /// HTTP listener settings
    #[validate(nested)]
    pub server: ServerSettings,

    /// Upstream API settings and credentials
    #[validate(nested)]
    pub upstream: UpstreamSettings,

    /// Log output settings
    pub logging: LoggingConfig,
}

/// HTTP listener settings
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(default)]
pub struct ServerSettings {
    /// Bind address
    #[validate(length(min = 1))]
    pub host: String,

    /// Listen port
    pub port: u16,

    /// Directory served as static files at `/`, if any
    pub static_dir: Option<PathBuf>,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            static_dir: None,
        }
    }
}

impl ServerSettings {
    /// `host:port` string suitable for binding
    #[must_use]
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Upstream API settings
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(default)]
pub struct UpstreamSettings {
    /// API host, e.g. `https://api.stability.ai`
    #[validate(url)]
    pub api_host: String,

    /// Engine identifier
    #[validate(length(min = 1))]
    pub engine_id: String,

    /// Per-attempt timeout
    #[serde(with = "humantime_serde")]
    pub timeout: Duration,

    /// Ordered credentials tried for each request
    #[serde(deserialize_with = "deserialize_credentials")]
    pub api_keys: CredentialSet,
}

impl Default for UpstreamSettings {
    fn default() -> Self {
        Self {
            api_host: "https://api.stability.ai".to_string(),
            engine_id: "stable-diffusion-xl-1024-v1-0".to_string(),
            timeout: Duration::from_secs(60),
            api_keys: CredentialSet::empty(),
        }
    }
}

fn deserialize_credentials<'de, D>(deserializer: D) -> Result<CredentialSet, D::Error>
where
    D: Deserializer<'de>,
{
    let keys = Vec::<String>::deserialize(deserializer)?;
    Ok(CredentialSet::new(keys))
}

impl RelayConfig {
    /// Run field validation plus cross-field checks
    ///
    /// # Errors
    /// Returns a validation error describing every failed field
    pub fn check(&self) -> Result<(), ConfigError> {
        self.validate()?;

        if self.upstream.timeout.is_zero() {
            return Err(ConfigError::validation("upstream.timeout must be greater than zero"));
        }

        Ok(())
    }

    /// Log the resolved configuration without secrets
    pub fn log_summary(&self) {
        info!(
            bind = %self.server.bind_address(),
            static_dir = ?self.server.static_dir,
            api_host = %self.upstream.api_host,
            engine_id = %self.upstream.engine_id,
            timeout_ms = self.upstream.timeout.as_millis() as u64,
            credentials = self.upstream.api_keys.len(),
            "Configuration loaded"
        );

        if self.upstream.api_keys.is_empty() {
            warn!("No API keys configured; generation requests will fail until STABILITY_API_KEYS is set");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = RelayConfig::default();

        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 3000);
        assert!(config.server.static_dir.is_none());
        assert_eq!(config.upstream.api_host, "https://api.stability.ai");
        assert_eq!(config.upstream.engine_id, "stable-diffusion-xl-1024-v1-0");
        assert_eq!(config.upstream.timeout, Duration::from_secs(60));
        assert!(config.upstream.api_keys.is_empty());
        assert_eq!(config.logging.level, "info");
        assert!(config.check().is_ok());
    }

    #[test]
    fn test_bind_address() {
        let settings = ServerSettings {
            host: "127.0.0.1".to_string(),
            port: 8080,
            static_dir: None,
        };
        assert_eq!(settings.bind_address(), "127.0.0.1:8080");
    }

    #[test]
    fn test_invalid_api_host() {
        let mut config = RelayConfig::default();
        config.upstream.api_host = "not a url".to_string();

        assert!(matches!(config.check(), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn test_empty_engine_id() {
        let mut config = RelayConfig::default();
        config.upstream.engine_id = String::new();

        assert!(matches!(config.check(), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn test_zero_timeout() {
        let mut config = RelayConfig::default();
        config.upstream.timeout = Duration::ZERO;

        assert!(matches!(config.check(), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn test_yaml_shape() {
        let yaml = r#"
server:
  port: 8080
  static_dir: ./public
upstream:
  timeout: 45s
  api_keys:
    - sk-yaml-first-0001
    - "  "
    - sk-yaml-second-0002
logging:
  format: pretty
"#;
        let config: RelayConfig = serde_yaml::from_str(yaml).unwrap();

        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.static_dir, Some(PathBuf::from("./public")));
        assert_eq!(config.upstream.timeout, Duration::from_secs(45));
        assert_eq!(config.upstream.api_keys.len(), 2);
        assert_eq!(config.logging.format, relay_telemetry::LogFormat::Pretty);
        assert_eq!(config.logging.level, "info");
    }
}
