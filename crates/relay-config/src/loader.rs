//! Source layering: defaults, YAML file, environment.

use crate::error::ConfigError;
use crate::settings::RelayConfig;
use relay_core::CredentialSet;
use std::fmt::Display;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;
use tracing::debug;

/// Variable naming the optional YAML config file
pub const CONFIG_PATH_ENV: &str = "RELAY_CONFIG";

/// Recognized environment variables
pub mod env_keys {
    /// Comma-separated upstream API keys, tried in order
    pub const API_KEYS: &str = "STABILITY_API_KEYS";
    /// Listen port
    pub const PORT: &str = "PORT";
    /// Bind address
    pub const HOST: &str = "HOST";
    /// Upstream API host
    pub const API_HOST: &str = "STABILITY_API_HOST";
    /// Upstream engine identifier
    pub const ENGINE_ID: &str = "STABILITY_ENGINE_ID";
    /// Per-attempt timeout in whole seconds
    pub const TIMEOUT_SECS: &str = "UPSTREAM_TIMEOUT_SECS";
    /// Static asset directory
    pub const STATIC_DIR: &str = "STATIC_DIR";
    /// Log filter directive
    pub const LOG_LEVEL: &str = "LOG_LEVEL";
    /// Log output format
    pub const LOG_FORMAT: &str = "LOG_FORMAT";
}

/// Load configuration from the process environment
///
/// # Errors
/// Returns error if the config file cannot be read or a value is invalid
pub fn load_config() -> Result<RelayConfig, ConfigError> {
    load_from(|key| std::env::var(key).ok())
}

/// Load configuration using `lookup` in place of the process environment
///
/// # Errors
/// Returns error if the config file cannot be read or a value is invalid
pub fn load_from<F>(lookup: F) -> Result<RelayConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let base = match non_empty(&lookup, CONFIG_PATH_ENV) {
        Some(path) => RelayConfig::from_file(path)?,
        None => RelayConfig::default(),
    };

    let config = base.apply_env(&lookup)?;
    config.check()?;
    Ok(config)
}

impl RelayConfig {
    /// Read a YAML config file
    ///
    /// # Errors
    /// Returns error if the file cannot be read or parsed
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        debug!(path = %path.display(), "Reading config file");

        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        Ok(serde_yaml::from_str(&contents)?)
    }

    /// Overlay environment values onto this configuration
    ///
    /// Unset and blank variables leave the current value alone, except
    /// `STABILITY_API_KEYS`, which replaces the key list whenever it is set.
    ///
    /// # Errors
    /// Returns error if a numeric or enumerated value cannot be parsed
    pub fn apply_env<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(raw) = lookup(env_keys::API_KEYS) {
            self.upstream.api_keys = CredentialSet::parse(&raw);
        }

        if let Some(host) = non_empty(&lookup, env_keys::HOST) {
            self.server.host = host;
        }
        if let Some(port) = non_empty(&lookup, env_keys::PORT) {
            self.server.port = parse_value(env_keys::PORT, &port)?;
        }
        if let Some(dir) = non_empty(&lookup, env_keys::STATIC_DIR) {
            self.server.static_dir = Some(PathBuf::from(dir));
        }

        if let Some(api_host) = non_empty(&lookup, env_keys::API_HOST) {
            self.upstream.api_host = api_host;
        }
        if let Some(engine_id) = non_empty(&lookup, env_keys::ENGINE_ID) {
            self.upstream.engine_id = engine_id;
        }
        if let Some(secs) = non_empty(&lookup, env_keys::TIMEOUT_SECS) {
            self.upstream.timeout = Duration::from_secs(parse_value(env_keys::TIMEOUT_SECS, &secs)?);
        }

        if let Some(level) = non_empty(&lookup, env_keys::LOG_LEVEL) {
            self.logging.level = level;
        }
        if let Some(format) = non_empty(&lookup, env_keys::LOG_FORMAT) {
            self.logging.format = parse_value(env_keys::LOG_FORMAT, &format)?;
        }

        Ok(self)
    }
}

fn non_empty<F>(lookup: &F, key: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn parse_value<T>(key: &str, value: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: Display,
{
    value
        .parse()
        .map_err(|e| ConfigError::invalid_value(key, format!("{value:?}: {e}")))
}
