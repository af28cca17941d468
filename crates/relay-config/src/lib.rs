//! # Relay Config
//!
//! Configuration for the image generation relay.
//!
//! Values are resolved once at startup, lowest to highest precedence:
//! - Built-in defaults
//! - An optional YAML file named by `RELAY_CONFIG`
//! - Process environment variables
//!
//! There is no hot reload.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod loader;
pub mod settings;

// Re-export main types
pub use error::ConfigError;
pub use loader::{env_keys, load_config, load_from, CONFIG_PATH_ENV};
pub use settings::{RelayConfig, ServerSettings, UpstreamSettings};
