//! # Relay Providers
//!
//! Upstream image generation provider implementations for the relay.
//!
//! This crate provides:
//! - Stability AI text-to-image (SDXL)

#![forbid(unsafe_code)]
#![warn(missing_docs)]

#[cfg(feature = "stability")]
pub mod stability;

// Re-export main types
#[cfg(feature = "stability")]
pub use stability::{StabilityConfig, StabilityProvider};
