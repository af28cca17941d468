//! # Relay Telemetry
//!
//! Logging for the image generation relay.
//!
//! This crate provides:
//! - Subscriber setup (JSON or human-readable, always on stderr)
//! - A [`relay_core::EventSink`] that forwards relay decision events to `tracing`

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod logging;
pub mod sink;

// Re-export main types
pub use logging::{init_logging, LogFormat, LoggingConfig, TelemetryError};
pub use sink::{TracingEventSink, EVENT_TARGET};
