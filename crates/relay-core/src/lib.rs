//! # Relay Core
//!
//! Core types, traits, and error handling for the image generation relay.
//!
//! This crate provides the foundational types used throughout the relay:
//! - Upstream credentials and their redacted log hints
//! - The inbound generation request and its validation
//! - The tagged per-attempt outcome of an upstream call
//! - Structured log events and the sink they are emitted to
//! - Error types and handling

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod credential;
pub mod error;
pub mod event;
pub mod outcome;
pub mod provider;
pub mod request;

#[cfg(feature = "testing")]
pub mod testing;

// Re-export commonly used types
pub use credential::{Credential, CredentialHint, CredentialSet};
pub use error::RelayError;
pub use event::{EventSink, LogEvent, LogLevel, NoopSink};
pub use outcome::{GeneratedImage, GenerationOutcome};
pub use provider::ImageProvider;
pub use request::GenerationRequest;
