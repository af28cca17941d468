//! # Relay Server
//!
//! HTTP server for the image generation relay.
//!
//! This crate provides:
//! - Axum-based HTTP server
//! - The `POST /api/generate-image` endpoint
//! - Health, readiness and liveness probes
//! - Optional static file serving
//! - Graceful shutdown handling

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod extractors;
pub mod handlers;
pub mod health;
pub mod routes;
pub mod server;
pub mod shutdown;
pub mod state;

// Re-export main types
pub use error::{ApiError, ServerError};
pub use routes::create_router;
pub use server::{Server, ServerConfig};
pub use shutdown::shutdown_signal;
pub use state::AppState;
