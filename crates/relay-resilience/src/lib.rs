//! # Relay Resilience
//!
//! Resilience patterns for the image generation relay:
//! - Sequential credential failover with a bounded per-attempt timeout

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod failover;

// Re-export main types
pub use failover::{
    Dispatched, FailoverConfig, FailoverDispatcher, FailoverDispatcherBuilder, messages,
};
