//! # queuesink Infrastructure
//!
//! Process-level plumbing around the writer.
//!
//! This crate contains:
//! - Configuration loading from environment variables and files
//! - Tracing subscriber initialisation and session log helpers
//!
//! ## Architecture
//! - Depends on `queuesink-domain`
//! - Queue transports implement the ports in `queuesink-core` and are
//!   supplied by the embedding application

pub mod config;
pub mod observability;

// Re-export commonly used items
pub use observability::{init_tracing, LogFormat};
