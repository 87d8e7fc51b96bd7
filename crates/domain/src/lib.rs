//! # queuesink Domain
//!
//! Domain types for the batched queue writer.
//!
//! This crate contains:
//! - Records, pending messages and the aggregate write result
//! - The domain error type and Result definition
//! - Writer configuration
//! - Shared constants
//!
//! ## Architecture
//! - No dependencies on other queuesink crates
//! - Only external dependencies allowed
//! - Pure domain models and data structures

pub mod config;
pub mod constants;
pub mod errors;
pub mod types;

// Re-export commonly used items
pub use config::*;
pub use errors::*;
pub use types::*;
