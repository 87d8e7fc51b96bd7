//! # queuesink Core
//!
//! Writer logic layer - no transport dependencies.
//!
//! This crate contains:
//! - Port interfaces for queue access (traits)
//! - The batched queue writer: buffer, dispatcher, outcome tracker
//! - Connection validation and queue discovery
//!
//! ## Architecture Principles
//! - Only depends on `queuesink-domain`
//! - No storage SDK or HTTP code
//! - All external dependencies via traits

pub mod connection;
pub mod queue;

#[cfg(any(test, feature = "test-utils"))]
pub mod testing;

pub use connection::{list_queue_names, validate_connection, ValidationResult};
pub use queue::{
    BatchDispatcher, ConnectionProvider, OutcomeTracker, QueueClient, QueueWriter, RecordBuffer,
};
