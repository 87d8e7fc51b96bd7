//! Testing utilities
//!
//! In-memory implementations of [`ConnectionProvider`](crate::queue::ConnectionProvider)
//! and [`QueueClient`](crate::queue::QueueClient). Enabled for this crate's
//! own tests and, for downstream crates, through the `test-utils` feature.

pub mod mocks;

pub use mocks::{InMemoryConnectionProvider, InMemoryQueueClient, SentMessage};
