//! Batched queue writing
//!
//! This module provides the queue ports and the writer built on them:
//! buffer, concurrent dispatcher and outcome tracker.

pub mod buffer;
pub mod dispatcher;
pub mod outcome;
pub mod ports;
pub mod writer;

pub use buffer::RecordBuffer;
pub use dispatcher::BatchDispatcher;
pub use outcome::OutcomeTracker;
pub use ports::{ConnectionProvider, QueueClient};
pub use writer::QueueWriter;
