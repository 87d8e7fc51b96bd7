//! Domain types and models

pub mod message;
pub mod record;

pub use message::{BatchOutcome, PendingMessage, WriteResult, WriterState};
pub use record::Record;
