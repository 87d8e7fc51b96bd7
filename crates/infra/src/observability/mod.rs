//! Observability infrastructure
//!
//! Structured logging through `tracing`. Writer components emit events with
//! stable field names (`queue`, `session`, `sent`, `rejected`, `error`);
//! this module installs the subscriber that renders them.

pub mod logging;

pub use logging::{init_tracing, log_session_summary, LogFormat};
