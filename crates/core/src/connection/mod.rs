//! Connection validation and queue discovery

pub mod validation;

pub use validation::{list_queue_names, validate_connection, ValidationResult};
