//! Writer constants
//!
//! Centralized location for the defaults shared by configuration, the
//! dispatcher and the record model.

/// Record field holding the text of the outbound message.
pub const MESSAGE_CONTENT_FIELD: &str = "MessageContent";

// Dispatch configuration
pub const DEFAULT_BATCH_THRESHOLD: usize = 1000;
pub const DEFAULT_SEND_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_MAX_CONCURRENT_SENDS: usize = 64;

// Message lifetime defaults (seconds)
pub const DEFAULT_TIME_TO_LIVE_SECS: u64 = 7 * 24 * 60 * 60;
pub const DEFAULT_VISIBILITY_DELAY_SECS: u64 = 0;
