//! Configuration management

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_BATCH_THRESHOLD, DEFAULT_MAX_CONCURRENT_SENDS, DEFAULT_SEND_TIMEOUT_SECS,
    DEFAULT_TIME_TO_LIVE_SECS, DEFAULT_VISIBILITY_DELAY_SECS,
};
use crate::errors::{QueueSinkError, Result};

/// Queue writer configuration
///
/// Message lifetime settings apply to every message of a writer session;
/// they are not taken from individual records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WriterConfig {
    /// Name of the destination queue
    pub queue_name: String,
    pub time_to_live_seconds: u64,
    pub initial_visibility_delay_seconds: u64,
    /// Abort the session on connection and content errors instead of
    /// logging and continuing
    pub die_on_error: bool,
    /// Buffered message count that triggers a dispatch
    pub batch_threshold: usize,
    /// Cap on a single send attempt
    pub send_timeout_seconds: u64,
    /// Upper bound on in-flight sends during one dispatch
    pub max_concurrent_sends: usize,
}

impl Default for WriterConfig {
    fn default() -> Self {
        Self {
            queue_name: String::new(),
            time_to_live_seconds: DEFAULT_TIME_TO_LIVE_SECS,
            initial_visibility_delay_seconds: DEFAULT_VISIBILITY_DELAY_SECS,
            die_on_error: false,
            batch_threshold: DEFAULT_BATCH_THRESHOLD,
            send_timeout_seconds: DEFAULT_SEND_TIMEOUT_SECS,
            max_concurrent_sends: DEFAULT_MAX_CONCURRENT_SENDS,
        }
    }
}

impl WriterConfig {
    /// Default configuration targeting `queue_name`.
    pub fn for_queue(queue_name: impl Into<String>) -> Self {
        Self { queue_name: queue_name.into(), ..Self::default() }
    }

    pub fn time_to_live(&self) -> Duration {
        Duration::from_secs(self.time_to_live_seconds)
    }

    pub fn visibility_delay(&self) -> Duration {
        Duration::from_secs(self.initial_visibility_delay_seconds)
    }

    pub fn send_timeout(&self) -> Duration {
        Duration::from_secs(self.send_timeout_seconds)
    }

    /// Validate the configuration
    ///
    /// # Errors
    /// Returns `QueueSinkError::Config` naming the first invalid field.
    pub fn validate(&self) -> Result<()> {
        if self.queue_name.trim().is_empty() {
            return Err(QueueSinkError::Config("queue_name must not be empty".to_string()));
        }
        if self.batch_threshold == 0 {
            return Err(QueueSinkError::Config(
                "batch_threshold must be greater than 0".to_string(),
            ));
        }
        if self.send_timeout_seconds == 0 {
            return Err(QueueSinkError::Config(
                "send_timeout_seconds must be greater than 0".to_string(),
            ));
        }
        if self.max_concurrent_sends == 0 {
            return Err(QueueSinkError::Config(
                "max_concurrent_sends must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }
}
