//! Error types used throughout the writer

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Main error type for queuesink
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "message")]
pub enum QueueSinkError {
    /// The queue could not be resolved or the connection failed
    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Configuration error: {0}")]
    Config(String),

    /// A single send attempt was refused by the queue service
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Timeout after {0:?}")]
    Timeout(Duration),

    /// The writer was driven out of its lifecycle order
    #[error("Invalid writer state: {0}")]
    InvalidState(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl QueueSinkError {
    /// Stable label suitable for structured log fields.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Connection(_) => "connection",
            Self::Config(_) => "config",
            Self::Transport(_) => "transport",
            Self::Timeout(_) => "timeout",
            Self::InvalidState(_) => "invalid_state",
            Self::Internal(_) => "internal",
        }
    }

    /// Whether the error only ever costs a single message.
    ///
    /// Send-level failures are absorbed into the reject counter and never
    /// terminate a writer session.
    pub fn is_per_message(&self) -> bool {
        matches!(self, Self::Transport(_) | Self::Timeout(_))
    }
}

/// Result type alias for queuesink operations
pub type Result<T> = std::result::Result<T, QueueSinkError>;
