//! Connection checks and queue discovery
//!
//! Validation reports problems as a value so configuration screens can show
//! them; listing propagates errors to the caller.

use queuesink_domain::Result;
use tracing::{debug, instrument, warn};

use crate::queue::ConnectionProvider;

/// Outcome of a connection check
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationResult {
    Ok,
    Error(String),
}

impl ValidationResult {
    pub fn is_ok(&self) -> bool {
        matches!(self, Self::Ok)
    }

    /// Error message, if any
    pub fn message(&self) -> Option<&str> {
        match self {
            Self::Ok => None,
            Self::Error(message) => Some(message),
        }
    }
}

/// Check that `provider` can reach its storage account.
///
/// Listing queues is used as the probe since it needs no queue name.
#[instrument(skip(provider))]
pub async fn validate_connection(provider: &dyn ConnectionProvider) -> ValidationResult {
    match provider.list_queues().await {
        Ok(queues) => {
            debug!(queue_count = queues.len(), "Connection validated");
            ValidationResult::Ok
        }
        Err(err) => {
            warn!(error = %err, "Connection validation failed");
            ValidationResult::Error(err.to_string())
        }
    }
}

/// Sorted, de-duplicated names of the queues reachable through `provider`.
///
/// # Errors
/// Propagates the provider's `QueueSinkError::Connection`.
pub async fn list_queue_names(provider: &dyn ConnectionProvider) -> Result<Vec<String>> {
    let mut names = provider.list_queues().await?;
    names.sort();
    names.dedup();
    Ok(names)
}
