//! Port interfaces for queue access

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use queuesink_domain::Result;

/// Client bound to a single destination queue.
///
/// Implementations must tolerate concurrent `send_message` calls; the
/// dispatcher shares one client across all in-flight sends.
#[async_trait]
pub trait QueueClient: Send + Sync {
    /// Name of the queue this client writes to
    fn queue_name(&self) -> &str;

    /// Enqueue one message.
    ///
    /// `request_timeout` is the server-side budget for the request; the
    /// dispatcher enforces the same limit locally.
    async fn send_message(
        &self,
        text: &str,
        visibility_delay: Duration,
        time_to_live: Duration,
        request_timeout: Duration,
    ) -> Result<()>;
}

/// Source of queue clients for a configured storage account.
#[async_trait]
pub trait ConnectionProvider: Send + Sync {
    /// Resolve a client for `queue_name`.
    ///
    /// Fails with `QueueSinkError::Connection` when the account cannot be
    /// reached or the queue cannot be obtained.
    async fn queue_client(&self, queue_name: &str) -> Result<Arc<dyn QueueClient>>;

    /// Names of the queues reachable through this connection
    async fn list_queues(&self) -> Result<Vec<String>>;
}
