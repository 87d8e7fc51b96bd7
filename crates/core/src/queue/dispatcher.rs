//! Concurrent batch dispatch
//!
//! Every buffered message is sent by its own tokio task. A semaphore bounds
//! how many sends are in flight at once and each send is capped by the
//! per-request timeout. There is no retry: a failed or timed-out send is a
//! reject and the message is dropped. `dispatch` returns only after every
//! task of the batch has settled.
//!
//! Send tasks live in a [`JoinSet`] owned by the `dispatch` future. Dropping
//! that future aborts the unsettled sends, so nothing touches the tracker
//! after the caller stopped waiting. Messages abandoned this way are
//! counted neither as sent nor as rejected.

use std::sync::Arc;
use std::time::Duration;

use queuesink_domain::{BatchOutcome, PendingMessage, QueueSinkError, WriterConfig};
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, error, instrument, warn};

use super::outcome::OutcomeTracker;
use super::ports::QueueClient;

/// Fans a batch of messages out to a queue client.
#[derive(Debug, Clone)]
pub struct BatchDispatcher {
    send_timeout: Duration,
    max_concurrent_sends: usize,
}

impl BatchDispatcher {
    pub fn new(send_timeout: Duration, max_concurrent_sends: usize) -> Self {
        Self { send_timeout, max_concurrent_sends: max_concurrent_sends.max(1) }
    }

    pub fn from_config(config: &WriterConfig) -> Self {
        Self::new(config.send_timeout(), config.max_concurrent_sends)
    }

    /// Send every message in `messages` and wait for all of them to settle.
    ///
    /// Outcomes are recorded on `tracker` as they complete; the returned
    /// summary covers this batch only.
    #[instrument(
        skip_all,
        fields(queue = %client.queue_name(), batch_size = messages.len())
    )]
    pub async fn dispatch(
        &self,
        client: &Arc<dyn QueueClient>,
        messages: Vec<PendingMessage>,
        tracker: &Arc<OutcomeTracker>,
    ) -> BatchOutcome {
        if messages.is_empty() {
            return BatchOutcome::default();
        }

        let permits = Arc::new(Semaphore::new(self.max_concurrent_sends));
        let mut tasks = JoinSet::new();
        for message in messages {
            let client = Arc::clone(client);
            let tracker = Arc::clone(tracker);
            let permits = Arc::clone(&permits);
            let send_timeout = self.send_timeout;
            tasks.spawn(async move {
                let _permit = match permits.acquire_owned().await {
                    Ok(permit) => permit,
                    Err(err) => {
                        error!(error = %err, "Dispatch semaphore closed");
                        tracker.record_reject();
                        return false;
                    }
                };
                send_one(client.as_ref(), message, send_timeout, &tracker).await
            });
        }

        let mut outcome = BatchOutcome::default();
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(true) => outcome.sent = outcome.sent.saturating_add(1),
                Ok(false) => outcome.rejected = outcome.rejected.saturating_add(1),
                Err(join_err) => {
                    let err = QueueSinkError::Internal(format!("send task failed: {join_err}"));
                    error!(error = %err, kind = err.label(), "Send task ended without an outcome");
                    tracker.record_reject();
                    outcome.rejected = outcome.rejected.saturating_add(1);
                }
            }
        }

        debug!(
            total = outcome.total(),
            sent = outcome.sent,
            rejected = outcome.rejected,
            "Batch dispatched"
        );
        outcome
    }

    /// Count every message as rejected without sending.
    ///
    /// Used when no queue handle could be resolved for the batch.
    pub fn reject_all(
        &self,
        messages: Vec<PendingMessage>,
        tracker: &OutcomeTracker,
        reason: &QueueSinkError,
    ) -> BatchOutcome {
        let rejected = messages.len() as u64;
        for _ in messages {
            tracker.record_reject();
        }
        if rejected > 0 {
            warn!(rejected, error = %reason, "Batch rejected without a queue handle");
        }
        BatchOutcome { sent: 0, rejected }
    }
}

async fn send_one(
    client: &dyn QueueClient,
    message: PendingMessage,
    send_timeout: Duration,
    tracker: &OutcomeTracker,
) -> bool {
    let attempt = client.send_message(
        &message.text,
        message.visibility_delay,
        message.time_to_live,
        send_timeout,
    );

    let result = match tokio::time::timeout(send_timeout, attempt).await {
        Ok(result) => result,
        Err(_) => Err(QueueSinkError::Timeout(send_timeout)),
    };

    match result {
        Ok(()) => {
            tracker.record_success(message.record);
            true
        }
        Err(err) => {
            if err.is_per_message() {
                warn!(error = %err, kind = err.label(), "Message send rejected");
            } else {
                error!(error = %err, kind = err.label(), "Message send failed");
            }
            tracker.record_reject();
            false
        }
    }
}
