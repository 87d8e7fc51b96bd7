//! Batched queue writer
//!
//! Translates records into queue messages, buffers them and dispatches a
//! batch whenever the buffer reaches its threshold and once more on close.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use queuesink_core::queue::{ConnectionProvider, QueueWriter};
//! use queuesink_domain::{Record, WriterConfig};
//!
//! # async fn example(provider: Arc<dyn ConnectionProvider>) -> queuesink_domain::Result<()> {
//! let mut writer = QueueWriter::new(WriterConfig::for_queue("orders"), provider)?;
//!
//! writer.open("job-42").await?;
//! writer.write(Record::new().with_field("MessageContent", "hello")).await?;
//! let result = writer.close().await?;
//!
//! println!("sent {} of {}", result.success_count, result.total_count);
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;

use queuesink_domain::constants::MESSAGE_CONTENT_FIELD;
use queuesink_domain::{
    BatchOutcome, PendingMessage, QueueSinkError, Record, Result, WriteResult, WriterConfig,
    WriterState,
};
use tracing::{debug, error, info, instrument, warn};

use super::buffer::RecordBuffer;
use super::dispatcher::BatchDispatcher;
use super::outcome::OutcomeTracker;
use super::ports::{ConnectionProvider, QueueClient};

/// Queue writer with explicit lifecycle management.
///
/// Driven by a single caller: `open`, any number of `write`s, then `close`.
/// Batch N is fully settled before batch N + 1 starts because dispatch
/// happens inside `write`/`close`, which take `&mut self`.
pub struct QueueWriter {
    config: WriterConfig,
    provider: Arc<dyn ConnectionProvider>,
    dispatcher: BatchDispatcher,
    buffer: RecordBuffer,
    tracker: Arc<OutcomeTracker>,
    queue: Option<Arc<dyn QueueClient>>,
    state: WriterState,
    session_id: String,
}

impl QueueWriter {
    /// Create an unopened writer.
    ///
    /// # Errors
    /// Returns `QueueSinkError::Config` if `config` fails validation.
    pub fn new(config: WriterConfig, provider: Arc<dyn ConnectionProvider>) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            dispatcher: BatchDispatcher::from_config(&config),
            buffer: RecordBuffer::new(config.batch_threshold),
            tracker: Arc::new(OutcomeTracker::new()),
            queue: None,
            state: WriterState::Unopened,
            session_id: String::new(),
            config,
            provider,
        })
    }

    pub fn state(&self) -> WriterState {
        self.state
    }

    /// Messages accepted but not yet dispatched.
    pub fn pending(&self) -> usize {
        self.buffer.len()
    }

    /// Current counters for the session.
    pub fn result(&self) -> WriteResult {
        self.tracker.snapshot(&self.session_id)
    }

    /// Start a session identified by `id` and resolve the target queue.
    ///
    /// A resolution failure aborts the session when `die_on_error` is set.
    /// Otherwise the writer enters [`WriterState::Degraded`]: writes are
    /// still accepted and each dispatch retries resolution once, counting
    /// the batch as rejected if it still fails.
    ///
    /// # Errors
    /// - `QueueSinkError::InvalidState` if the writer is already open
    /// - `QueueSinkError::Connection` on resolution failure with
    ///   `die_on_error`
    #[instrument(skip(self), fields(queue = %self.config.queue_name))]
    pub async fn open(&mut self, id: &str) -> Result<()> {
        if self.state.accepts_writes() {
            return Err(QueueSinkError::InvalidState(format!("writer already {}", self.state)));
        }

        self.session_id = id.to_string();
        self.tracker.reset();
        self.buffer.clear();
        self.queue = None;

        match self.provider.queue_client(&self.config.queue_name).await {
            Ok(client) => {
                self.queue = Some(client);
                self.state = WriterState::Open;
                info!(session = id, "Queue writer opened");
                Ok(())
            }
            Err(err) => {
                error!(session = id, error = %err, "Failed to resolve queue");
                if self.config.die_on_error {
                    self.state = WriterState::Aborted;
                    return Err(err);
                }
                warn!(session = id, "Continuing without a queue handle; sends will be rejected");
                self.state = WriterState::Degraded;
                Ok(())
            }
        }
    }

    /// Accept one record.
    ///
    /// Empty records are ignored. A record without a string
    /// `MessageContent` field is counted in `total_count` and then either
    /// aborts the session (`die_on_error`) or is skipped; it is never
    /// counted as a reject.
    ///
    /// A write that fills the buffer dispatches the batch before returning.
    /// Dropping the future during that dispatch abandons the batch: its
    /// unsent messages are counted in neither success nor reject.
    ///
    /// # Errors
    /// - `QueueSinkError::InvalidState` outside an open session
    /// - `QueueSinkError::Config` for missing content with `die_on_error`
    pub async fn write(&mut self, record: Record) -> Result<()> {
        self.ensure_accepting("write")?;
        if record.is_empty() {
            return Ok(());
        }

        self.tracker.record_received();

        let Some(text) = record.get_str(MESSAGE_CONTENT_FIELD).map(str::to_string) else {
            let err = QueueSinkError::Config(format!(
                "record has no string field `{MESSAGE_CONTENT_FIELD}`"
            ));
            let fields: Vec<&str> = record.field_names().collect();
            error!(error = %err, ?fields, "Record skipped");
            if self.config.die_on_error {
                self.abort();
                return Err(err);
            }
            return Ok(());
        };

        self.buffer.push(PendingMessage {
            text,
            time_to_live: self.config.time_to_live(),
            visibility_delay: self.config.visibility_delay(),
            record,
        });

        if self.buffer.is_full() {
            self.flush().await;
        }
        Ok(())
    }

    /// Dispatch remaining messages, release the queue and return the final
    /// counts.
    ///
    /// # Errors
    /// Returns `QueueSinkError::InvalidState` outside an open session.
    #[instrument(skip(self), fields(queue = %self.config.queue_name, session = %self.session_id))]
    pub async fn close(&mut self) -> Result<WriteResult> {
        self.ensure_accepting("close")?;

        self.flush().await;
        self.queue = None;
        self.state = WriterState::Closed;

        let result = self.result();
        info!(
            total = result.total_count,
            settled = result.settled_count(),
            success = result.success_count,
            reject = result.reject_count,
            "Queue writer closed"
        );
        Ok(result)
    }

    /// Records whose message was confirmed sent since the last clean.
    pub fn successful_writes(&self) -> Vec<Record> {
        self.tracker.successful_records()
    }

    /// Rejected records are never reported individually.
    pub fn rejected_writes(&self) -> Vec<Record> {
        Vec::new()
    }

    /// Forget the retained successful records.
    pub fn clean_writes(&self) {
        self.tracker.clear_successful();
    }

    /// Send everything currently buffered.
    async fn flush(&mut self) -> BatchOutcome {
        let batch = self.buffer.take();
        if batch.is_empty() {
            return BatchOutcome::default();
        }

        let client = match self.resolve_queue().await {
            Ok(client) => client,
            Err(err) => return self.dispatcher.reject_all(batch, &self.tracker, &err),
        };

        let outcome = self.dispatcher.dispatch(&client, batch, &self.tracker).await;
        if outcome.rejected > 0 {
            warn!(sent = outcome.sent, rejected = outcome.rejected, "Batch completed with rejects");
        } else {
            debug!(sent = outcome.sent, "Batch completed");
        }
        outcome
    }

    async fn resolve_queue(&mut self) -> Result<Arc<dyn QueueClient>> {
        if let Some(client) = &self.queue {
            return Ok(Arc::clone(client));
        }

        let client = self.provider.queue_client(&self.config.queue_name).await?;
        info!(queue = %self.config.queue_name, "Queue resolved after degraded open");
        self.queue = Some(Arc::clone(&client));
        self.state = WriterState::Open;
        Ok(client)
    }

    fn abort(&mut self) {
        let dropped = self.buffer.clear();
        if dropped > 0 {
            warn!(dropped, "Discarding buffered messages after fatal error");
        }
        self.queue = None;
        self.state = WriterState::Aborted;
    }

    fn ensure_accepting(&self, operation: &str) -> Result<()> {
        if self.state.accepts_writes() {
            Ok(())
        } else {
            Err(QueueSinkError::InvalidState(format!("cannot {operation} a {} writer", self.state)))
        }
    }
}

impl Drop for QueueWriter {
    fn drop(&mut self) {
        if self.state.accepts_writes() && !self.buffer.is_empty() {
            warn!(pending = self.buffer.len(), "QueueWriter dropped with undispatched messages");
        }
    }
}
