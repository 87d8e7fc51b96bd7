//! In-memory implementations of the queue ports
//!
//! Provides a queue client that records every accepted message and a
//! connection provider that hands those clients out by name. Failures are
//! scripted: reject specific texts, stall sends, or refuse resolution.

#![allow(clippy::missing_panics_doc)]

use std::collections::{BTreeMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use async_trait::async_trait;
use queuesink_domain::{QueueSinkError, Result};

use crate::queue::{ConnectionProvider, QueueClient};

/// A message accepted by [`InMemoryQueueClient`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentMessage {
    pub text: String,
    pub visibility_delay: Duration,
    pub time_to_live: Duration,
    pub request_timeout: Duration,
}

/// Queue client that stores messages in memory.
#[derive(Debug)]
pub struct InMemoryQueueClient {
    name: String,
    sent: Mutex<Vec<SentMessage>>,
    failing_texts: HashSet<String>,
    stalled_texts: HashSet<String>,
    attempts: AtomicUsize,
    latency: Duration,
}

impl InMemoryQueueClient {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            sent: Mutex::new(Vec::new()),
            failing_texts: HashSet::new(),
            stalled_texts: HashSet::new(),
            attempts: AtomicUsize::new(0),
            latency: Duration::ZERO,
        }
    }

    /// Reject sends whose text equals `text`.
    #[must_use]
    pub fn failing_on(mut self, text: impl Into<String>) -> Self {
        self.failing_texts.insert(text.into());
        self
    }

    /// Never complete sends whose text equals `text`.
    #[must_use]
    pub fn stalling_on(mut self, text: impl Into<String>) -> Self {
        self.stalled_texts.insert(text.into());
        self
    }

    /// Delay every send by `latency`.
    #[must_use]
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Messages accepted so far, in completion order
    pub fn sent_messages(&self) -> Vec<SentMessage> {
        self.lock_sent().clone()
    }

    /// Texts accepted so far, sorted
    pub fn sent_texts(&self) -> Vec<String> {
        let mut texts: Vec<_> = self.lock_sent().iter().map(|m| m.text.clone()).collect();
        texts.sort();
        texts
    }

    pub fn sent_count(&self) -> usize {
        self.lock_sent().len()
    }

    /// Send attempts, successful or not
    pub fn attempt_count(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }

    fn lock_sent(&self) -> MutexGuard<'_, Vec<SentMessage>> {
        match self.sent.lock() {
            Ok(guard) => guard,
            Err(poison_err) => poison_err.into_inner(),
        }
    }
}

#[async_trait]
impl QueueClient for InMemoryQueueClient {
    fn queue_name(&self) -> &str {
        &self.name
    }

    async fn send_message(
        &self,
        text: &str,
        visibility_delay: Duration,
        time_to_live: Duration,
        request_timeout: Duration,
    ) -> Result<()> {
        self.attempts.fetch_add(1, Ordering::SeqCst);

        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        if self.stalled_texts.contains(text) {
            std::future::pending::<()>().await;
        }
        if self.failing_texts.contains(text) {
            return Err(QueueSinkError::Transport(format!(
                "queue `{}` refused message",
                self.name
            )));
        }

        self.lock_sent().push(SentMessage {
            text: text.to_string(),
            visibility_delay,
            time_to_live,
            request_timeout,
        });
        Ok(())
    }
}

/// Connection provider serving [`InMemoryQueueClient`]s by name.
#[derive(Debug, Default)]
pub struct InMemoryConnectionProvider {
    queues: BTreeMap<String, Arc<InMemoryQueueClient>>,
    unreachable: AtomicBool,
    failures_remaining: AtomicUsize,
    resolutions: AtomicUsize,
}

impl InMemoryConnectionProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a queue under its own name.
    #[must_use]
    pub fn with_queue(mut self, client: Arc<InMemoryQueueClient>) -> Self {
        self.queues.insert(client.queue_name().to_string(), client);
        self
    }

    /// Fail the next `count` resolutions, then recover.
    #[must_use]
    pub fn failing_first(self, count: usize) -> Self {
        self.failures_remaining.store(count, Ordering::SeqCst);
        self
    }

    /// Toggle whether the account is reachable at all.
    pub fn set_unreachable(&self, unreachable: bool) {
        self.unreachable.store(unreachable, Ordering::SeqCst);
    }

    /// Number of `queue_client` calls made
    pub fn resolution_count(&self) -> usize {
        self.resolutions.load(Ordering::SeqCst)
    }

    fn check_reachable(&self) -> Result<()> {
        if self.unreachable.load(Ordering::SeqCst) {
            return Err(QueueSinkError::Connection("storage account unreachable".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl ConnectionProvider for InMemoryConnectionProvider {
    async fn queue_client(&self, queue_name: &str) -> Result<Arc<dyn QueueClient>> {
        self.resolutions.fetch_add(1, Ordering::SeqCst);
        self.check_reachable()?;

        let scripted_failure = self
            .failures_remaining
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if scripted_failure {
            return Err(QueueSinkError::Connection(format!(
                "transient failure resolving queue `{queue_name}`"
            )));
        }

        match self.queues.get(queue_name) {
            Some(client) => {
                let client: Arc<dyn QueueClient> = client.clone();
                Ok(client)
            }
            None => Err(QueueSinkError::Connection(format!("queue `{queue_name}` not found"))),
        }
    }

    async fn list_queues(&self) -> Result<Vec<String>> {
        self.check_reachable()?;
        Ok(self.queues.keys().cloned().collect())
    }
}
