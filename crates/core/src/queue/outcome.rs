//! Send outcome tracking shared by dispatch tasks
//!
//! ## Design
//! - **Atomic counters** for total/success/reject; dispatch tasks increment
//!   them concurrently without a lock
//! - **Poison-safe locking** for the successful record list (no .expect())
//! - Success is recorded as "push record, then bump counter" under the list
//!   lock so a snapshot never sees one without the other

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard};

use queuesink_domain::{Record, WriteResult};

/// Aggregate counters plus the records whose send was confirmed.
#[derive(Debug, Default)]
pub struct OutcomeTracker {
    total: AtomicU64,
    success: AtomicU64,
    reject: AtomicU64,
    successful: Mutex<Vec<Record>>,
}

impl OutcomeTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count a record accepted by `write`.
    pub fn record_received(&self) {
        self.total.fetch_add(1, Ordering::SeqCst);
    }

    /// Count a confirmed send and retain its source record.
    pub fn record_success(&self, record: Record) {
        let mut successful = self.lock_successful();
        successful.push(record);
        self.success.fetch_add(1, Ordering::SeqCst);
    }

    /// Count a failed send. The record is dropped.
    pub fn record_reject(&self) {
        self.reject.fetch_add(1, Ordering::SeqCst);
    }

    pub fn total_count(&self) -> u64 {
        self.total.load(Ordering::SeqCst)
    }

    pub fn success_count(&self) -> u64 {
        self.success.load(Ordering::SeqCst)
    }

    pub fn reject_count(&self) -> u64 {
        self.reject.load(Ordering::SeqCst)
    }

    /// Counter snapshot labelled with the session id.
    pub fn snapshot(&self, id: &str) -> WriteResult {
        WriteResult {
            id: id.to_string(),
            total_count: self.total_count(),
            success_count: self.success_count(),
            reject_count: self.reject_count(),
        }
    }

    /// Copy of the records confirmed sent since the last clean.
    pub fn successful_records(&self) -> Vec<Record> {
        self.lock_successful().clone()
    }

    /// Forget retained successful records. Counters are untouched.
    pub fn clear_successful(&self) {
        self.lock_successful().clear();
    }

    /// Reset counters and retained records for a new session.
    pub fn reset(&self) {
        let mut successful = self.lock_successful();
        successful.clear();
        self.total.store(0, Ordering::SeqCst);
        self.success.store(0, Ordering::SeqCst);
        self.reject.store(0, Ordering::SeqCst);
    }

    fn lock_successful(&self) -> MutexGuard<'_, Vec<Record>> {
        match self.successful.lock() {
            Ok(guard) => guard,
            Err(poison_err) => {
                tracing::warn!(
                    tracker = "OutcomeTracker::successful",
                    "Mutex poisoned, recovering successful records"
                );
                poison_err.into_inner()
            }
        }
    }
}
