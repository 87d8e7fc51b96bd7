//! Outbound message and aggregate result types

use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::record::Record;

/// A message accepted by the writer and waiting for dispatch.
///
/// Carries the record it was built from so the record can be reported back
/// once the send is confirmed.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingMessage {
    pub text: String,
    pub time_to_live: Duration,
    pub visibility_delay: Duration,
    pub record: Record,
}

/// Aggregate counts for one writer session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WriteResult {
    /// Session identifier passed to `open`
    pub id: String,
    pub total_count: u64,
    pub success_count: u64,
    pub reject_count: u64,
}

impl WriteResult {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into(), ..Self::default() }
    }

    /// Messages that reached a final send outcome.
    pub fn settled_count(&self) -> u64 {
        self.success_count.saturating_add(self.reject_count)
    }
}

/// Summary of a single dispatch round.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchOutcome {
    pub sent: u64,
    pub rejected: u64,
}

impl BatchOutcome {
    pub fn total(&self) -> u64 {
        self.sent.saturating_add(self.rejected)
    }
}

/// Writer lifecycle states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WriterState {
    Unopened,
    Open,
    /// Opened without a queue handle after a non-fatal resolution failure
    Degraded,
    Closed,
    /// Terminated by a fatal error; no further processing
    Aborted,
}

impl WriterState {
    /// States in which `write` is accepted.
    pub fn accepts_writes(self) -> bool {
        matches!(self, Self::Open | Self::Degraded)
    }
}

impl std::fmt::Display for WriterState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::Unopened => "unopened",
            Self::Open => "open",
            Self::Degraded => "degraded",
            Self::Closed => "closed",
            Self::Aborted => "aborted",
        };
        f.write_str(label)
    }
}
