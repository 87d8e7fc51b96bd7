//! Pending message buffer

use queuesink_domain::PendingMessage;

/// Ordered buffer of messages awaiting dispatch.
///
/// Owned by a single writer; it is not synchronized.
#[derive(Debug)]
pub struct RecordBuffer {
    messages: Vec<PendingMessage>,
    threshold: usize,
}

impl RecordBuffer {
    /// Create a buffer that reports full at `threshold` messages.
    pub fn new(threshold: usize) -> Self {
        Self { messages: Vec::with_capacity(threshold.min(1024)), threshold }
    }

    pub fn push(&mut self, message: PendingMessage) {
        self.messages.push(message);
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// True once the buffered count reached the dispatch threshold.
    pub fn is_full(&self) -> bool {
        self.messages.len() >= self.threshold
    }

    /// Drain every buffered message, leaving the buffer empty.
    pub fn take(&mut self) -> Vec<PendingMessage> {
        std::mem::take(&mut self.messages)
    }

    /// Discard buffered messages, returning how many were dropped.
    pub fn clear(&mut self) -> usize {
        let dropped = self.messages.len();
        self.messages.clear();
        dropped
    }
}
