//! Shared helpers for writer integration tests.

use std::sync::Arc;

use queuesink_core::testing::{InMemoryConnectionProvider, InMemoryQueueClient};
use queuesink_core::QueueWriter;
use queuesink_domain::constants::MESSAGE_CONTENT_FIELD;
use queuesink_domain::{Record, WriterConfig};

/// Install a test-friendly tracing subscriber once per binary.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("queuesink_core=debug")
        .with_test_writer()
        .try_init();
}

/// Record carrying `text` as its message content plus an id field.
pub fn content_record(text: &str) -> Record {
    Record::new().with_field(MESSAGE_CONTENT_FIELD, text).with_field("id", text)
}

/// Record without message content.
pub fn record_without_content(id: &str) -> Record {
    Record::new().with_field("id", id)
}

pub fn writer_config(queue: &str, threshold: usize, die_on_error: bool) -> WriterConfig {
    WriterConfig {
        batch_threshold: threshold,
        time_to_live_seconds: 60,
        initial_visibility_delay_seconds: 0,
        die_on_error,
        ..WriterConfig::for_queue(queue)
    }
}

/// Writer wired to an in-memory provider that serves `client`.
pub struct Harness {
    pub writer: QueueWriter,
    pub client: Arc<InMemoryQueueClient>,
    pub provider: Arc<InMemoryConnectionProvider>,
}

impl Harness {
    pub fn new(config: WriterConfig, client: InMemoryQueueClient) -> Self {
        Self::with_provider(config, client, |provider| provider)
    }

    pub fn with_provider(
        config: WriterConfig,
        client: InMemoryQueueClient,
        customize: impl FnOnce(InMemoryConnectionProvider) -> InMemoryConnectionProvider,
    ) -> Self {
        let client = Arc::new(client);
        let provider =
            Arc::new(customize(InMemoryConnectionProvider::new().with_queue(Arc::clone(&client))));
        let writer =
            QueueWriter::new(config, provider.clone()).expect("test config should be valid");
        Self { writer, client, provider }
    }
}

/// Message contents of `records`, sorted.
pub fn contents(records: &[Record]) -> Vec<String> {
    let mut texts: Vec<String> = records
        .iter()
        .filter_map(|r| r.get_str(MESSAGE_CONTENT_FIELD).map(str::to_string))
        .collect();
    texts.sort();
    texts
}
