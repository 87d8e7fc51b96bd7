//! Integration tests for QueueWriter
//!
//! **Coverage:**
//! - Accounting: total == success + reject after close, success set size
//! - Threshold dispatch and the batch barrier
//! - Partial failure: rejected texts excluded from the success set
//! - Missing content with and without die-on-error
//! - Degraded open, late resolution and fatal open
//! - Per-message timeout counted as a reject
//! - Cancelled dispatch records nothing afterwards

#![allow(dead_code)]

#[path = "support.rs"]
mod support;

use std::time::Duration;

use queuesink_core::testing::InMemoryQueueClient;
use queuesink_domain::{QueueSinkError, Record, WriteResult, WriterState};
use support::{content_record, contents, init_tracing, record_without_content, writer_config, Harness};
use tokio_test::{assert_err, assert_ok};

// ============================================================================
// Accounting
// ============================================================================

#[tokio::test]
async fn n_valid_writes_are_fully_accounted() {
    init_tracing();
    let mut h = Harness::new(writer_config("orders", 7, false), InMemoryQueueClient::new("orders"));

    let session = uuid::Uuid::now_v7().to_string();
    assert_ok!(h.writer.open(&session).await);
    for i in 0..25 {
        assert_ok!(h.writer.write(content_record(&format!("m{i}"))).await);
    }
    let result = assert_ok!(h.writer.close().await);

    assert_eq!(result.id, session);
    assert_eq!(result.total_count, 25);
    assert_eq!(result.success_count + result.reject_count, 25);
    assert_eq!(result.reject_count, 0);
    assert_eq!(h.writer.successful_writes().len() as u64, result.success_count);
    assert_eq!(h.client.sent_count(), 25);
}

#[tokio::test]
async fn orders_scenario_keeps_successes_across_rejected_batch() {
    init_tracing();
    let mut h = Harness::new(
        writer_config("orders", 2, false),
        InMemoryQueueClient::new("orders").failing_on("C"),
    );

    assert_ok!(h.writer.open("orders-job").await);
    assert_ok!(h.writer.write(content_record("A")).await);
    assert_ok!(h.writer.write(content_record("B")).await);

    assert_eq!(
        h.writer.result(),
        WriteResult {
            id: "orders-job".into(),
            total_count: 2,
            success_count: 2,
            reject_count: 0
        }
    );
    assert_eq!(contents(&h.writer.successful_writes()), vec!["A", "B"]);

    assert_ok!(h.writer.write(content_record("C")).await);
    let result = assert_ok!(h.writer.close().await);

    assert_eq!(result.total_count, 3);
    assert_eq!(result.success_count, 2);
    assert_eq!(result.reject_count, 1);
    assert_eq!(contents(&h.writer.successful_writes()), vec!["A", "B"]);
}

#[tokio::test]
async fn partial_failure_rejects_exactly_the_failing_messages() {
    init_tracing();
    let client = InMemoryQueueClient::new("orders").failing_on("bad-1").failing_on("bad-2");
    let mut h = Harness::new(writer_config("orders", 1000, false), client);

    assert_ok!(h.writer.open("partial").await);
    for text in ["ok-1", "bad-1", "ok-2", "bad-2", "ok-3"] {
        assert_ok!(h.writer.write(content_record(text)).await);
    }
    let result = assert_ok!(h.writer.close().await);

    assert_eq!(result.reject_count, 2);
    assert_eq!(result.success_count, 3);
    assert_eq!(contents(&h.writer.successful_writes()), vec!["ok-1", "ok-2", "ok-3"]);
    assert_eq!(h.client.sent_texts(), vec!["ok-1", "ok-2", "ok-3"]);
}

#[tokio::test]
async fn successful_records_are_the_original_inputs() {
    let mut h = Harness::new(writer_config("orders", 10, false), InMemoryQueueClient::new("orders"));

    let input = content_record("payload").with_field("priority", 3);
    assert_ok!(h.writer.open("identity").await);
    assert_ok!(h.writer.write(input.clone()).await);
    assert_ok!(h.writer.close().await);

    assert_eq!(h.writer.successful_writes(), vec![input]);
    assert!(h.writer.rejected_writes().is_empty());
}

#[tokio::test]
async fn records_decoded_from_json_lines() {
    let lines = [
        r#"{"MessageContent": "first", "seq": 1}"#,
        r#"{}"#,
        r#"{"seq": 3}"#,
        r#"{"MessageContent": "fourth", "seq": 4}"#,
    ];
    let mut h = Harness::new(writer_config("orders", 10, false), InMemoryQueueClient::new("orders"));

    assert_ok!(h.writer.open("json-lines").await);
    for line in lines {
        let record: Record = serde_json::from_str(line).expect("line should parse");
        assert_ok!(h.writer.write(record).await);
    }
    let result = assert_ok!(h.writer.close().await);

    // the empty object is ignored, the record without content is skipped
    assert_eq!(result.total_count, 3);
    assert_eq!(result.success_count, 2);
    assert_eq!(h.client.sent_texts(), vec!["first", "fourth"]);
}

#[tokio::test]
async fn clean_writes_twice_leaves_empty_set() {
    let mut h = Harness::new(writer_config("orders", 1, false), InMemoryQueueClient::new("orders"));

    assert_ok!(h.writer.open("clean").await);
    assert_ok!(h.writer.write(content_record("a")).await);
    assert_eq!(h.writer.successful_writes().len(), 1);

    h.writer.clean_writes();
    assert!(h.writer.successful_writes().is_empty());
    h.writer.clean_writes();
    assert!(h.writer.successful_writes().is_empty());

    let result = assert_ok!(h.writer.close().await);
    assert_eq!(result.success_count, 1);
}

// ============================================================================
// Threshold
// ============================================================================

#[tokio::test]
async fn buffer_never_exceeds_threshold() {
    let mut h = Harness::new(writer_config("orders", 3, false), InMemoryQueueClient::new("orders"));

    assert_ok!(h.writer.open("threshold").await);
    for i in 0..10 {
        assert_ok!(h.writer.write(content_record(&format!("m{i}"))).await);
        assert!(h.writer.pending() < 3, "pending {} after write {i}", h.writer.pending());
    }

    assert_eq!(h.client.sent_count(), 9);
    assert_eq!(h.writer.pending(), 1);
    assert_ok!(h.writer.close().await);
    assert_eq!(h.client.sent_count(), 10);
}

#[tokio::test]
async fn dispatch_waits_for_slow_sends() {
    let client = InMemoryQueueClient::new("orders").with_latency(Duration::from_millis(20));
    let mut h = Harness::new(writer_config("orders", 4, false), client);

    assert_ok!(h.writer.open("barrier").await);
    for i in 0..4 {
        assert_ok!(h.writer.write(content_record(&format!("m{i}"))).await);
    }

    assert_eq!(h.client.sent_count(), 4);
    assert_eq!(h.writer.result().success_count, 4);
}

// ============================================================================
// Missing content
// ============================================================================

#[tokio::test]
async fn missing_content_is_skipped_without_die_on_error() {
    init_tracing();
    let mut h = Harness::new(writer_config("orders", 10, false), InMemoryQueueClient::new("orders"));

    assert_ok!(h.writer.open("skip").await);
    assert_ok!(h.writer.write(content_record("a")).await);
    assert_ok!(h.writer.write(record_without_content("no-content")).await);
    let result = assert_ok!(h.writer.close().await);

    assert_eq!(result.total_count, 2);
    assert_eq!(result.success_count, 1);
    assert_eq!(result.reject_count, 0);
    assert_eq!(contents(&h.writer.successful_writes()), vec!["a"]);
    assert_eq!(h.client.attempt_count(), 1);
}

#[tokio::test]
async fn missing_content_aborts_with_die_on_error() {
    init_tracing();
    let mut h = Harness::new(writer_config("orders", 10, true), InMemoryQueueClient::new("orders"));

    assert_ok!(h.writer.open("abort").await);
    assert_ok!(h.writer.write(content_record("buffered")).await);

    let err = assert_err!(h.writer.write(record_without_content("x")).await);
    assert!(matches!(err, QueueSinkError::Config(_)));
    assert_eq!(h.writer.state(), WriterState::Aborted);

    let err = assert_err!(h.writer.write(content_record("after")).await);
    assert!(matches!(err, QueueSinkError::InvalidState(_)));
    assert_err!(h.writer.close().await);
    assert_eq!(h.client.attempt_count(), 0);
}

// ============================================================================
// Queue resolution
// ============================================================================

#[tokio::test]
async fn failed_open_with_die_on_error_is_fatal() {
    init_tracing();
    let mut h = Harness::with_provider(
        writer_config("orders", 10, true),
        InMemoryQueueClient::new("orders"),
        |provider| provider.failing_first(1),
    );

    let err = assert_err!(h.writer.open("fatal").await);
    assert!(matches!(err, QueueSinkError::Connection(_)));
    assert_eq!(h.writer.state(), WriterState::Aborted);
}

#[tokio::test]
async fn degraded_writer_counts_unresolvable_batches_as_rejects() {
    init_tracing();
    let mut h =
        Harness::new(writer_config("missing-queue", 2, false), InMemoryQueueClient::new("orders"));

    assert_ok!(h.writer.open("degraded").await);
    assert_eq!(h.writer.state(), WriterState::Degraded);

    for text in ["a", "b", "c"] {
        assert_ok!(h.writer.write(content_record(text)).await);
    }
    let result = assert_ok!(h.writer.close().await);

    assert_eq!(result.total_count, 3);
    assert_eq!(result.success_count, 0);
    assert_eq!(result.reject_count, 3);
    assert!(h.writer.successful_writes().is_empty());
    // open + one retry per batch
    assert_eq!(h.provider.resolution_count(), 3);
}

#[tokio::test]
async fn degraded_writer_recovers_on_late_resolution() {
    init_tracing();
    let mut h = Harness::with_provider(
        writer_config("orders", 2, false),
        InMemoryQueueClient::new("orders"),
        |provider| provider.failing_first(1),
    );

    assert_ok!(h.writer.open("late").await);
    assert_eq!(h.writer.state(), WriterState::Degraded);

    assert_ok!(h.writer.write(content_record("a")).await);
    assert_ok!(h.writer.write(content_record("b")).await);
    assert_eq!(h.writer.state(), WriterState::Open);

    let result = assert_ok!(h.writer.close().await);
    assert_eq!(result.success_count, 2);
    assert_eq!(result.reject_count, 0);
}

// ============================================================================
// Timeouts
// ============================================================================

#[tokio::test(start_paused = true)]
async fn stalled_send_times_out_as_reject() {
    init_tracing();
    let client = InMemoryQueueClient::new("orders").stalling_on("stuck");
    let mut h = Harness::new(writer_config("orders", 10, false), client);

    assert_ok!(h.writer.open("timeout").await);
    assert_ok!(h.writer.write(content_record("stuck")).await);
    assert_ok!(h.writer.write(content_record("fine")).await);
    let result = assert_ok!(h.writer.close().await);

    assert_eq!(result.success_count, 1);
    assert_eq!(result.reject_count, 1);
    assert_eq!(contents(&h.writer.successful_writes()), vec!["fine"]);
}

#[tokio::test(start_paused = true)]
async fn cancelled_write_leaves_no_late_outcomes() {
    init_tracing();
    let client = InMemoryQueueClient::new("orders").with_latency(Duration::from_millis(50));
    let mut h = Harness::new(writer_config("orders", 2, false), client);

    assert_ok!(h.writer.open("cancelled").await);
    assert_ok!(h.writer.write(content_record("a")).await);
    let cut_short =
        tokio::time::timeout(Duration::from_millis(10), h.writer.write(content_record("b"))).await;
    assert!(cut_short.is_err());

    tokio::time::sleep(Duration::from_millis(200)).await;
    assert_eq!(h.client.sent_count(), 0);
    assert_eq!(
        h.writer.result(),
        WriteResult { id: "cancelled".into(), total_count: 2, success_count: 0, reject_count: 0 }
    );
    assert!(h.writer.successful_writes().is_empty());
}

// ============================================================================
// Fan-out under load
// ============================================================================

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn full_batches_lose_no_updates_under_fan_out() {
    let mut client = InMemoryQueueClient::new("orders");
    for i in (0..2_500).filter(|i| i % 7 == 0) {
        client = client.failing_on(format!("m{i}"));
    }
    let mut h = Harness::new(writer_config("orders", 1000, false), client);

    assert_ok!(h.writer.open("load").await);
    for i in 0..2_500 {
        assert_ok!(h.writer.write(content_record(&format!("m{i}"))).await);
    }
    let result = assert_ok!(h.writer.close().await);

    let expected_rejects = (0..2_500).filter(|i| i % 7 == 0).count() as u64;
    assert_eq!(result.total_count, 2_500);
    assert_eq!(result.reject_count, expected_rejects);
    assert_eq!(result.success_count, 2_500 - expected_rejects);
    assert_eq!(h.writer.successful_writes().len() as u64, result.success_count);
    assert_eq!(h.client.sent_count() as u64, result.success_count);
}
