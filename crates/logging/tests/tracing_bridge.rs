//! Integration tests for the tracing bridge.
//!
//! Events emitted through the standard tracing macros must pass through the
//! logger's threshold, capture stack and hook veto like direct calls.

use std::sync::Arc;

use logging::{Dispatcher, Level, Logger, LoggerLayer, MemorySink};
use serde_json::json;
use tracing_subscriber::layer::SubscriberExt;

fn bridged_logger(threshold: Level) -> (Arc<Logger>, MemorySink) {
    let sink = MemorySink::new();
    let mut dispatcher = Dispatcher::new(Logger::CHANNEL);
    dispatcher.add_sink(sink.clone());
    let logger = Arc::new(Logger::new(dispatcher));
    logger.set_level(threshold);
    (logger, sink)
}

/// Verifies tracing events are forwarded with mapped levels and fields.
#[test]
fn tracing_events_reach_the_logger() {
    let (logger, sink) = bridged_logger(Level::Info);
    let subscriber = tracing_subscriber::registry().with(LoggerLayer::new(Arc::clone(&logger)));

    tracing::subscriber::with_default(subscriber, || {
        tracing::warn!(user = "alice", attempts = 3, "quota exceeded");
        tracing::debug!("below threshold");
    });

    let records = sink.records();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].level(), Level::Warning);
    assert_eq!(records[0].message_text(), "quota exceeded");
    assert_eq!(records[0].context().get("user"), Some(&json!("alice")));
    assert_eq!(records[0].context().get("attempts"), Some(&json!(3)));
    assert!(records[0].context().contains_key("target"));
}

/// Verifies bridged events are captured while logging is disabled.
#[test]
fn tracing_events_are_captured() {
    let (logger, sink) = bridged_logger(Level::Info);
    let subscriber = tracing_subscriber::registry().with(LoggerLayer::new(Arc::clone(&logger)));

    logger.disable();
    tracing::subscriber::with_default(subscriber, || {
        tracing::error!("expected failure");
    });
    let frame = logger.enable();

    assert_eq!(frame.len(), 1);
    assert_eq!(frame[0].level, Level::Error);
    assert_eq!(frame[0].message, "expected failure");
    assert!(sink.is_empty());
}

/// Verifies the logger's own diagnostics are not fed back into it.
#[test]
fn internal_target_is_skipped() {
    let (logger, sink) = bridged_logger(Level::Debug);
    let subscriber = tracing_subscriber::registry().with(LoggerLayer::new(Arc::clone(&logger)));

    tracing::subscriber::with_default(subscriber, || {
        tracing::warn!(target: "elgg::internal", "sink failed");
    });

    assert!(sink.is_empty());
}

/// Verifies targets that merely share the internal prefix are still forwarded.
#[test]
fn similarly_named_targets_are_forwarded() {
    let (logger, sink) = bridged_logger(Level::Debug);
    let subscriber = tracing_subscriber::registry().with(LoggerLayer::new(Arc::clone(&logger)));

    tracing::subscriber::with_default(subscriber, || {
        tracing::warn!(target: "elgg::internal::sink", "nested internal");
        tracing::warn!(target: "elgg::internalize", "user event");
    });

    let records = sink.records();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].message_text(), "user event");
    assert_eq!(
        records[0].context().get("target"),
        Some(&json!("elgg::internalize"))
    );
}
