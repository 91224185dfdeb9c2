//! Integration tests for the capture stack, hook veto and dispatch path.
//!
//! These tests drive the public `Logger` surface the way application code
//! and test suites do: silencing expected errors, asserting on what would
//! have been logged, and vetoing records through the `debug:log` hook.

use std::io;
use std::sync::Arc;

use logging::{
    CapturedCall, Context, Dispatcher, HookDispatcher, HookParams, HookRegistry, Level, LogRecord,
    Logger, MemorySink, Sink,
};
use serde_json::json;

fn logger_with_sink(threshold: Level) -> (Logger, MemorySink) {
    let sink = MemorySink::new();
    let mut dispatcher = Dispatcher::new(Logger::CHANNEL);
    dispatcher.add_sink(sink.clone());
    let logger = Logger::new(dispatcher);
    logger.set_level(threshold);
    (logger, sink)
}

/// Hook dispatcher that vetoes every record containing a keyword.
struct KeywordFilter(&'static str);

impl HookDispatcher for KeywordFilter {
    fn trigger(&self, _domain: &str, _event: &str, params: &HookParams<'_>, default: bool) -> bool {
        let contains = params
            .msg
            .as_str()
            .is_some_and(|message| message.contains(self.0));
        default && !contains
    }
}

// ============================================================================
// Threshold Scenario Tests
// ============================================================================

/// Verifies the warning-threshold scenario end to end.
#[test]
fn warning_threshold_scenario() {
    let (logger, sink) = logger_with_sink(Level::Warning);

    assert!(logger.warning("disk low"));
    let records = sink.drain();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].level(), Level::Warning);
    assert_eq!(records[0].message_text(), "disk low");

    assert!(!logger.info("cache hit"));
    assert!(sink.is_empty());
}

/// Verifies `log` accepts legacy and numeric levels directly.
#[test]
fn log_accepts_any_level_representation() {
    let (logger, sink) = logger_with_sink(Level::Debug);
    assert!(logger.log("ERROR", "legacy", Context::new()));
    assert!(logger.log(550, "numeric", Context::new()));
    assert!(logger.log("notice", "canonical", Context::new()));
    assert!(!logger.log("shout", "unknown", Context::new()));

    let levels: Vec<Level> = sink.records().iter().map(LogRecord::level).collect();
    assert_eq!(levels, vec![Level::Error, Level::Alert, Level::Notice]);
}

// ============================================================================
// Capture Tests
// ============================================================================

/// Verifies a captured call is returned by `enable` and never dispatched.
#[test]
fn captured_call_is_returned_not_dispatched() {
    let (logger, sink) = logger_with_sink(Level::Notice);
    logger.disable();
    assert!(logger.error("x"));
    let frame = logger.enable();

    assert_eq!(
        frame,
        vec![CapturedCall {
            message: json!("x"),
            level: Level::Error
        }]
    );
    assert!(sink.is_empty());
}

/// Verifies nested frames must each be enabled before dispatch resumes.
#[test]
fn nested_frames_require_matching_enables() {
    let (logger, sink) = logger_with_sink(Level::Notice);
    logger.disable();
    logger.disable();
    logger.warning("inner");
    let inner = logger.enable();
    assert_eq!(inner.len(), 1);

    assert!(logger.warning("still captured"));
    assert!(sink.is_empty());

    let outer = logger.enable();
    assert_eq!(outer.len(), 1);
    assert_eq!(outer[0].message, "still captured");

    assert!(logger.warning("live"));
    assert_eq!(sink.records().len(), 1);
}

/// Verifies an unmatched `enable` is harmless.
#[test]
fn unmatched_enable_returns_empty_frame() {
    let (logger, sink) = logger_with_sink(Level::Notice);
    assert!(logger.enable().is_empty());
    assert!(logger.error("after"));
    assert_eq!(sink.records().len(), 1);
}

/// Verifies dumps are captured with their structured payload.
#[test]
fn dump_is_captured_at_error() {
    let (logger, _) = logger_with_sink(Level::Off);
    let (_, frame) = logger.capture(|| logger.dump(&json!({"rows": 2})));
    assert_eq!(frame[0].level, Level::Error);
    assert_eq!(frame[0].message, json!({"rows": 2}));
}

// ============================================================================
// Hook Tests
// ============================================================================

/// Verifies a vetoing dispatcher suppresses emission.
#[test]
fn hook_veto_returns_false_without_output() {
    let (logger, sink) = logger_with_sink(Level::Debug);
    logger.set_hooks(Arc::new(KeywordFilter("secret")));

    assert!(!logger.error("the secret is out"));
    assert!(sink.is_empty());

    assert!(logger.error("nothing to hide"));
    assert_eq!(sink.records().len(), 1);
}

/// Verifies registry handlers see the record before it is emitted.
#[test]
fn registry_hook_allows_emission() {
    let (logger, sink) = logger_with_sink(Level::Debug);
    let mut hooks = HookRegistry::new();
    hooks.register("debug", "log", |params, value| {
        value && params.context.contains_key("request")
    });
    logger.set_hooks(Arc::new(hooks));

    let mut context = Context::new();
    context.insert("request".to_owned(), json!("/activity"));
    assert!(logger.info_with("page served", context));
    assert!(!logger.info("no request"));
    assert_eq!(sink.records().len(), 1);
}

// ============================================================================
// Dispatch Tests
// ============================================================================

/// Sink that always fails to write.
struct BrokenPipe;

impl Sink for BrokenPipe {
    fn handle(&mut self, _record: &LogRecord) -> io::Result<()> {
        Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
    }
}

/// Verifies sink failures surface as `false`, never as panics.
#[test]
fn sink_failure_reports_false() {
    let mut dispatcher = Dispatcher::new(Logger::CHANNEL);
    dispatcher.add_sink(BrokenPipe);
    let logger = Logger::new(dispatcher);
    assert!(!logger.emergency("cannot write"));
}

/// Verifies a shared logger keeps one threshold across clones of the handle.
#[test]
fn shared_logger_keeps_single_state() {
    let (logger, sink) = logger_with_sink(Level::Error);
    let logger = Arc::new(logger);
    let other = Arc::clone(&logger);

    other.set_level(Level::Debug);
    assert!(logger.debug("visible"));

    std::thread::spawn(move || other.critical("from another thread"))
        .join()
        .expect("thread completes");
    assert_eq!(sink.records().len(), 2);
}
