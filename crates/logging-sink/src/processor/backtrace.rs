use std::backtrace::Backtrace;

use logging::{Level, LogRecord};
use serde_json::Value;

use super::Processor;

/// Crates whose frames sit between the caller and the capture.
const LOGGING_CRATES: [&str; 2] = ["logging::", "logging_sink::"];

/// Runtime crates that show up around the capture itself.
const RUNTIME_CRATES: [&str; 3] = ["std::", "core::", "alloc::"];

/// Attaches a captured stack trace as `extra.backtrace` to records at or
/// above a minimum level.
///
/// The trace is stored as one `"symbol at file:line:column"` entry per frame,
/// starting at the code that called the logger. Frames from the standard
/// library and the logging crates above the caller are dropped.
#[derive(Clone, Copy, Debug)]
pub struct BacktraceProcessor {
    min_level: Level,
}

impl BacktraceProcessor {
    /// Creates a processor that fires for `min_level` and above.
    pub const fn new(min_level: Level) -> Self {
        Self { min_level }
    }

    /// Lowest level that receives a backtrace.
    pub const fn min_level(&self) -> Level {
        self.min_level
    }

    fn applies_to(self, level: Level) -> bool {
        !level.is_off() && level >= self.min_level
    }
}

impl Default for BacktraceProcessor {
    fn default() -> Self {
        Self::new(Level::Warning)
    }
}

impl Processor for BacktraceProcessor {
    fn process(&self, record: LogRecord) -> LogRecord {
        if !self.applies_to(record.level()) {
            return record;
        }
        let rendered = Backtrace::force_capture().to_string();
        let frames: Vec<Value> = caller_frames(parse_frames(&rendered))
            .into_iter()
            .map(Value::String)
            .collect();
        record.with_extra("backtrace", frames)
    }
}

/// Folds a rendered backtrace into one entry per symbol.
///
/// Symbol lines look like `"  3: crate::func"` (inlined symbols carry no
/// index) and may be followed by an `"at file:line:col"` line.
fn parse_frames(rendered: &str) -> Vec<String> {
    let mut frames: Vec<String> = Vec::new();
    for line in rendered.lines().map(str::trim) {
        if line.is_empty() {
            continue;
        }
        if let Some(location) = line.strip_prefix("at ") {
            if let Some(last) = frames.last_mut() {
                last.push_str(" at ");
                last.push_str(location);
            }
            continue;
        }
        let symbol = match line.split_once(": ") {
            Some((index, symbol)) if index.bytes().all(|b| b.is_ascii_digit()) => symbol,
            _ => line,
        };
        frames.push(symbol.to_owned());
    }
    frames
}

/// Drops the leading frames that sit between the caller and the capture.
///
/// A trace made entirely of internal frames is kept whole.
fn caller_frames(mut frames: Vec<String>) -> Vec<String> {
    match frames.iter().position(|frame| !is_internal(frame)) {
        Some(start) => frames.split_off(start),
        None => frames,
    }
}

fn is_internal(frame: &str) -> bool {
    let symbol = frame.trim_start_matches(['<', '&']);
    let symbol = symbol.strip_prefix("mut ").unwrap_or(symbol);
    let symbol = symbol.strip_prefix("dyn ").unwrap_or(symbol);
    LOGGING_CRATES
        .iter()
        .chain(&RUNTIME_CRATES)
        .any(|prefix| symbol.starts_with(prefix))
}

#[cfg(test)]
mod tests {
    use super::*;
    use logging::Context;
    use std::sync::Arc;

    const SAMPLE: &str = "   0: std::backtrace::Backtrace::force_capture
             at /rustc/lib/std/src/backtrace.rs:312:9
   1: <logging_sink::processor::backtrace::BacktraceProcessor as logging_sink::processor::Processor>::process
             at ./src/processor/backtrace.rs:50:24
   2: logging::logger::Logger::error
             at ./src/logger.rs:230:9
   3: app::jobs::run
             at ./src/jobs.rs:12:5
      core::ops::function::FnOnce::call_once
   4: main
";

    fn record(level: Level) -> LogRecord {
        LogRecord::new(Arc::from("T"), level, Value::from("x"), Context::new())
    }

    #[test]
    fn below_threshold_is_untouched() {
        let processor = BacktraceProcessor::new(Level::Error);
        let record = processor.process(record(Level::Warning));
        assert!(!record.extra().contains_key("backtrace"));
    }

    #[test]
    fn at_threshold_gets_frames() {
        let processor = BacktraceProcessor::new(Level::Error);
        let record = processor.process(record(Level::Critical));
        let frames = record
            .extra()
            .get("backtrace")
            .and_then(Value::as_array)
            .expect("backtrace array");
        assert!(!frames.is_empty());
        assert!(frames.iter().all(Value::is_string));
        assert!(
            frames
                .iter()
                .filter_map(Value::as_str)
                .all(|frame| !frame.starts_with("at "))
        );
    }

    #[test]
    fn default_threshold_is_warning() {
        assert_eq!(BacktraceProcessor::default().min_level(), Level::Warning);
    }

    #[test]
    fn locations_join_their_symbol() {
        let frames = parse_frames(SAMPLE);
        assert_eq!(frames.len(), 6);
        assert_eq!(frames[3], "app::jobs::run at ./src/jobs.rs:12:5");
        assert_eq!(frames[4], "core::ops::function::FnOnce::call_once");
        assert_eq!(frames[5], "main");
    }

    #[test]
    fn leading_logging_frames_are_skipped() {
        let frames = caller_frames(parse_frames(SAMPLE));
        assert_eq!(frames[0], "app::jobs::run at ./src/jobs.rs:12:5");
        assert_eq!(frames.len(), 3);
    }

    #[test]
    fn all_internal_trace_is_kept() {
        let frames = vec!["std::rt::lang_start".to_owned(), "core::ops::call".to_owned()];
        assert_eq!(caller_frames(frames.clone()), frames);
    }
}
