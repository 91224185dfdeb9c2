//! Record processors that enrich a record before it is formatted.

mod backtrace;
mod interpolate;
mod memory;
mod web;

pub use backtrace::BacktraceProcessor;
pub use interpolate::InterpolationProcessor;
pub use memory::{MemoryPeakUsageProcessor, MemoryUsageProcessor, format_bytes};
pub use web::{RequestInfo, WebProcessor};

use logging::LogRecord;

/// Transforms a record on its way to the formatter.
pub trait Processor: Send + Sync {
    /// Returns the enriched record.
    fn process(&self, record: LogRecord) -> LogRecord;
}

/// Adds the current process identifier as `extra.process_id`.
#[derive(Clone, Copy, Debug, Default)]
pub struct ProcessIdProcessor;

impl Processor for ProcessIdProcessor {
    fn process(&self, record: LogRecord) -> LogRecord {
        record.with_extra("process_id", std::process::id())
    }
}
