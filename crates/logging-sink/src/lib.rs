#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! crates/logging-sink/src/lib.rs
//!
//! # Overview
//!
//! `logging-sink` provides the concrete output side of the Elgg logger: the
//! handlers a [`logging::Dispatcher`] fans records out to, the formatters that
//! render them, and the processors that enrich them first.
//!
//! # Design
//!
//! Every handler owns a [`Pipeline`]: an ordered list of [`Processor`]s, a
//! [`Formatter`] and a minimum level. [`StreamHandler`] writes the rendered
//! text to any [`std::io::Write`] implementor and honours a [`LineMode`].
//! Two presets exist:
//!
//! - [`console_pipeline`] for processes attached to a terminal, gated by a
//!   [`ConsoleVerbosity`].
//! - [`error_log_pipeline`] for the error log, written through an
//!   [`ErrorLogHandler`] to stderr, a file or syslog.
//!
//! # Invariants
//!
//! - Processors never mutate the dispatched record; the pipeline works on a
//!   copy so sibling handlers see the original.
//! - Formatters never append a line terminator; the handler's [`LineMode`]
//!   decides.
//!
//! # Examples
//!
//! ```
//! use logging::{Dispatcher, Logger};
//! use logging_sink::{ConsoleVerbosity, StreamHandler, console_pipeline};
//!
//! let mut dispatcher = Dispatcher::new("ELGG");
//! dispatcher.add_sink(StreamHandler::new(
//!     Vec::new(),
//!     console_pipeline(ConsoleVerbosity::Debug, false),
//! ));
//! let logger = Logger::new(dispatcher);
//! logger.set_level("info");
//! assert!(logger.info("cron finished"));
//! ```

pub mod format;
pub mod handler;
mod line_mode;
pub mod processor;
#[cfg(unix)]
pub mod syslog;

pub use format::{ConsoleFormatter, FormatOptions, Formatter, LineFormatter};
pub use handler::{
    ConsoleVerbosity, ErrorLogHandler, ErrorLogTarget, ParseTargetError, ParseVerbosityError,
    Pipeline, StreamHandler, console_pipeline, error_log_pipeline,
};
pub use line_mode::LineMode;
pub use processor::{
    BacktraceProcessor, InterpolationProcessor, MemoryPeakUsageProcessor, MemoryUsageProcessor,
    ProcessIdProcessor, Processor, RequestInfo, WebProcessor,
};
