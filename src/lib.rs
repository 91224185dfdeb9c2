#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! `elgg-logger` wires the [`logging`] core to the [`logging_sink`] handlers.
//! It reads [`LoggerConfig`] from serde sources or `ELGG_*` environment
//! variables, resolves the [`ExecutionMode`], and [`factory`] returns a
//! [`Logger`] with exactly one output pipeline:
//!
//! - **console**: interpolation, backtraces from ERROR upwards, and the
//!   console formatter, gated by the configured verbosity;
//! - **web**: interpolation, request metadata, memory usage, process id,
//!   backtraces from WARNING upwards, and the error-log line formatter.
//!
//! # Examples
//!
//! ```
//! use elgg_logger::{ExecutionMode, LoggerConfig, build};
//! use elgg_logger::logging::Level;
//!
//! let config = LoggerConfig {
//!     level: Some("warning".to_owned()),
//!     mode: Some(ExecutionMode::Console),
//!     ..LoggerConfig::default()
//! };
//! let logger = build(&config, Some(Box::new(Vec::new()))).expect("valid config");
//! assert_eq!(logger.level(), Level::Warning);
//! assert!(!logger.info("not shown"));
//! ```
//!
//! # See also
//!
//! - [`logging::Logger`] for the threshold, capture and hook semantics.
//! - [`logging_sink`] for the individual handlers, formatters and processors.

mod config;
mod environment;
mod factory;

pub use config::{
    CHANNEL_ENV, ConfigError, ERROR_LOG_ENV, ERROR_REPORTING_ENV, LEVEL_ENV, LoggerConfig,
    MODE_ENV, VERBOSITY_ENV,
};
pub use environment::{ExecutionMode, Host, stdout_supports_color};
pub use factory::{BuildError, Output, build, factory};

pub use logging;
pub use logging::{Level, Logger};
pub use logging_sink;
pub use logging_sink::{ConsoleVerbosity, ErrorLogTarget};

#[cfg(feature = "tracing")]
pub use logging::{LoggerLayer, init_tracing, init_tracing_with_filter};
