#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! `logging` is the filtering and dispatch core of the Elgg logger. It owns
//! the severity table, the capture stack used to silence and inspect log
//! output during tests, the hook veto, and the multi-sink dispatch primitive
//! that finished records are handed to. Concrete output destinations live in
//! the `logging-sink` crate.
//!
//! # Design
//!
//! [`Logger`] composes the pieces:
//!
//! - [`normalize`] resolves legacy aliases (`"WARNING"`), numeric severities
//!   (`300`) and canonical names (`"warning"`) to a [`Level`]; anything else
//!   becomes [`Level::Off`].
//! - [`CaptureStack`] frames, opened by [`Logger::disable`] and closed by
//!   [`Logger::enable`], swallow every call while open.
//! - A [`HookDispatcher`] may veto loggable calls through the deprecated
//!   `debug:log` hook.
//! - A [`Dispatcher`] fans the resulting [`LogRecord`] out to every [`Sink`].
//!
//! # Invariants
//!
//! - A call is loggable iff the threshold is not `Off` and the call's severity
//!   is at least the threshold's.
//! - While any capture frame is open no call reaches hooks or sinks, and every
//!   call returns `true`.
//! - Nothing in the logging path panics or returns an error to the caller;
//!   failures surface as a `false` return.
//!
//! # Examples
//!
//! ```
//! use logging::{Dispatcher, Level, Logger, MemorySink};
//!
//! let sink = MemorySink::new();
//! let mut dispatcher = Dispatcher::new(Logger::CHANNEL);
//! dispatcher.add_sink(sink.clone());
//! let logger = Logger::new(dispatcher);
//!
//! logger.disable();
//! logger.error("expected failure");
//! let frame = logger.enable();
//!
//! assert_eq!(frame.len(), 1);
//! assert_eq!(frame[0].level, Level::Error);
//! assert!(sink.is_empty());
//! ```

mod capture;
mod dispatch;
mod hooks;
mod host;
mod levels;
mod logger;
mod record;

#[cfg(feature = "tracing")]
mod tracing_bridge;

pub use capture::{CaptureFrame, CaptureStack, CapturedCall};
pub use dispatch::{Dispatcher, MemorySink, Sink};
pub use hooks::{HOOK_DOMAIN, HOOK_EVENT, HookDispatcher, HookParams, HookRegistry, NoHooks};
pub use host::{ErrorReporting, HostEnvironment};
pub use levels::{Level, LevelInput, LevelParseError, normalize};
pub use logger::{CaptureGuard, LevelValue, Logger};
pub use record::{Context, LogRecord};

#[cfg(feature = "tracing")]
pub use tracing_bridge::{LoggerLayer, init_tracing, init_tracing_with_filter};

/// Tracing target of the logger's own diagnostics.
pub const INTERNAL_TARGET: &str = "elgg::internal";
