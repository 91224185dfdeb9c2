//! crates/logging/src/tracing_bridge.rs
//! Bridge between the tracing crate and the [`Logger`].
//!
//! [`LoggerLayer`] is a tracing-subscriber layer that forwards every tracing
//! event into a [`Logger`], so code written against the standard `tracing`
//! macros passes through the same threshold, capture stack and hook veto as
//! direct logger calls.
//!
//! # Level mapping
//!
//! | tracing | logger    |
//! |---------|-----------|
//! | TRACE   | `debug`   |
//! | DEBUG   | `debug`   |
//! | INFO    | `info`    |
//! | WARN    | `warning` |
//! | ERROR   | `error`   |
//!
//! Events on [`INTERNAL_TARGET`](crate::INTERNAL_TARGET) are skipped so the
//! logger's own diagnostics never loop back into it.
//!
//! # Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use logging::{Dispatcher, Logger, init_tracing};
//!
//! let logger = Arc::new(Logger::new(Dispatcher::new(Logger::CHANNEL)));
//! init_tracing(Arc::clone(&logger));
//!
//! tracing::warn!(user = "alice", "quota exceeded");
//! ```

use std::fmt;
use std::sync::Arc;

use serde_json::Value;
use tracing::Subscriber;
use tracing_subscriber::layer::{Context as LayerContext, Layer};
use tracing_subscriber::registry::LookupSpan;

use crate::levels::Level;
use crate::logger::Logger;
use crate::record::Context;

/// A tracing layer that forwards events into a [`Logger`].
pub struct LoggerLayer {
    logger: Arc<Logger>,
}

impl LoggerLayer {
    /// Creates a layer forwarding into `logger`.
    #[must_use]
    pub const fn new(logger: Arc<Logger>) -> Self {
        Self { logger }
    }

    /// Map a tracing level to a logger level.
    const fn map_level(level: tracing::Level) -> Level {
        match level {
            tracing::Level::ERROR => Level::Error,
            tracing::Level::WARN => Level::Warning,
            tracing::Level::INFO => Level::Info,
            tracing::Level::DEBUG | tracing::Level::TRACE => Level::Debug,
        }
    }

    /// Whether `target` is the logger's own diagnostics channel or a child of it.
    fn is_internal(target: &str) -> bool {
        target
            .strip_prefix(crate::INTERNAL_TARGET)
            .is_some_and(|rest| rest.is_empty() || rest.starts_with("::"))
    }
}

impl fmt::Debug for LoggerLayer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoggerLayer").finish_non_exhaustive()
    }
}

impl<S> Layer<S> for LoggerLayer
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    fn on_event(&self, event: &tracing::Event<'_>, _ctx: LayerContext<'_, S>) {
        let metadata = event.metadata();
        if Self::is_internal(metadata.target()) {
            return;
        }

        let level = Self::map_level(*metadata.level());
        let mut visitor = FieldVisitor::default();
        event.record(&mut visitor);

        let mut context = visitor.fields;
        context.insert("target".to_owned(), Value::from(metadata.target()));
        self.logger
            .log(level, visitor.message.unwrap_or_default(), context);
    }
}

/// Visitor splitting an event into its message and remaining fields.
#[derive(Default)]
struct FieldVisitor {
    message: Option<String>,
    fields: Context,
}

impl FieldVisitor {
    fn insert(&mut self, field: &tracing::field::Field, value: Value) {
        if field.name() == "message" {
            self.message = Some(match value {
                Value::String(text) => text,
                other => other.to_string(),
            });
        } else {
            self.fields.insert(field.name().to_owned(), value);
        }
    }
}

impl tracing::field::Visit for FieldVisitor {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn fmt::Debug) {
        self.insert(field, Value::String(format!("{value:?}")));
    }

    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        self.insert(field, Value::from(value));
    }

    fn record_i64(&mut self, field: &tracing::field::Field, value: i64) {
        self.insert(field, Value::from(value));
    }

    fn record_u64(&mut self, field: &tracing::field::Field, value: u64) {
        self.insert(field, Value::from(value));
    }

    fn record_f64(&mut self, field: &tracing::field::Field, value: f64) {
        self.insert(field, Value::from(value));
    }

    fn record_bool(&mut self, field: &tracing::field::Field, value: bool) {
        self.insert(field, Value::from(value));
    }
}

/// Installs a global subscriber that forwards every tracing event into `logger`.
///
/// Returns an error when a global subscriber is already set.
pub fn init_tracing(logger: Arc<Logger>) -> Result<(), tracing_subscriber::util::TryInitError> {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    tracing_subscriber::registry()
        .with(LoggerLayer::new(logger))
        .try_init()
}

/// Installs a global subscriber combining `filter` with the logger bridge.
///
/// ```rust,ignore
/// use tracing_subscriber::EnvFilter;
///
/// init_tracing_with_filter(logger, EnvFilter::from_default_env())?;
/// ```
pub fn init_tracing_with_filter<F>(
    logger: Arc<Logger>,
    filter: F,
) -> Result<(), tracing_subscriber::util::TryInitError>
where
    F: Layer<tracing_subscriber::Registry> + Send + Sync + 'static,
{
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    tracing_subscriber::registry()
        .with(filter)
        .with(LoggerLayer::new(logger))
        .try_init()
}
