//! crates/logging/src/record.rs
//! Finished log records handed to sinks.

use std::borrow::Cow;
use std::sync::Arc;

use chrono::{DateTime, Local};
use serde_json::{Map, Value};

use crate::levels::Level;

/// Contextual key/value data attached to a log call.
pub type Context = Map<String, Value>;

/// A log record as it travels from the logger to its sinks.
///
/// Records are built once by the logger and never mutated afterwards.
/// Processors that enrich a record consume it and return a new one through
/// [`with_extra`](Self::with_extra) or [`with_message`](Self::with_message).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LogRecord {
    channel: Arc<str>,
    level: Level,
    message: Value,
    context: Context,
    extra: Context,
    datetime: DateTime<Local>,
}

impl LogRecord {
    /// Creates a record stamped with the current local time.
    pub fn new(channel: Arc<str>, level: Level, message: Value, context: Context) -> Self {
        Self {
            channel,
            level,
            message,
            context,
            extra: Context::new(),
            datetime: Local::now(),
        }
    }

    /// Replaces the timestamp. Used by formatters' tests and replay tooling.
    pub fn at(mut self, datetime: DateTime<Local>) -> Self {
        self.datetime = datetime;
        self
    }

    /// Channel the record was logged on.
    pub fn channel(&self) -> &str {
        &self.channel
    }

    /// Severity of the record.
    pub const fn level(&self) -> Level {
        self.level
    }

    /// Raw message payload. Usually a string, but `dump` carries arbitrary data.
    pub const fn message(&self) -> &Value {
        &self.message
    }

    /// Message rendered as text: strings verbatim, other payloads as JSON.
    pub fn message_text(&self) -> Cow<'_, str> {
        match &self.message {
            Value::String(text) => Cow::Borrowed(text),
            other => Cow::Owned(other.to_string()),
        }
    }

    /// Caller supplied context.
    pub const fn context(&self) -> &Context {
        &self.context
    }

    /// Processor supplied metadata.
    pub const fn extra(&self) -> &Context {
        &self.extra
    }

    /// Time the record was created.
    pub const fn datetime(&self) -> DateTime<Local> {
        self.datetime
    }

    /// Returns a copy with `key` set in the extra map.
    pub fn with_extra(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }

    /// Returns a copy carrying a different message.
    pub fn with_message(mut self, message: impl Into<Value>) -> Self {
        self.message = message.into();
        self
    }
}
