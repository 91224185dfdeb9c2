//! Record formatters.

mod console;
mod line;

pub use console::ConsoleFormatter;
pub use line::LineFormatter;

use logging::{Context, LogRecord};
use serde_json::Value;

/// Turns a processed record into a single output entry.
///
/// Formatters never append the line terminator; the handler's
/// [`LineMode`](crate::LineMode) decides that.
pub trait Formatter: Send + Sync {
    /// Formats `record`.
    fn format(&self, record: &LogRecord) -> String;
}

/// Formatting switches shared by every formatter.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct FormatOptions {
    /// Keep line breaks inside messages instead of folding them into spaces.
    pub allow_inline_line_breaks: bool,
    /// Omit the context and extra sections when they are empty.
    pub ignore_empty_context_and_extra: bool,
}

impl FormatOptions {
    /// Options used by both standard pipelines.
    pub const fn standard() -> Self {
        Self {
            allow_inline_line_breaks: true,
            ignore_empty_context_and_extra: true,
        }
    }

    pub(crate) fn text(self, text: &str) -> String {
        if self.allow_inline_line_breaks {
            text.to_owned()
        } else {
            text.replace("\r\n", " ").replace(['\r', '\n'], " ")
        }
    }

    pub(crate) fn value(self, value: &Value) -> String {
        match value {
            Value::String(text) => self.text(text),
            other => other.to_string(),
        }
    }

    /// Renders a context or extra map, or `None` when it should be omitted.
    pub(crate) fn map(self, map: &Context) -> Option<String> {
        if map.is_empty() {
            return (!self.ignore_empty_context_and_extra).then(|| "[]".to_owned());
        }
        let rendered = Value::Object(map.clone()).to_string();
        Some(self.text(&rendered))
    }
}
