use logging::{Context, LogRecord};
use serde_json::Value;

use super::Processor;

/// Substitutes `{key}` placeholders in string messages with context values.
///
/// Placeholders without a matching context key are left untouched, and
/// substituted text is never scanned again. Strings are inserted verbatim,
/// other scalars in their JSON spelling, and arrays or objects as compact
/// JSON.
///
/// This differs from PSR-3 interpolation as done by Monolog's
/// `PsrLogMessageProcessor`: there `null` becomes empty text and booleans
/// become `1` or empty text, while here they read `null`, `true` and `false`.
#[derive(Clone, Copy, Debug, Default)]
pub struct InterpolationProcessor;

impl InterpolationProcessor {
    /// Interpolates `message` against `context`.
    pub fn interpolate(message: &str, context: &Context) -> String {
        let mut output = String::with_capacity(message.len());
        let mut rest = message;

        while let Some(open) = rest.find('{') {
            output.push_str(&rest[..open]);
            let after_open = &rest[open + 1..];
            let Some(close) = after_open.find(['{', '}']) else {
                output.push_str(&rest[open..]);
                return output;
            };

            if after_open.as_bytes()[close] == b'{' {
                output.push('{');
                rest = after_open;
                continue;
            }

            let key = &after_open[..close];
            match context.get(key) {
                Some(value) => output.push_str(&replacement(value)),
                None => output.push_str(&rest[open..=open + 1 + close]),
            }
            rest = &after_open[close + 1..];
        }

        output.push_str(rest);
        output
    }
}

fn replacement(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

impl Processor for InterpolationProcessor {
    fn process(&self, record: LogRecord) -> LogRecord {
        let interpolated = match record.message() {
            Value::String(message) if message.contains('{') && !record.context().is_empty() => {
                Self::interpolate(message, record.context())
            }
            _ => return record,
        };
        record.with_message(interpolated)
    }
}
