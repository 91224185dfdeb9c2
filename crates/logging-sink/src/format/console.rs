use logging::{Level, LogRecord};

use super::{FormatOptions, Formatter};

const RESET: &str = "\x1b[0m";
const CHANNEL_STYLE: &str = "\x1b[33m";

/// ANSI style for each level's label.
const fn level_style(level: Level) -> &'static str {
    match level {
        Level::Off | Level::Debug => "\x1b[37m",
        Level::Info => "\x1b[32m",
        Level::Notice => "\x1b[34m",
        Level::Warning => "\x1b[36m",
        Level::Error => "\x1b[33m",
        Level::Critical | Level::Alert => "\x1b[31m",
        Level::Emergency => "\x1b[37;41m",
    }
}

/// Formatter for records shown on an attached console.
///
/// Output shape: `12:00:00 WARNING   [ELGG] message {"context"} {"extra"}`,
/// optionally colored with ANSI escapes.
#[derive(Clone, Copy, Debug, Default)]
pub struct ConsoleFormatter {
    options: FormatOptions,
    colors: bool,
}

impl ConsoleFormatter {
    /// Creates a formatter with the given options and no colors.
    pub const fn new(options: FormatOptions) -> Self {
        Self {
            options,
            colors: false,
        }
    }

    /// Enables or disables ANSI colors.
    pub const fn with_colors(mut self, colors: bool) -> Self {
        self.colors = colors;
        self
    }

    /// Reports whether ANSI colors are emitted.
    pub const fn colors(&self) -> bool {
        self.colors
    }
}

impl Formatter for ConsoleFormatter {
    fn format(&self, record: &LogRecord) -> String {
        let time = record.datetime().format("%H:%M:%S");
        let label = format!("{:<9}", record.level().label());
        let message = self.options.value(record.message());

        let mut output = if self.colors {
            format!(
                "{time} {}{label}{RESET} {CHANNEL_STYLE}[{}]{RESET} {message}",
                level_style(record.level()),
                record.channel(),
            )
        } else {
            format!("{time} {label} [{}] {message}", record.channel())
        };

        for section in [record.context(), record.extra()] {
            if let Some(rendered) = self.options.map(section) {
                output.push(' ');
                output.push_str(&rendered);
            }
        }
        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Local, TimeZone};
    use logging::Context;
    use serde_json::json;
    use std::sync::Arc;

    fn record(level: Level, message: &str) -> LogRecord {
        let when = Local
            .with_ymd_and_hms(2024, 5, 1, 8, 4, 2)
            .single()
            .expect("unambiguous local time");
        LogRecord::new(Arc::from("ELGG"), level, json!(message), Context::new()).at(when)
    }

    #[test]
    fn plain_output_pads_the_level() {
        let formatter = ConsoleFormatter::new(FormatOptions::standard());
        assert_eq!(
            formatter.format(&record(Level::Info, "cache warmed")),
            "08:04:02 INFO      [ELGG] cache warmed"
        );
    }

    #[test]
    fn colored_output_wraps_label_and_channel() {
        let formatter = ConsoleFormatter::new(FormatOptions::standard()).with_colors(true);
        let output = formatter.format(&record(Level::Critical, "db down"));
        assert!(output.starts_with("08:04:02 \x1b[31mCRITICAL \x1b[0m"));
        assert!(output.contains("\x1b[33m[ELGG]\x1b[0m"));
        assert!(output.ends_with(" db down"));
        assert!(formatter.colors());
    }

    #[test]
    fn inline_line_breaks_survive() {
        let formatter = ConsoleFormatter::new(FormatOptions::standard());
        let output = formatter.format(&record(Level::Error, "first\nsecond"));
        assert!(output.ends_with("first\nsecond"));
    }

    #[test]
    fn extra_is_appended() {
        let formatter = ConsoleFormatter::new(FormatOptions::standard());
        let record = record(Level::Error, "boom").with_extra("backtrace", json!(["main"]));
        let output = formatter.format(&record);
        assert!(output.ends_with(r#"boom {"backtrace":["main"]}"#));
    }
}
