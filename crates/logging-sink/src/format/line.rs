use logging::LogRecord;

use super::{FormatOptions, Formatter};

/// Date format of the error log line.
const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Single-line formatter used for the error log.
///
/// Output shape: `[2024-05-01 12:00:00] ELGG.WARNING: message {"context"} {"extra"}`.
#[derive(Clone, Copy, Debug, Default)]
pub struct LineFormatter {
    options: FormatOptions,
}

impl LineFormatter {
    /// Creates a formatter with the given options.
    pub const fn new(options: FormatOptions) -> Self {
        Self { options }
    }

    /// Active options.
    pub const fn options(&self) -> FormatOptions {
        self.options
    }
}

impl Formatter for LineFormatter {
    fn format(&self, record: &LogRecord) -> String {
        let mut output = format!(
            "[{}] {}.{}: {}",
            record.datetime().format(DATE_FORMAT),
            record.channel(),
            record.level().label(),
            self.options.value(record.message()),
        );
        for section in [record.context(), record.extra()] {
            if let Some(rendered) = self.options.map(section) {
                output.push(' ');
                output.push_str(&rendered);
            }
        }
        output
    }
}
