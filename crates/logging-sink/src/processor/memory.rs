use std::fs;

use logging::LogRecord;

use super::Processor;

/// Formats a byte count the way the error log shows memory figures.
///
/// Values above a megabyte are shown in `MB`, above a kilobyte in `KB`,
/// everything else in `B`, so exactly 1024 bytes stays `1024 B`. Fractions
/// are kept to two decimals.
pub fn format_bytes(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;

    #[allow(clippy::cast_precision_loss)]
    let scaled = |unit: u64| bytes as f64 / unit as f64;

    if bytes > MB {
        format!("{} MB", trim_decimals(scaled(MB)))
    } else if bytes > KB {
        format!("{} KB", trim_decimals(scaled(KB)))
    } else {
        format!("{bytes} B")
    }
}

fn trim_decimals(value: f64) -> String {
    let text = format!("{value:.2}");
    text.trim_end_matches('0').trim_end_matches('.').to_owned()
}

/// Reads a `kB` field such as `VmRSS` from `/proc/self/status`.
fn status_field(field: &str) -> Option<u64> {
    let status = fs::read_to_string("/proc/self/status").ok()?;
    parse_status_field(&status, field)
}

fn parse_status_field(status: &str, field: &str) -> Option<u64> {
    status.lines().find_map(|line| {
        let (name, rest) = line.split_once(':')?;
        if name != field {
            return None;
        }
        let kilobytes: u64 = rest.split_whitespace().next()?.parse().ok()?;
        Some(kilobytes * 1024)
    })
}

/// Adds the resident memory of the process as `extra.memory_usage`.
///
/// Platforms without `/proc` leave the record untouched.
#[derive(Clone, Copy, Debug, Default)]
pub struct MemoryUsageProcessor;

impl Processor for MemoryUsageProcessor {
    fn process(&self, record: LogRecord) -> LogRecord {
        match status_field("VmRSS") {
            Some(bytes) => record.with_extra("memory_usage", format_bytes(bytes)),
            None => record,
        }
    }
}

/// Adds the peak resident memory of the process as `extra.memory_peak_usage`.
#[derive(Clone, Copy, Debug, Default)]
pub struct MemoryPeakUsageProcessor;

impl Processor for MemoryPeakUsageProcessor {
    fn process(&self, record: LogRecord) -> LogRecord {
        match status_field("VmHWM") {
            Some(bytes) => record.with_extra("memory_peak_usage", format_bytes(bytes)),
            None => record,
        }
    }
}
