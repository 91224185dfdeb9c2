//! crates/logging/src/dispatch.rs
//! Multi-sink dispatch primitive the logger forwards finished records to.

use std::fmt;
use std::io;
use std::sync::{Arc, Mutex, PoisonError};

use crate::levels::Level;
use crate::record::LogRecord;

/// Destination that formats and emits finished records.
pub trait Sink: Send {
    /// Reports whether the sink accepts records at `level`.
    fn handles(&self, level: Level) -> bool {
        !level.is_off()
    }

    /// Formats and writes `record`.
    fn handle(&mut self, record: &LogRecord) -> io::Result<()>;

    /// Flushes buffered output.
    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Fans records out to every registered sink.
pub struct Dispatcher {
    channel: Arc<str>,
    sinks: Vec<Box<dyn Sink>>,
}

impl Dispatcher {
    /// Creates a dispatcher with no sinks.
    pub fn new(channel: impl Into<Arc<str>>) -> Self {
        Self {
            channel: channel.into(),
            sinks: Vec::new(),
        }
    }

    /// Channel name stamped on every record.
    pub fn channel(&self) -> &Arc<str> {
        &self.channel
    }

    /// Appends a sink. Sinks receive records in registration order.
    pub fn add_sink<S>(&mut self, sink: S)
    where
        S: Sink + 'static,
    {
        self.sinks.push(Box::new(sink));
    }

    /// Appends an already boxed sink.
    pub fn add_boxed_sink(&mut self, sink: Box<dyn Sink>) {
        self.sinks.push(sink);
    }

    /// Number of registered sinks.
    pub fn sink_count(&self) -> usize {
        self.sinks.len()
    }

    /// Emits `record` to every sink that handles its level.
    ///
    /// Returns `true` when at least one sink wrote the record. Write failures
    /// are reported on the internal tracing target and otherwise ignored.
    pub fn emit(&mut self, record: &LogRecord) -> bool {
        let mut handled = false;
        for sink in &mut self.sinks {
            if !sink.handles(record.level()) {
                continue;
            }
            match sink.handle(record) {
                Ok(()) => handled = true,
                Err(error) => {
                    tracing::warn!(
                        target: crate::INTERNAL_TARGET,
                        %error,
                        level = %record.level(),
                        "log sink failed to write record"
                    );
                }
            }
        }
        handled
    }

    /// Flushes every sink, returning the first error encountered.
    pub fn flush(&mut self) -> io::Result<()> {
        let mut first_error = None;
        for sink in &mut self.sinks {
            if let Err(error) = sink.flush() {
                first_error.get_or_insert(error);
            }
        }
        first_error.map_or(Ok(()), Err)
    }
}

impl fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dispatcher")
            .field("channel", &self.channel)
            .field("sinks", &self.sinks.len())
            .finish()
    }
}

/// Sink that keeps every record in memory.
///
/// Clones share the same buffer, so a test can hand one clone to the logger
/// and inspect the records through another.
#[derive(Clone, Debug, Default)]
pub struct MemorySink {
    records: Arc<Mutex<Vec<LogRecord>>>,
}

impl MemorySink {
    /// Creates an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a snapshot of the records received so far.
    pub fn records(&self) -> Vec<LogRecord> {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Removes and returns every record received so far.
    pub fn drain(&self) -> Vec<LogRecord> {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .drain(..)
            .collect()
    }

    /// Reports whether no record has been received.
    pub fn is_empty(&self) -> bool {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_empty()
    }
}

impl Sink for MemorySink {
    fn handle(&mut self, record: &LogRecord) -> io::Result<()> {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(record.clone());
        Ok(())
    }
}
