//! Handlers that turn dispatched records into output.
//!
//! A handler pairs a [`Pipeline`] (processors plus formatter) with a
//! destination. [`StreamHandler`] writes to any [`Write`] implementor and is
//! the building block for both the console and error-log presets.

mod console;
mod error_log;

pub use console::{ConsoleVerbosity, ParseVerbosityError, console_pipeline};
pub use error_log::{ErrorLogHandler, ErrorLogTarget, ParseTargetError, error_log_pipeline};

use std::fmt;
use std::io::{self, Write};

use logging::{Level, LogRecord, Sink};

use crate::format::Formatter;
use crate::line_mode::LineMode;
use crate::processor::Processor;

/// Processors followed by a formatter, gated by a minimum level.
pub struct Pipeline {
    processors: Vec<Box<dyn Processor>>,
    formatter: Box<dyn Formatter>,
    min_level: Level,
}

impl Pipeline {
    /// Creates a pipeline that formats with `formatter` and accepts every
    /// level.
    pub fn new<F>(formatter: F) -> Self
    where
        F: Formatter + 'static,
    {
        Self {
            processors: Vec::new(),
            formatter: Box::new(formatter),
            min_level: Level::Debug,
        }
    }

    /// Appends a processor. Processors run in insertion order.
    #[must_use]
    pub fn with_processor<P>(mut self, processor: P) -> Self
    where
        P: Processor + 'static,
    {
        self.processors.push(Box::new(processor));
        self
    }

    /// Sets the lowest level the pipeline accepts.
    #[must_use]
    pub const fn with_min_level(mut self, level: Level) -> Self {
        self.min_level = level;
        self
    }

    /// Lowest accepted level.
    pub const fn min_level(&self) -> Level {
        self.min_level
    }

    /// Number of configured processors.
    pub fn processor_count(&self) -> usize {
        self.processors.len()
    }

    /// Reports whether records at `level` pass the pipeline's gate.
    pub fn accepts(&self, level: Level) -> bool {
        !level.is_off() && level >= self.min_level
    }

    /// Runs the processors over a copy of `record` and formats the result.
    pub fn render(&self, record: &LogRecord) -> String {
        let mut processed = record.clone();
        for processor in &self.processors {
            processed = processor.process(processed);
        }
        self.formatter.format(&processed)
    }
}

impl fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pipeline")
            .field("processors", &self.processors.len())
            .field("min_level", &self.min_level)
            .finish_non_exhaustive()
    }
}

/// Sink writing rendered records to a [`Write`] implementor.
pub struct StreamHandler<W> {
    writer: W,
    pipeline: Pipeline,
    line_mode: LineMode,
}

impl<W> StreamHandler<W> {
    /// Creates a handler that terminates each record with a newline.
    pub const fn new(writer: W, pipeline: Pipeline) -> Self {
        Self {
            writer,
            pipeline,
            line_mode: LineMode::WithNewline,
        }
    }

    /// Replaces the line mode.
    #[must_use]
    pub fn with_line_mode(mut self, line_mode: LineMode) -> Self {
        self.line_mode = line_mode;
        self
    }

    /// Active line mode.
    pub const fn line_mode(&self) -> LineMode {
        self.line_mode
    }

    /// The handler's pipeline.
    pub const fn pipeline(&self) -> &Pipeline {
        &self.pipeline
    }

    /// Borrows the underlying writer.
    pub const fn get_ref(&self) -> &W {
        &self.writer
    }

    /// Consumes the handler and returns the writer.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W> StreamHandler<W>
where
    W: Write,
{
    fn write_record(&mut self, record: &LogRecord) -> io::Result<()> {
        let mut rendered = self.pipeline.render(record);
        rendered.push_str(self.line_mode.terminator());
        self.writer.write_all(rendered.as_bytes())
    }
}

impl<W> Sink for StreamHandler<W>
where
    W: Write + Send,
{
    fn handles(&self, level: Level) -> bool {
        self.pipeline.accepts(level)
    }

    fn handle(&mut self, record: &LogRecord) -> io::Result<()> {
        self.write_record(record)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }
}

impl<W> fmt::Debug for StreamHandler<W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StreamHandler")
            .field("pipeline", &self.pipeline)
            .field("line_mode", &self.line_mode)
            .finish_non_exhaustive()
    }
}
