use std::fmt;
use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::PathBuf;
use std::str::FromStr;

use logging::{INTERNAL_TARGET, Level, LogRecord, Sink};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{Pipeline, StreamHandler};
use crate::format::{FormatOptions, LineFormatter};
use crate::processor::{
    BacktraceProcessor, InterpolationProcessor, MemoryPeakUsageProcessor, MemoryUsageProcessor,
    ProcessIdProcessor, WebProcessor,
};
#[cfg(unix)]
use crate::syslog::SyslogConnection;

/// Where the error log is written.
///
/// Spelled `stderr`, `file:<path>` or `syslog` in configuration.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ErrorLogTarget {
    /// The process's standard error stream.
    #[default]
    Stderr,
    /// A file opened for appending, created when missing.
    File(PathBuf),
    /// The system logger.
    Syslog,
}

/// Error returned when an error-log destination cannot be parsed.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
#[error("unknown error log destination `{0}` (expected stderr, syslog or file:<path>)")]
pub struct ParseTargetError(pub String);

impl FromStr for ErrorLogTarget {
    type Err = ParseTargetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if let Some(path) = trimmed.strip_prefix("file:") {
            if path.is_empty() {
                return Err(ParseTargetError(s.to_owned()));
            }
            return Ok(Self::File(PathBuf::from(path)));
        }
        match trimmed.to_ascii_lowercase().as_str() {
            "stderr" | "" => Ok(Self::Stderr),
            "syslog" => Ok(Self::Syslog),
            _ => Err(ParseTargetError(s.to_owned())),
        }
    }
}

impl fmt::Display for ErrorLogTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Stderr => f.write_str("stderr"),
            Self::File(path) => write!(f, "file:{}", path.display()),
            Self::Syslog => f.write_str("syslog"),
        }
    }
}

impl TryFrom<String> for ErrorLogTarget {
    type Error = ParseTargetError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ErrorLogTarget> for String {
    fn from(target: ErrorLogTarget) -> Self {
        target.to_string()
    }
}

/// Pipeline used for the error log of web requests and detached processes.
///
/// Runs interpolation, request metadata, memory usage, peak memory usage,
/// process id and a backtrace from WARNING upwards, then formats with
/// [`LineFormatter`].
pub fn error_log_pipeline(web: WebProcessor) -> Pipeline {
    Pipeline::new(LineFormatter::new(FormatOptions::standard()))
        .with_processor(InterpolationProcessor)
        .with_processor(web)
        .with_processor(MemoryUsageProcessor)
        .with_processor(MemoryPeakUsageProcessor)
        .with_processor(ProcessIdProcessor)
        .with_processor(BacktraceProcessor::new(Level::Warning))
}

enum Destination {
    Stream(StreamHandler<Box<dyn Write + Send>>),
    #[cfg(unix)]
    Syslog {
        pipeline: Pipeline,
        connection: SyslogConnection,
    },
}

/// Sink writing to the configured error log destination.
pub struct ErrorLogHandler {
    target: ErrorLogTarget,
    destination: Destination,
}

impl ErrorLogHandler {
    /// Opens `target` and attaches `pipeline`.
    ///
    /// Files are opened in append mode and created when missing. On
    /// platforms without syslog the syslog target falls back to standard
    /// error.
    ///
    /// # Errors
    ///
    /// Returns the I/O error raised while opening a file destination.
    pub fn open(target: ErrorLogTarget, pipeline: Pipeline) -> io::Result<Self> {
        let destination = match &target {
            ErrorLogTarget::Stderr => stream(Box::new(io::stderr()), pipeline),
            ErrorLogTarget::File(path) => {
                let file = OpenOptions::new().create(true).append(true).open(path)?;
                stream(Box::new(file), pipeline)
            }
            #[cfg(unix)]
            ErrorLogTarget::Syslog => Destination::Syslog {
                pipeline,
                connection: SyslogConnection::open(),
            },
            #[cfg(not(unix))]
            ErrorLogTarget::Syslog => {
                tracing::warn!(
                    target: INTERNAL_TARGET,
                    "syslog is unavailable on this platform; using stderr"
                );
                stream(Box::new(io::stderr()), pipeline)
            }
        };
        tracing::debug!(target: INTERNAL_TARGET, destination = %target, "error log opened");
        Ok(Self {
            target,
            destination,
        })
    }

    /// Writes to `writer` instead of a configured destination.
    pub fn from_writer(writer: Box<dyn Write + Send>, pipeline: Pipeline) -> Self {
        Self {
            target: ErrorLogTarget::Stderr,
            destination: stream(writer, pipeline),
        }
    }

    /// Configured destination. Handlers built with
    /// [`from_writer`](Self::from_writer) report [`ErrorLogTarget::Stderr`].
    pub const fn target(&self) -> &ErrorLogTarget {
        &self.target
    }

    fn pipeline(&self) -> &Pipeline {
        match &self.destination {
            Destination::Stream(handler) => handler.pipeline(),
            #[cfg(unix)]
            Destination::Syslog { pipeline, .. } => pipeline,
        }
    }
}

fn stream(writer: Box<dyn Write + Send>, pipeline: Pipeline) -> Destination {
    Destination::Stream(StreamHandler::new(writer, pipeline))
}

impl Sink for ErrorLogHandler {
    fn handles(&self, level: Level) -> bool {
        self.pipeline().accepts(level)
    }

    fn handle(&mut self, record: &LogRecord) -> io::Result<()> {
        match &mut self.destination {
            Destination::Stream(handler) => handler.handle(record),
            #[cfg(unix)]
            Destination::Syslog {
                pipeline,
                connection,
            } => {
                connection.send(record.level(), &pipeline.render(record));
                Ok(())
            }
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match &mut self.destination {
            Destination::Stream(handler) => handler.flush(),
            #[cfg(unix)]
            Destination::Syslog { .. } => Ok(()),
        }
    }
}

impl fmt::Debug for ErrorLogHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ErrorLogHandler")
            .field("target", &self.target)
            .field("pipeline", self.pipeline())
            .finish_non_exhaustive()
    }
}
