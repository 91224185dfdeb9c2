//! src/factory.rs
//!
//! Builds a fully wired [`Logger`] with exactly one output pipeline.

use std::io::{self, Write};

use logging::{Dispatcher, INTERNAL_TARGET, Level, Logger, Sink};
use logging_sink::{
    ErrorLogHandler, ErrorLogTarget, StreamHandler, WebProcessor, console_pipeline,
    error_log_pipeline,
};
use thiserror::Error;

use crate::config::{ConfigError, LoggerConfig};
use crate::environment::{ExecutionMode, Host, stdout_supports_color};

/// Destination that replaces the selected pipeline's default output.
pub type Output = Box<dyn Write + Send>;

/// Errors raised by [`build`].
#[derive(Debug, Error)]
pub enum BuildError {
    /// The configuration is invalid.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// The error log destination could not be opened.
    #[error("cannot open error log `{target}`: {source}")]
    ErrorLog {
        /// Destination that failed.
        target: ErrorLogTarget,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },
}

/// Builds a logger from the process environment.
///
/// Never fails: an invalid environment falls back to the default
/// configuration and an unusable error log falls back to standard error.
/// Both fallbacks are reported on the internal `tracing` target.
///
/// `output` replaces stdout in console mode and the error log in web mode.
pub fn factory(output: Option<Output>) -> Logger {
    let config = LoggerConfig::from_env().unwrap_or_else(|error| {
        tracing::warn!(
            target: INTERNAL_TARGET,
            %error,
            "invalid logger configuration in environment; using defaults"
        );
        LoggerConfig::default()
    });

    let (threshold, mode) = resolve(&config).unwrap_or_else(|error| {
        tracing::warn!(
            target: INTERNAL_TARGET,
            %error,
            "invalid logger configuration; using the default level"
        );
        (None, ExecutionMode::detect())
    });
    let sink = match pipeline_sink(&config, mode, output) {
        Ok(sink) => sink,
        Err(source) => {
            tracing::warn!(
                target: INTERNAL_TARGET,
                destination = %config.error_log,
                error = %source,
                "cannot open error log; writing to stderr"
            );
            Box::new(ErrorLogHandler::from_writer(
                Box::new(io::stderr()),
                error_log_pipeline(WebProcessor::from_env()),
            ))
        }
    };
    wire(&config, threshold, mode, sink)
}

/// Builds a logger from an explicit configuration.
///
/// # Errors
///
/// Returns [`BuildError::Config`] for invalid settings and
/// [`BuildError::ErrorLog`] when the error log destination cannot be opened.
pub fn build(config: &LoggerConfig, output: Option<Output>) -> Result<Logger, BuildError> {
    let (threshold, mode) = resolve(config)?;
    let sink = pipeline_sink(config, mode, output).map_err(|source| BuildError::ErrorLog {
        target: config.error_log.clone(),
        source,
    })?;
    Ok(wire(config, threshold, mode, sink))
}

fn resolve(config: &LoggerConfig) -> Result<(Option<Level>, ExecutionMode), ConfigError> {
    config.validate()?;
    let threshold = config.threshold()?;
    let mode = config.mode.unwrap_or_else(ExecutionMode::detect);
    Ok((threshold, mode))
}

fn pipeline_sink(
    config: &LoggerConfig,
    mode: ExecutionMode,
    output: Option<Output>,
) -> io::Result<Box<dyn Sink>> {
    match mode {
        ExecutionMode::Console => {
            let colors = output.is_none() && stdout_supports_color();
            let writer: Output = match output {
                Some(writer) => writer,
                None => Box::new(io::stdout()),
            };
            Ok(Box::new(StreamHandler::new(
                writer,
                console_pipeline(config.verbosity, colors),
            )))
        }
        ExecutionMode::Web => {
            let pipeline = error_log_pipeline(WebProcessor::from_env());
            let handler = match output {
                Some(writer) => ErrorLogHandler::from_writer(writer, pipeline),
                None => ErrorLogHandler::open(config.error_log.clone(), pipeline)?,
            };
            Ok(Box::new(handler))
        }
    }
}

fn wire(
    config: &LoggerConfig,
    threshold: Option<Level>,
    mode: ExecutionMode,
    sink: Box<dyn Sink>,
) -> Logger {
    let mut dispatcher = Dispatcher::new(config.channel.as_str());
    dispatcher.add_boxed_sink(sink);

    let logger = Logger::with_host(dispatcher, Host::new(config.error_reporting(), mode));
    logger.set_level(threshold);
    tracing::debug!(
        target: INTERNAL_TARGET,
        %mode,
        channel = %config.channel,
        level = %logger.level(),
        "logger constructed"
    );
    logger
}
