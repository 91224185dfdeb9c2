//! src/config.rs
//!
//! Logger configuration read from serde sources or `ELGG_*` environment
//! variables.

use std::env;
use std::str::FromStr;

use logging::{ErrorReporting, Level, Logger};
use logging_sink::{ConsoleVerbosity, ErrorLogTarget, ParseTargetError, ParseVerbosityError};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::environment::ExecutionMode;

/// Explicit threshold.
pub const LEVEL_ENV: &str = "ELGG_LOG_LEVEL";
/// `console` or `web`.
pub const MODE_ENV: &str = "ELGG_LOG_MODE";
/// Host error-reporting mask.
pub const ERROR_REPORTING_ENV: &str = "ELGG_ERROR_REPORTING";
/// Console verbosity.
pub const VERBOSITY_ENV: &str = "ELGG_LOG_VERBOSITY";
/// Error log destination.
pub const ERROR_LOG_ENV: &str = "ELGG_ERROR_LOG";
/// Channel name.
pub const CHANNEL_ENV: &str = "ELGG_LOG_CHANNEL";

/// Errors raised while reading or validating a [`LoggerConfig`].
#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum ConfigError {
    /// The threshold is not a level name, legacy alias, severity or `off`.
    #[error("invalid log level `{0}`")]
    InvalidLevel(String),
    /// The execution mode is neither `console` nor `web`.
    #[error("invalid execution mode `{0}` (expected console or web)")]
    InvalidMode(String),
    /// The error-reporting mask is not an unsigned integer.
    #[error("invalid error reporting mask `{0}`")]
    InvalidErrorReporting(String),
    /// The console verbosity is not recognised.
    #[error(transparent)]
    InvalidVerbosity(#[from] ParseVerbosityError),
    /// The error log destination is not recognised.
    #[error(transparent)]
    InvalidErrorLog(#[from] ParseTargetError),
    /// The channel name is empty.
    #[error("log channel must not be empty")]
    EmptyChannel,
}

/// Settings the factory uses to wire a [`Logger`].
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggerConfig {
    /// Explicit threshold; `None` derives it from the error-reporting mask.
    pub level: Option<String>,
    /// Output pipeline; `None` detects it from the process environment.
    pub mode: Option<ExecutionMode>,
    /// Error-reporting mask; `None` means every condition is reported.
    pub error_reporting: Option<u32>,
    /// Minimum level the console pipeline shows.
    pub verbosity: ConsoleVerbosity,
    /// Destination of the error log pipeline.
    pub error_log: ErrorLogTarget,
    /// Channel stamped on every record.
    pub channel: String,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            level: None,
            mode: None,
            error_reporting: None,
            verbosity: ConsoleVerbosity::default(),
            error_log: ErrorLogTarget::default(),
            channel: Logger::CHANNEL.to_owned(),
        }
    }
}

impl LoggerConfig {
    /// Reads the configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when a variable holds an unrecognised value.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Reads the configuration through `lookup`. Empty values count as unset.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when a variable holds an unrecognised value.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        let mut config = Self::default();

        if let Some(level) = get(LEVEL_ENV) {
            config.level = Some(level);
        }
        if let Some(mode) = get(MODE_ENV) {
            config.mode = Some(mode.parse()?);
        }
        if let Some(mask) = get(ERROR_REPORTING_ENV) {
            config.error_reporting = Some(parse_mask(&mask)?);
        }
        if let Some(verbosity) = get(VERBOSITY_ENV) {
            config.verbosity = verbosity.parse()?;
        }
        if let Some(target) = get(ERROR_LOG_ENV) {
            config.error_log = target.parse()?;
        }
        if let Some(channel) = get(CHANNEL_ENV) {
            channel.trim().clone_into(&mut config.channel);
        }

        config.validate()?;
        Ok(config)
    }

    /// Checks the fields serde cannot validate on its own.
    ///
    /// # Errors
    ///
    /// Returns the first invalid field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.threshold()?;
        if self.channel.trim().is_empty() {
            return Err(ConfigError::EmptyChannel);
        }
        Ok(())
    }

    /// Parsed explicit threshold, if one is configured.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidLevel`] for unrecognised input.
    pub fn threshold(&self) -> Result<Option<Level>, ConfigError> {
        self.level
            .as_deref()
            .map(|level| {
                Level::from_str(level).map_err(|_| ConfigError::InvalidLevel(level.to_owned()))
            })
            .transpose()
    }

    /// Host mask, defaulting to every condition.
    pub fn error_reporting(&self) -> ErrorReporting {
        self.error_reporting
            .map_or_else(ErrorReporting::all, ErrorReporting::new)
    }
}

fn parse_mask(value: &str) -> Result<u32, ConfigError> {
    let trimmed = value.trim();
    let parsed = match trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
    {
        Some(hex) => u32::from_str_radix(hex, 16),
        None => trimmed.parse(),
    };
    parsed.map_err(|_| ConfigError::InvalidErrorReporting(value.to_owned()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::path::PathBuf;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn empty_environment_gives_defaults() {
        let config = LoggerConfig::from_lookup(lookup(&[])).expect("defaults");
        assert_eq!(config, LoggerConfig::default());
        assert_eq!(config.channel, "ELGG");
        assert_eq!(config.threshold(), Ok(None));
        assert_eq!(config.error_reporting(), ErrorReporting::all());
    }

    #[test]
    fn reads_every_variable() {
        let config = LoggerConfig::from_lookup(lookup(&[
            (LEVEL_ENV, "WARNING"),
            (MODE_ENV, "web"),
            (ERROR_REPORTING_ENV, "0x3"),
            (VERBOSITY_ENV, "verbose"),
            (ERROR_LOG_ENV, "file:/var/log/elgg.log"),
            (CHANNEL_ENV, " CRON "),
        ]))
        .expect("valid config");

        assert_eq!(config.threshold(), Ok(Some(Level::Warning)));
        assert_eq!(config.mode, Some(ExecutionMode::Web));
        assert_eq!(config.error_reporting, Some(3));
        assert_eq!(config.verbosity, ConsoleVerbosity::Verbose);
        assert_eq!(
            config.error_log,
            ErrorLogTarget::File(PathBuf::from("/var/log/elgg.log"))
        );
        assert_eq!(config.channel, "CRON");
    }

    #[test]
    fn blank_values_count_as_unset() {
        let config = LoggerConfig::from_lookup(lookup(&[(LEVEL_ENV, "  "), (MODE_ENV, "")]))
            .expect("blank is unset");
        assert_eq!(config.level, None);
        assert_eq!(config.mode, None);
    }

    #[test]
    fn invalid_values_are_reported() {
        assert_eq!(
            LoggerConfig::from_lookup(lookup(&[(LEVEL_ENV, "loud")])),
            Err(ConfigError::InvalidLevel("loud".to_owned()))
        );
        assert_eq!(
            LoggerConfig::from_lookup(lookup(&[(MODE_ENV, "daemon")])),
            Err(ConfigError::InvalidMode("daemon".to_owned()))
        );
        assert_eq!(
            LoggerConfig::from_lookup(lookup(&[(ERROR_REPORTING_ENV, "all")])),
            Err(ConfigError::InvalidErrorReporting("all".to_owned()))
        );
        assert!(matches!(
            LoggerConfig::from_lookup(lookup(&[(VERBOSITY_ENV, "chatty")])),
            Err(ConfigError::InvalidVerbosity(_))
        ));
        assert!(matches!(
            LoggerConfig::from_lookup(lookup(&[(ERROR_LOG_ENV, "pager")])),
            Err(ConfigError::InvalidErrorLog(_))
        ));
    }

    #[test]
    fn legacy_and_numeric_levels_are_accepted() {
        for (input, expected) in [
            ("INFO", Level::Info),
            ("550", Level::Alert),
            ("off", Level::Off),
        ] {
            let config = LoggerConfig {
                level: Some(input.to_owned()),
                ..LoggerConfig::default()
            };
            assert_eq!(config.threshold(), Ok(Some(expected)), "input {input}");
        }
    }

    #[test]
    fn empty_channel_is_rejected() {
        let config = LoggerConfig {
            channel: "   ".to_owned(),
            ..LoggerConfig::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::EmptyChannel));
    }

    #[test]
    fn deserializes_from_json() {
        let config: LoggerConfig = serde_json::from_str(
            r#"{"level":"notice","mode":"console","verbosity":"very_verbose","error_log":"syslog"}"#,
        )
        .expect("parse config");
        assert_eq!(config.threshold(), Ok(Some(Level::Notice)));
        assert_eq!(config.mode, Some(ExecutionMode::Console));
        assert_eq!(config.verbosity, ConsoleVerbosity::VeryVerbose);
        assert_eq!(config.error_log, ErrorLogTarget::Syslog);
        assert_eq!(config.channel, "ELGG");

        assert!(serde_json::from_str::<LoggerConfig>(r#"{"colour":true}"#).is_err());
    }
}
