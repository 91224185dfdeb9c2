use std::fmt;
use std::str::FromStr;

use logging::Level;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::Pipeline;
use crate::format::{ConsoleFormatter, FormatOptions};
use crate::processor::{BacktraceProcessor, InterpolationProcessor};

/// How chatty the console handler is.
///
/// Each step maps onto the minimum level the console pipeline accepts.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConsoleVerbosity {
    /// Errors and worse.
    Quiet,
    /// Warnings and worse.
    #[default]
    Normal,
    /// Notices and worse.
    Verbose,
    /// Informational messages and worse.
    VeryVerbose,
    /// Everything.
    Debug,
}

impl ConsoleVerbosity {
    /// Minimum level shown at this verbosity.
    pub const fn min_level(self) -> Level {
        match self {
            Self::Quiet => Level::Error,
            Self::Normal => Level::Warning,
            Self::Verbose => Level::Notice,
            Self::VeryVerbose => Level::Info,
            Self::Debug => Level::Debug,
        }
    }

    /// Lowercase name used in configuration.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Quiet => "quiet",
            Self::Normal => "normal",
            Self::Verbose => "verbose",
            Self::VeryVerbose => "very_verbose",
            Self::Debug => "debug",
        }
    }
}

impl fmt::Display for ConsoleVerbosity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a verbosity name is not recognised.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
#[error("unknown console verbosity `{0}`")]
pub struct ParseVerbosityError(pub String);

impl FromStr for ConsoleVerbosity {
    type Err = ParseVerbosityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "quiet" | "0" => Ok(Self::Quiet),
            "normal" | "1" => Ok(Self::Normal),
            "verbose" | "2" => Ok(Self::Verbose),
            "very_verbose" | "3" => Ok(Self::VeryVerbose),
            "debug" | "4" => Ok(Self::Debug),
            _ => Err(ParseVerbosityError(s.to_owned())),
        }
    }
}

/// Pipeline used when the process runs attached to a console.
///
/// Interpolates placeholders, attaches backtraces from ERROR upwards and
/// formats with [`ConsoleFormatter`], keeping inline line breaks and
/// dropping empty context and extra sections.
pub fn console_pipeline(verbosity: ConsoleVerbosity, colors: bool) -> Pipeline {
    Pipeline::new(ConsoleFormatter::new(FormatOptions::standard()).with_colors(colors))
        .with_processor(InterpolationProcessor)
        .with_processor(BacktraceProcessor::new(Level::Error))
        .with_min_level(verbosity.min_level())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbosity_maps_to_levels() {
        assert_eq!(ConsoleVerbosity::Quiet.min_level(), Level::Error);
        assert_eq!(ConsoleVerbosity::default().min_level(), Level::Warning);
        assert_eq!(ConsoleVerbosity::Verbose.min_level(), Level::Notice);
        assert_eq!(ConsoleVerbosity::VeryVerbose.min_level(), Level::Info);
        assert_eq!(ConsoleVerbosity::Debug.min_level(), Level::Debug);
    }

    #[test]
    fn verbosity_parses_names_and_digits() {
        assert_eq!("very-verbose".parse(), Ok(ConsoleVerbosity::VeryVerbose));
        assert_eq!(" QUIET ".parse(), Ok(ConsoleVerbosity::Quiet));
        assert_eq!("4".parse(), Ok(ConsoleVerbosity::Debug));
        assert_eq!(
            "loud".parse::<ConsoleVerbosity>(),
            Err(ParseVerbosityError("loud".to_owned()))
        );
    }

    #[test]
    fn display_round_trips() {
        for verbosity in [
            ConsoleVerbosity::Quiet,
            ConsoleVerbosity::Normal,
            ConsoleVerbosity::Verbose,
            ConsoleVerbosity::VeryVerbose,
            ConsoleVerbosity::Debug,
        ] {
            assert_eq!(verbosity.to_string().parse(), Ok(verbosity));
        }
    }

    #[test]
    fn console_pipeline_uses_verbosity_gate() {
        let pipeline = console_pipeline(ConsoleVerbosity::Verbose, false);
        assert_eq!(pipeline.min_level(), Level::Notice);
        assert!(!pipeline.accepts(Level::Info));
        assert_eq!(pipeline.processor_count(), 2);
    }
}
