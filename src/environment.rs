//! src/environment.rs
//!
//! Execution mode detection and the host view handed to the logger.

use std::fmt;
use std::io;
use std::str::FromStr;

use is_terminal::IsTerminal as _;
use logging::{ErrorReporting, HostEnvironment};
use serde::{Deserialize, Serialize};

use crate::config::ConfigError;

/// CGI variable every gateway sets for the request it hands over.
const GATEWAY_ENV: &str = "GATEWAY_INTERFACE";

/// Which output pipeline the factory selects.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExecutionMode {
    /// Attached to a console: records go to the console pipeline.
    Console,
    /// Serving requests: records go to the error log pipeline.
    Web,
}

impl ExecutionMode {
    /// Detects the mode of the current process.
    pub fn detect() -> Self {
        Self::detect_with(|key| std::env::var_os(key).is_some())
    }

    /// Detects the mode using `is_set` to probe environment variables.
    pub fn detect_with<F>(is_set: F) -> Self
    where
        F: Fn(&str) -> bool,
    {
        if is_set(GATEWAY_ENV) {
            Self::Web
        } else {
            Self::Console
        }
    }

    /// Lowercase name used in configuration.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Console => "console",
            Self::Web => "web",
        }
    }
}

impl fmt::Display for ExecutionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExecutionMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "console" | "cli" => Ok(Self::Console),
            "web" => Ok(Self::Web),
            _ => Err(ConfigError::InvalidMode(s.to_owned())),
        }
    }
}

/// Reports whether console output should carry ANSI colors.
pub fn stdout_supports_color() -> bool {
    io::stdout().is_terminal()
}

/// Host settings resolved once at construction.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Host {
    error_reporting: ErrorReporting,
    mode: ExecutionMode,
}

impl Host {
    /// Creates a host with an explicit mask and mode.
    pub const fn new(error_reporting: ErrorReporting, mode: ExecutionMode) -> Self {
        Self {
            error_reporting,
            mode,
        }
    }

    /// Selected execution mode.
    pub const fn mode(&self) -> ExecutionMode {
        self.mode
    }
}

impl HostEnvironment for Host {
    fn error_reporting(&self) -> ErrorReporting {
        self.error_reporting
    }
}
