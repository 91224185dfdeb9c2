//! crates/logging/src/levels.rs
//! Severity levels, the legacy alias table and level normalization.

use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Log severity, ordered from [`Level::Off`] up to [`Level::Emergency`].
///
/// `Off` is the disabled sentinel: it sorts below every real level, carries no
/// numeric severity, and is never loggable.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    /// Logging disabled.
    Off,
    /// Detailed debug information (100).
    Debug,
    /// Interesting events (200).
    Info,
    /// Normal but significant events (250).
    Notice,
    /// Exceptional occurrences that are not errors (300).
    Warning,
    /// Runtime errors (400).
    Error,
    /// Critical conditions (500).
    Critical,
    /// Action must be taken immediately (550).
    Alert,
    /// System is unusable (600).
    Emergency,
}

/// Severity table: numeric severity to canonical level.
const SEVERITIES: [(u16, Level); 8] = [
    (100, Level::Debug),
    (200, Level::Info),
    (250, Level::Notice),
    (300, Level::Warning),
    (400, Level::Error),
    (500, Level::Critical),
    (550, Level::Alert),
    (600, Level::Emergency),
];

/// Historical level names accepted for backwards compatibility.
const LEGACY_LEVELS: [(&str, Level); 5] = [
    ("OFF", Level::Off),
    ("INFO", Level::Info),
    ("NOTICE", Level::Notice),
    ("WARNING", Level::Warning),
    ("ERROR", Level::Error),
];

impl Level {
    /// Every real level in ascending severity order.
    pub const ALL: [Self; 8] = [
        Self::Debug,
        Self::Info,
        Self::Notice,
        Self::Warning,
        Self::Error,
        Self::Critical,
        Self::Alert,
        Self::Emergency,
    ];

    /// Returns the numeric severity, or `None` for [`Level::Off`].
    pub const fn severity(self) -> Option<u16> {
        match self {
            Self::Off => None,
            Self::Debug => Some(100),
            Self::Info => Some(200),
            Self::Notice => Some(250),
            Self::Warning => Some(300),
            Self::Error => Some(400),
            Self::Critical => Some(500),
            Self::Alert => Some(550),
            Self::Emergency => Some(600),
        }
    }

    /// Returns the canonical lowercase name, or `None` for [`Level::Off`].
    pub const fn name(self) -> Option<&'static str> {
        match self {
            Self::Off => None,
            Self::Debug => Some("debug"),
            Self::Info => Some("info"),
            Self::Notice => Some("notice"),
            Self::Warning => Some("warning"),
            Self::Error => Some("error"),
            Self::Critical => Some("critical"),
            Self::Alert => Some("alert"),
            Self::Emergency => Some("emergency"),
        }
    }

    /// Upper-case label used in hook parameters and formatted output.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Off => "OFF",
            Self::Debug => "DEBUG",
            Self::Info => "INFO",
            Self::Notice => "NOTICE",
            Self::Warning => "WARNING",
            Self::Error => "ERROR",
            Self::Critical => "CRITICAL",
            Self::Alert => "ALERT",
            Self::Emergency => "EMERGENCY",
        }
    }

    /// Looks up a level by exact numeric severity.
    pub fn from_severity(severity: i64) -> Option<Self> {
        SEVERITIES
            .iter()
            .find(|(value, _)| i64::from(*value) == severity)
            .map(|(_, level)| *level)
    }

    /// Looks up a level by its canonical (lowercase) name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|level| level.name() == Some(name))
    }

    /// Resolves a legacy alias such as `"WARNING"` or `"OFF"`.
    pub fn from_legacy(name: &str) -> Option<Self> {
        LEGACY_LEVELS
            .iter()
            .find(|(alias, _)| *alias == name)
            .map(|(_, level)| *level)
    }

    /// Returns `true` for the disabled sentinel.
    pub const fn is_off(self) -> bool {
        matches!(self, Self::Off)
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name().unwrap_or("off"))
    }
}

/// Error returned when strict level parsing fails.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
#[error("unrecognised log level '{0}'")]
pub struct LevelParseError(pub String);

impl FromStr for Level {
    type Err = LevelParseError;

    /// Strict parse used by configuration: accepts every representation
    /// [`normalize`] understands plus `off`, but rejects unknown input instead
    /// of degrading it.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.eq_ignore_ascii_case("off") || trimmed == "0" {
            return Ok(Self::Off);
        }
        match normalize(trimmed) {
            Self::Off => Self::from_name(&trimmed.to_ascii_lowercase())
                .ok_or_else(|| LevelParseError(s.to_owned())),
            level => Ok(level),
        }
    }
}

/// Any representation a caller may pass as a level.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LevelInput<'a> {
    /// No level supplied.
    Absent,
    /// Legacy alias, canonical name, or a decimal severity string.
    Name(Cow<'a, str>),
    /// Numeric severity.
    Severity(i64),
    /// Already-resolved level.
    Level(Level),
}

impl<'a> From<&'a str> for LevelInput<'a> {
    fn from(name: &'a str) -> Self {
        Self::Name(Cow::Borrowed(name))
    }
}

impl<'a> From<&'a String> for LevelInput<'a> {
    fn from(name: &'a String) -> Self {
        Self::Name(Cow::Borrowed(name.as_str()))
    }
}

impl From<String> for LevelInput<'_> {
    fn from(name: String) -> Self {
        Self::Name(Cow::Owned(name))
    }
}

impl From<Level> for LevelInput<'_> {
    fn from(level: Level) -> Self {
        Self::Level(level)
    }
}

macro_rules! severity_input {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for LevelInput<'_> {
                fn from(severity: $ty) -> Self {
                    Self::Severity(i64::from(severity))
                }
            }
        )*
    };
}

severity_input!(u16, u32, i32, i64);

impl<'a, T> From<Option<T>> for LevelInput<'a>
where
    T: Into<Self>,
{
    fn from(input: Option<T>) -> Self {
        input.map_or(Self::Absent, Into::into)
    }
}

/// Resolves any accepted level representation to a [`Level`].
///
/// Resolution order: falsy input is `Off`; a legacy alias is translated once;
/// a numeric severity (integer or decimal string) maps to its level; anything
/// that is not then a canonical name is `Off`. Names are case-sensitive, so
/// `"DEBUG"` (not a legacy alias) resolves to `Off`. Never fails.
pub fn normalize<'a>(input: impl Into<LevelInput<'a>>) -> Level {
    match input.into() {
        LevelInput::Absent => Level::Off,
        LevelInput::Level(level) => level,
        LevelInput::Severity(severity) => Level::from_severity(severity).unwrap_or(Level::Off),
        LevelInput::Name(name) => normalize_name(&name),
    }
}

fn normalize_name(name: &str) -> Level {
    if name.is_empty() || name == "0" {
        return Level::Off;
    }

    if let Some(level) = Level::from_legacy(name) {
        return level;
    }

    if let Some(severity) = parse_severity(name) {
        return Level::from_severity(severity).unwrap_or(Level::Off);
    }

    Level::from_name(name).unwrap_or(Level::Off)
}

/// Accepts only the canonical decimal spelling of an integer key.
fn parse_severity(name: &str) -> Option<i64> {
    let value = name.parse::<i64>().ok()?;
    (value.to_string() == name).then_some(value)
}
