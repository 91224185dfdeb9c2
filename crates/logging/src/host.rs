//! crates/logging/src/host.rs
//! Host error-reporting configuration used to derive the default threshold.

use std::fmt;

use crate::levels::Level;

/// Error-reporting bitmask of the hosting environment.
///
/// Bit values match the conventional `E_*` constants so masks copied from an
/// existing configuration keep their meaning.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct ErrorReporting(u32);

impl ErrorReporting {
    /// Fatal runtime errors.
    pub const ERROR: u32 = 1;
    /// Runtime warnings.
    pub const WARNING: u32 = 2;
    /// Runtime notices.
    pub const NOTICE: u32 = 8;
    /// Every reportable condition.
    pub const ALL: u32 = 32767;

    /// Wraps a raw mask.
    pub const fn new(mask: u32) -> Self {
        Self(mask)
    }

    /// Mask with every bit set.
    pub const fn all() -> Self {
        Self(Self::ALL)
    }

    /// Mask with no bit set.
    pub const fn none() -> Self {
        Self(0)
    }

    /// Raw mask value.
    pub const fn bits(self) -> u32 {
        self.0
    }

    /// Reports whether every bit of `flag` is set.
    pub const fn contains(self, flag: u32) -> bool {
        self.0 & flag == flag
    }

    /// Threshold implied by the mask.
    ///
    /// First match wins: notice, then warning, then error, else `Off`.
    pub const fn default_level(self) -> Level {
        if self.contains(Self::NOTICE) {
            Level::Notice
        } else if self.contains(Self::WARNING) {
            Level::Warning
        } else if self.contains(Self::ERROR) {
            Level::Error
        } else {
            Level::Off
        }
    }
}

impl fmt::Display for ErrorReporting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#x}", self.0)
    }
}

/// Read access to the host's current error-reporting configuration.
pub trait HostEnvironment: Send + Sync {
    /// Current error-reporting mask.
    fn error_reporting(&self) -> ErrorReporting;
}

impl HostEnvironment for ErrorReporting {
    fn error_reporting(&self) -> ErrorReporting {
        *self
    }
}
