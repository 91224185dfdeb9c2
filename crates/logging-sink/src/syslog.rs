#![allow(unsafe_code)]

//! syslog(3) destination for the error log.
//!
//! Talks to libc's `openlog`/`syslog`/`closelog` directly. Every record is
//! submitted through a `"%s"` format so user text is never interpreted as a
//! format string.

use std::ffi::CString;
use std::sync::OnceLock;

use logging::Level;

/// Ident passed to `openlog(3)`.
pub const SYSLOG_TAG: &str = "elgg";

/// Maps a logger level onto the matching syslog priority.
///
/// `Off` never reaches a handler; it maps to `LOG_DEBUG` for completeness.
pub const fn priority(level: Level) -> libc::c_int {
    match level {
        Level::Emergency => libc::LOG_EMERG,
        Level::Alert => libc::LOG_ALERT,
        Level::Critical => libc::LOG_CRIT,
        Level::Error => libc::LOG_ERR,
        Level::Warning => libc::LOG_WARNING,
        Level::Notice => libc::LOG_NOTICE,
        Level::Info => libc::LOG_INFO,
        Level::Off | Level::Debug => libc::LOG_DEBUG,
    }
}

/// Open connection to the system logger, closed on drop.
#[derive(Debug)]
pub struct SyslogConnection {
    _private: (),
}

impl SyslogConnection {
    /// Opens the connection with the `user` facility and the process id in
    /// every entry.
    pub fn open() -> Self {
        // openlog keeps the ident pointer, so it must live for the process.
        static IDENT: OnceLock<CString> = OnceLock::new();
        let ident = IDENT.get_or_init(|| CString::new(SYSLOG_TAG).unwrap_or_default());

        // SAFETY: `ident` is a valid NUL-terminated string stored in a static.
        unsafe {
            libc::openlog(ident.as_ptr(), libc::LOG_PID, libc::LOG_USER);
        }
        Self { _private: () }
    }

    /// Submits one entry. Text containing NUL bytes is truncated at the first
    /// NUL.
    pub fn send(&self, level: Level, text: &str) {
        let text = text.split('\0').next().unwrap_or_default();
        let Ok(message) = CString::new(text) else {
            return;
        };
        // SAFETY: both pointers are valid C strings for the duration of the call.
        unsafe {
            libc::syslog(priority(level), c"%s".as_ptr(), message.as_ptr());
        }
    }
}

impl Drop for SyslogConnection {
    fn drop(&mut self) {
        // SAFETY: closelog has no preconditions.
        unsafe {
            libc::closelog();
        }
    }
}
