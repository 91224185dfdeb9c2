/// Controls whether a [`StreamHandler`](crate::StreamHandler) terminates each
/// formatted record.
///
/// Syslog entries are framed by the system logger and never take a
/// terminator; stream destinations default to one record per line.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum LineMode {
    /// Terminate each record with `\n`.
    #[default]
    WithNewline,
    /// Write records back to back.
    WithoutNewline,
}

impl LineMode {
    /// Reports whether records are terminated.
    ///
    /// ```
    /// use logging_sink::LineMode;
    ///
    /// assert!(LineMode::WithNewline.append_newline());
    /// assert!(!LineMode::WithoutNewline.append_newline());
    /// ```
    #[must_use]
    pub const fn append_newline(self) -> bool {
        matches!(self, Self::WithNewline)
    }

    /// Bytes written after each record.
    pub const fn terminator(self) -> &'static str {
        if self.append_newline() { "\n" } else { "" }
    }
}

#[cfg(test)]
mod tests {
    use super::LineMode;

    #[test]
    fn terminator_follows_mode() {
        assert_eq!(LineMode::default().terminator(), "\n");
        assert_eq!(LineMode::WithoutNewline.terminator(), "");
    }
}
