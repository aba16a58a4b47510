//! Status lines on stderr.

use std::fmt::Display;

use console::{Term, style};

/// Writes build status to stderr, colored when stderr is a terminal.
pub(crate) struct Output {
    term: Term,
}

impl Output {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self {
            term: Term::stderr(),
        }
    }

    /// Plain progress line.
    pub(crate) fn info(&self, msg: &str) {
        self.line(msg);
    }

    /// Build summary, in green.
    pub(crate) fn success(&self, msg: &str) {
        self.line(style(msg).green().for_stderr());
    }

    /// Fatal error, in red.
    pub(crate) fn error(&self, msg: &str) {
        self.line(style(msg).red().for_stderr());
    }

    fn line(&self, text: impl Display) {
        // Write errors on stderr are ignored.
        let _ = self.term.write_line(&text.to_string());
    }
}
