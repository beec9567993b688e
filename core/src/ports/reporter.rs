//! Status reporter port (interface).

/// Severity of a status line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    Info,
    Success,
    Warning,
    Error,
}

impl Severity {
    /// Marker printed in front of the message.
    pub fn symbol(&self) -> &'static str {
        match self {
            Severity::Info => "ℹ",
            Severity::Success => "✓",
            Severity::Warning => "⚠",
            Severity::Error => "✗",
        }
    }
}

/// Port for user-facing output.
///
/// Operations report progress as severity-tagged lines; the dev server's
/// own output is passed through untouched via [`Reporter::output`].
pub trait Reporter {
    /// Print a status line.
    fn report(&self, severity: Severity, message: &str);

    /// Print a line of child process output verbatim.
    fn output(&self, line: &str);

    fn info(&self, message: &str) {
        self.report(Severity::Info, message);
    }

    fn success(&self, message: &str) {
        self.report(Severity::Success, message);
    }

    fn warning(&self, message: &str) {
        self.report(Severity::Warning, message);
    }

    fn error(&self, message: &str) {
        self.report(Severity::Error, message);
    }
}
