//! Terminal reporter: colored status lines on stdout.

use crossterm::style::Stylize;
use devport_core::{Reporter, Severity};

/// Prints status lines as `<symbol> <message>`, colored when stdout is a TTY.
#[derive(Debug, Clone, Copy)]
pub struct ConsoleReporter {
    color: bool,
}

impl ConsoleReporter {
    /// Color output only when stdout is a terminal.
    pub fn detect() -> Self {
        Self {
            color: atty::is(atty::Stream::Stdout),
        }
    }

    fn symbol(&self, severity: Severity) -> String {
        let symbol = severity.symbol();
        if !self.color {
            return symbol.to_string();
        }
        match severity {
            Severity::Info => symbol.blue().to_string(),
            Severity::Success => symbol.green().to_string(),
            Severity::Warning => symbol.yellow().to_string(),
            Severity::Error => symbol.red().to_string(),
        }
    }
}

impl Reporter for ConsoleReporter {
    fn report(&self, severity: Severity, message: &str) {
        println!("{} {}", self.symbol(severity), message);
    }

    fn output(&self, line: &str) {
        println!("{}", line);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_symbols() {
        let reporter = ConsoleReporter { color: false };
        assert_eq!(reporter.symbol(Severity::Success), "✓");
        assert_eq!(reporter.symbol(Severity::Error), "✗");
    }

    #[test]
    fn test_colored_symbols_keep_marker() {
        let reporter = ConsoleReporter { color: true };
        assert!(reporter.symbol(Severity::Warning).contains('⚠'));
        assert!(reporter.symbol(Severity::Info).contains('ℹ'));
    }
}
