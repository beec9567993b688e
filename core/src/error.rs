//! Error types for the devport-core library.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for devport operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while managing the development server.
#[derive(Error, Debug)]
pub enum Error {
    /// Failed to execute a system command.
    #[error("Command execution failed: {0}")]
    CommandFailed(String),

    /// Failed to parse command output.
    #[error("Failed to parse output: {0}")]
    ParseError(String),

    /// Every port in the configured range is taken.
    #[error("No available ports in range {start}-{end}")]
    NoAvailablePorts { start: u16, end: u16 },

    /// The PID file exists but does not hold a process identifier.
    #[error("Invalid PID file {}: {content:?}", path.display())]
    InvalidPidFile { path: PathBuf, content: String },

    /// Lifecycle command name not recognised.
    #[error("Unknown command: {0}")]
    UnknownCommand(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid port pattern.
    #[error("Pattern error: {0}")]
    Pattern(#[from] regex::Error),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Errors that can occur while terminating a process.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum KillError {
    /// The specified process was not found.
    #[error("Process with PID {0} not found")]
    ProcessNotFound(u32),

    /// Permission denied to signal the process.
    #[error("Permission denied to kill process {0}")]
    PermissionDenied(u32),

    /// The PID cannot name a single process (zero or out of range).
    #[error("Invalid PID {0}")]
    InvalidPid(u32),

    /// The signal could not be delivered.
    #[error("Failed to signal process {pid}: {reason}")]
    Signal { pid: u32, reason: String },
}
