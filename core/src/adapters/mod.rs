//! Adapters layer - External system implementations.
//!
//! This module contains implementations of the port traits defined in `ports`,
//! plus the file and process plumbing the controller drives directly.

pub mod config_patch;
pub mod scanner;

mod killer;
mod launcher;
mod pid_file;
mod probe;

// Re-export main types for convenience
pub use killer::ProcessKiller;
pub use launcher::{DevServer, LaunchOutcome, Launcher};
pub use pid_file::PidFile;
pub use probe::TcpProbe;
pub use scanner::PortScanner;
