//! devport Core Library
//!
//! Lifecycle management for a single local development server.
//! Provides functionality to:
//! - Probe a fixed port range for a free TCP port
//! - Patch the dev server's config file with the chosen port
//! - Launch the server, stream its output and record its PID
//! - Stop it again (PID file first, then a sweep of the port range)
//!
//! # Architecture
//! This library follows hexagonal architecture (ports & adapters):
//! - `domain`: Pure data models (project identity, commands, port owners)
//! - `ports`: Trait definitions (interfaces)
//! - `adapters`: External system implementations
//! - `application`: Use case services
//!
//! # Platform Support
//! - Linux: Uses `ss` to resolve socket owners
//! - macOS: Uses `lsof`
//! - Signals are delivered through `nix` on both

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod error;
pub mod ports;

// Re-export domain types (primary API)
pub use domain::{LifecycleCommand, PortInfo, PortRange, ProjectConfig};

// Re-export other commonly used types
pub use adapters::{Launcher, PidFile, PortScanner, ProcessKiller, TcpProbe};
pub use application::{PortService, ProjectController};
pub use config::ConfigStore;
pub use error::{Error, KillError, Result};
pub use ports::{PortProbe, PortScannerPort, ProcessKillerPort, Reporter, Severity, Termination};
