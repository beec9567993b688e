//! Ports layer - Trait definitions (interfaces).
//!
//! This module defines the interfaces that the application layer uses
//! to interact with external systems. Implementations live in `adapters`.

mod killer;
mod probe;
mod reporter;
mod scanner;

pub use killer::{ProcessKillerPort, Termination};
pub use probe::PortProbe;
pub use reporter::{Reporter, Severity};
pub use scanner::PortScannerPort;
