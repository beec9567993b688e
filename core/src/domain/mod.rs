//! Domain layer - Pure data models.
//!
//! This module contains domain entities that represent core concepts.
//! These types have no I/O dependencies and can be tested in isolation.

mod command;
mod port;
mod project;

// Re-export all domain types
pub use command::LifecycleCommand;
pub use port::PortInfo;
pub use project::{PortRange, ProjectConfig};
