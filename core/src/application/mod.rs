//! Application layer - Use case services.
//!
//! This module contains application services that orchestrate
//! domain logic and adapter interactions.
//!
//! Services are designed to be thin orchestrators that:
//! - Accept domain types as inputs
//! - Use ports (traits) for external dependencies
//! - Report progress through a [`crate::ports::Reporter`]

mod controller;
mod port_service;

pub use controller::ProjectController;
pub use port_service::PortService;
