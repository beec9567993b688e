//! Process killer port (interface).

use std::time::Duration;

use crate::error::KillError;

/// How a terminated process went away.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    /// Exited within the grace period after SIGTERM.
    Graceful,
    /// Still alive when the grace period ran out; SIGKILL was sent.
    Forced,
}

/// Port for killing processes.
///
/// This trait defines the interface for process termination.
/// Implementations handle platform-specific signal handling.
pub trait ProcessKillerPort: Send + Sync {
    /// Send SIGTERM, wait up to `timeout` for the process to exit, then SIGKILL.
    fn terminate(
        &self,
        pid: u32,
        timeout: Duration,
    ) -> impl std::future::Future<Output = Result<Termination, KillError>> + Send;

    /// Send SIGKILL immediately.
    fn kill(&self, pid: u32) -> impl std::future::Future<Output = Result<(), KillError>> + Send;

    /// Check if a process is still running.
    fn is_running(&self, pid: u32) -> bool;
}
