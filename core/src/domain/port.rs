//! Port owner domain model.

use serde::{Deserialize, Serialize};

/// A TCP socket and the process that owns it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PortInfo {
    /// Local port number of the socket.
    pub port: u16,
    /// Process ID of the owning process.
    pub pid: u32,
    /// Name of the owning process as the OS reports it.
    pub process_name: String,
}

impl PortInfo {
    pub fn new(port: u16, pid: u32, process_name: impl Into<String>) -> Self {
        Self {
            port,
            pid,
            process_name: process_name.into(),
        }
    }
}

impl std::fmt::Display for PortInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "port {} (PID: {}, Process: {})",
            self.port, self.pid, self.process_name
        )
    }
}
