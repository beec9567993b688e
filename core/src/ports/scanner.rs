//! Port scanner port (interface).

use crate::domain::PortInfo;
use crate::error::Result;

/// Port for resolving which processes own TCP sockets.
///
/// This trait defines the interface for socket owner lookup.
/// Implementations handle platform-specific details (ss, lsof, etc.)
pub trait PortScannerPort: Send + Sync {
    /// Scan all TCP sockets that have a visible owning process.
    ///
    /// Sockets owned by processes we may not inspect are left out.
    fn scan(&self) -> impl std::future::Future<Output = Result<Vec<PortInfo>>> + Send;
}
