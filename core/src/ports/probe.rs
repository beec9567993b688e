//! Port probe port (interface).

/// Port for checking whether something is listening on a TCP port.
pub trait PortProbe: Send + Sync {
    /// Returns `true` if a connection to `localhost:port` can be established.
    ///
    /// Any failure (refused, timed out, unreachable) means the port is free.
    fn is_port_in_use(&self, port: u16) -> impl std::future::Future<Output = bool> + Send;
}
