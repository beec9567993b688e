//! TCP connect probe.

use std::time::Duration;

use tokio::net::TcpStream;
use tokio::time::timeout;
use tracing::debug;

use crate::ports::PortProbe;

/// Upper bound for a single connection attempt.
const CONNECT_TIMEOUT: Duration = Duration::from_secs(1);

/// Decides whether a port is taken by connecting to it on `localhost`.
///
/// No data is exchanged; the connection is dropped as soon as it is up.
#[derive(Debug, Clone)]
pub struct TcpProbe {
    connect_timeout: Duration,
}

impl TcpProbe {
    pub fn new() -> Self {
        Self {
            connect_timeout: CONNECT_TIMEOUT,
        }
    }

    pub fn with_timeout(connect_timeout: Duration) -> Self {
        Self { connect_timeout }
    }
}

impl Default for TcpProbe {
    fn default() -> Self {
        Self::new()
    }
}

impl PortProbe for TcpProbe {
    async fn is_port_in_use(&self, port: u16) -> bool {
        match timeout(self.connect_timeout, TcpStream::connect(("localhost", port))).await {
            Ok(Ok(_stream)) => {
                debug!(port = port, "Port is in use");
                true
            }
            Ok(Err(e)) => {
                debug!(port = port, error = %e, "Port is free");
                false
            }
            Err(_) => {
                debug!(port = port, "Connection attempt timed out, treating port as free");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::net::TcpListener;

    #[tokio::test]
    async fn test_bound_port_is_in_use() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();

        assert!(TcpProbe::new().is_port_in_use(port).await);
    }

    #[tokio::test]
    async fn test_released_port_is_free() {
        let port = {
            let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
            listener.local_addr().unwrap().port()
        };

        assert!(!TcpProbe::new().is_port_in_use(port).await);
    }
}
