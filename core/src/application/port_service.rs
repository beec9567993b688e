//! Port availability and ownership service.

use tracing::{debug, warn};

use crate::domain::{PortInfo, PortRange};
use crate::ports::{PortProbe, PortScannerPort};

/// Application service for port lookups.
///
/// It uses the `PortProbe` and `PortScannerPort` traits for the actual
/// system calls, allowing different implementations to be injected.
pub struct PortService<P: PortProbe, S: PortScannerPort> {
    probe: P,
    scanner: S,
}

impl<P: PortProbe, S: PortScannerPort> PortService<P, S> {
    /// Create a new port service.
    pub fn new(probe: P, scanner: S) -> Self {
        Self { probe, scanner }
    }

    pub fn scanner(&self) -> &S {
        &self.scanner
    }

    /// Whether something accepts connections on `port`.
    pub async fn is_port_in_use(&self, port: u16) -> bool {
        self.probe.is_port_in_use(port).await
    }

    /// First free port in `range`, scanning upwards. `None` when all are taken.
    pub async fn find_available_port(&self, range: PortRange) -> Option<u16> {
        for port in range.iter() {
            if !self.probe.is_port_in_use(port).await {
                return Some(port);
            }
        }
        debug!(range = %range, "Every port in range is in use");
        None
    }

    /// First process with a socket whose local port is `port`.
    ///
    /// Lookup failures are logged and treated as "no owner".
    pub async fn find_process_by_port(&self, port: u16) -> Option<PortInfo> {
        match self.scanner.scan().await {
            Ok(sockets) => sockets.into_iter().find(|p| p.port == port),
            Err(e) => {
                warn!(port = port, error = %e, "Failed to look up port owner");
                None
            }
        }
    }

    /// The owner [`find_process_by_port`](Self::find_process_by_port) would
    /// return for each port in `range`, from a single scan, lowest port first.
    pub async fn find_processes_in_range(&self, range: PortRange) -> Vec<PortInfo> {
        let sockets = match self.scanner.scan().await {
            Ok(sockets) => sockets,
            Err(e) => {
                warn!(range = %range, error = %e, "Failed to look up port owners");
                return Vec::new();
            }
        };

        range
            .iter()
            .filter_map(|port| sockets.iter().find(|p| p.port == port).cloned())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use crate::error::{Error, Result};

    /// Probe that reports a fixed set of ports as taken.
    struct MockProbe {
        busy: HashSet<u16>,
    }

    impl MockProbe {
        fn busy(ports: impl IntoIterator<Item = u16>) -> Self {
            Self {
                busy: ports.into_iter().collect(),
            }
        }
    }

    impl PortProbe for MockProbe {
        async fn is_port_in_use(&self, port: u16) -> bool {
            self.busy.contains(&port)
        }
    }

    /// Mock scanner for testing.
    #[derive(Default)]
    struct MockScanner {
        ports: Vec<PortInfo>,
        fail: bool,
        scans: AtomicUsize,
    }

    impl PortScannerPort for MockScanner {
        async fn scan(&self) -> Result<Vec<PortInfo>> {
            self.scans.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(Error::CommandFailed("ss missing".to_string()));
            }
            Ok(self.ports.clone())
        }
    }

    fn service(busy: impl IntoIterator<Item = u16>) -> PortService<MockProbe, MockScanner> {
        PortService::new(
            MockProbe::busy(busy),
            MockScanner::default(),
        )
    }

    #[tokio::test]
    async fn test_first_free_port_wins() {
        let range = PortRange::new(3130, 3139);
        assert_eq!(service(None).find_available_port(range).await, Some(3130));
        assert_eq!(service([3130, 3131]).find_available_port(range).await, Some(3132));
    }

    #[tokio::test]
    async fn test_all_ports_taken() {
        let range = PortRange::new(3130, 3139);
        assert_eq!(service(range.iter()).find_available_port(range).await, None);
    }

    #[tokio::test]
    async fn test_only_one_port_free() {
        let range = PortRange::new(3130, 3139);
        let busy = range.iter().filter(|p| *p != 3137);
        assert_eq!(service(busy).find_available_port(range).await, Some(3137));
    }

    #[tokio::test]
    async fn test_find_process_by_port() {
        let service = PortService::new(
            MockProbe::busy(None),
            MockScanner {
                ports: vec![
                    PortInfo::new(3130, 100, "node"),
                    PortInfo::new(3130, 200, "node"),
                    PortInfo::new(5432, 300, "postgres"),
                ],
                ..Default::default()
            },
        );

        let found = service.find_process_by_port(3130).await.unwrap();
        assert_eq!(found.pid, 100);
        assert!(service.find_process_by_port(3131).await.is_none());
    }

    #[tokio::test]
    async fn test_scan_failure_means_not_found() {
        let service = PortService::new(
            MockProbe::busy(None),
            MockScanner {
                fail: true,
                ..Default::default()
            },
        );
        assert!(service.find_process_by_port(3130).await.is_none());
        assert!(service
            .find_processes_in_range(PortRange::new(3130, 3139))
            .await
            .is_empty());
    }

    #[tokio::test]
    async fn test_find_processes_in_range_scans_once() {
        let service = PortService::new(
            MockProbe::busy(None),
            MockScanner {
                ports: vec![
                    PortInfo::new(80, 1, "nginx"),
                    PortInfo::new(3131, 100, "node"),
                    PortInfo::new(3131, 200, "node"),
                    PortInfo::new(3138, 300, "python"),
                    PortInfo::new(3140, 400, "node"),
                ],
                ..Default::default()
            },
        );

        let owners = service
            .find_processes_in_range(PortRange::new(3130, 3139))
            .await;
        assert_eq!(
            owners,
            vec![PortInfo::new(3131, 100, "node"), PortInfo::new(3138, 300, "python")]
        );
        assert_eq!(service.scanner().scans.load(Ordering::SeqCst), 1);
    }
}
