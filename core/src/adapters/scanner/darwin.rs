//! macOS port scanner implementation using lsof.

use std::collections::HashSet;
use std::process::Stdio;

use tokio::process::Command;

use crate::domain::PortInfo;
use crate::error::{Error, Result};

use super::utils::Utils;
use super::Scanner;

/// macOS-specific port scanner using lsof.
pub struct DarwinScanner;

impl DarwinScanner {
    /// Create a new macOS scanner.
    pub fn new() -> Self {
        Self
    }

    /// Parse lsof output into PortInfo objects.
    ///
    /// The NAME column is either `addr:port` or, for connected sockets,
    /// `local->peer`; only the local side is kept.
    fn parse_lsof_output(&self, output: &str) -> Vec<PortInfo> {
        let mut ports = Vec::new();
        let mut seen: HashSet<(u16, u32)> = HashSet::new();

        for line in output.lines().skip(1) {
            if line.is_empty() {
                continue;
            }

            let components: Vec<&str> = line.split_whitespace().collect();
            if components.len() < 9 {
                continue;
            }

            let process_name = components[0].replace("\\x20", " ").replace("\\x2f", "/");

            let pid: u32 = match components[1].parse() {
                Ok(p) => p,
                Err(_) => continue,
            };

            let Some(name) = components[8..]
                .iter()
                .rev()
                .find(|c| c.contains(':') && !c.starts_with("0x") && !c.starts_with("0t"))
            else {
                continue;
            };

            let Some(port) = Utils::parse_port(Utils::local_side(name)) else {
                continue;
            };

            if !seen.insert((port, pid)) {
                continue;
            }

            ports.push(PortInfo::new(port, pid, process_name));
        }

        ports.sort_by_key(|p| (p.port, p.pid));
        ports
    }
}

impl Default for DarwinScanner {
    fn default() -> Self {
        Self::new()
    }
}

impl Scanner for DarwinScanner {
    async fn scan(&self) -> Result<Vec<PortInfo>> {
        let output = Command::new("/usr/sbin/lsof")
            .args(["-iTCP", "-P", "-n", "+c", "0"])
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .output()
            .await
            .map_err(|e| Error::CommandFailed(format!("Failed to run lsof: {}", e)))?;

        let stdout = String::from_utf8(output.stdout)
            .map_err(|e| Error::ParseError(format!("Invalid UTF-8 in lsof output: {}", e)))?;

        Ok(self.parse_lsof_output(&stdout))
    }
}
