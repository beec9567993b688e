//! Linux port scanner implementation using ss.

use std::collections::HashSet;
use std::process::Stdio;

use regex::Regex;
use tokio::process::Command;

use crate::domain::PortInfo;
use crate::error::{Error, Result};

use super::utils::Utils;
use super::Scanner;

/// Linux-specific port scanner.
pub struct LinuxScanner;

impl LinuxScanner {
    pub fn new() -> Self {
        Self
    }

    /// Parse ss output into PortInfo objects.
    ///
    /// Expected ss output format:
    /// ```text
    /// LISTEN  0  511        [::1]:3130             [::]:*      users:(("node",pid=4242,fd=21))
    /// ESTAB   0  0      127.0.0.1:3130  127.0.0.1:52100      users:(("node",pid=4242,fd=23))
    /// TIME-WAIT 0 0     127.0.0.1:3131  127.0.0.1:52102
    /// ```
    /// Rows without a process column are sockets we may not inspect, or that
    /// belong to no process anymore; they are skipped.
    fn parse_ss_output(&self, output: &str) -> Result<Vec<PortInfo>> {
        let mut ports = Vec::new();
        let mut seen: HashSet<(u16, u32)> = HashSet::new();

        let regex = Regex::new(r#"users:\(\("(.+?)",pid=(\d+),"#)?;

        for line in output.lines() {
            if line.is_empty() {
                continue;
            }

            // [State] [Recv-Q] [Send-Q] [Local Address:Port] [Peer Address:Port] [Process]
            let components: Vec<&str> = line.split_whitespace().collect();
            if components.len() < 6 {
                continue;
            }

            let process_column = components[5..].join(" ");
            let Some(caps) = regex.captures(&process_column) else {
                continue;
            };

            let process_name = caps[1].to_string();
            let pid: u32 = match caps[2].parse() {
                Ok(p) => p,
                Err(_) => continue,
            };

            let Some(port) = Utils::parse_port(components[3]) else {
                continue;
            };

            if !seen.insert((port, pid)) {
                continue;
            }

            ports.push(PortInfo::new(port, pid, process_name));
        }

        ports.sort_by_key(|p| (p.port, p.pid));
        Ok(ports)
    }
}

impl Default for LinuxScanner {
    fn default() -> Self {
        Self::new()
    }
}

impl Scanner for LinuxScanner {
    /// Scan all TCP sockets with their owning processes.
    ///
    /// Executes: `ss -Htanp`
    ///
    /// Flags explained:
    /// -H, --no-header     Suppress header line
    /// -t, --tcp           display only TCP sockets
    /// -a, --all           display listening and connected sockets
    /// -n, --numeric       don't resolve service names
    /// -p, --processes     show process using socket
    async fn scan(&self) -> Result<Vec<PortInfo>> {
        let output = Command::new("ss")
            .args(["-Htanp"])
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .output()
            .await
            .map_err(|e| Error::CommandFailed(format!("Failed to run ss: {}", e)))?;

        let stdout = String::from_utf8(output.stdout)
            .map_err(|e| Error::ParseError(format!("Invalid UTF-8 in ss output: {}", e)))?;

        self.parse_ss_output(&stdout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_ss_output() {
        let scanner = LinuxScanner::new();

        let output = r#"LISTEN 0 511 [::1]:3130 [::]:* users:(("node",pid=4242,fd=21))
LISTEN 0 4096 0.0.0.0:80 0.0.0.0:* users:(("nginx",pid=55316,fd=6))
ESTAB 0 0 127.0.0.1:52100 127.0.0.1:3130 users:(("curl",pid=999,fd=3))"#;

        let ports = scanner.parse_ss_output(output).unwrap();
        assert_eq!(ports.len(), 3);

        // Sorted by port number
        assert_eq!(ports[0].port, 80);
        assert_eq!(ports[0].process_name, "nginx");

        assert_eq!(ports[1], PortInfo::new(3130, 4242, "node"));

        // Connected sockets are keyed by their local side
        assert_eq!(ports[2], PortInfo::new(52100, 999, "curl"));
    }

    #[test]
    fn test_skips_rows_without_owner() {
        let scanner = LinuxScanner::new();
        let output = "TIME-WAIT 0 0 127.0.0.1:3131 127.0.0.1:52102\n";
        let ports = scanner.parse_ss_output(output).unwrap();
        assert!(ports.is_empty());
    }

    #[test]
    fn test_deduplication() {
        let scanner = LinuxScanner::new();

        // Same port and PID on two address families
        let output = r#"LISTEN 0 511 127.0.0.1:3130 0.0.0.0:* users:(("node",pid=4242,fd=21))
LISTEN 0 511 [::1]:3130 [::]:* users:(("node",pid=4242,fd=22))
ESTAB 0 0 127.0.0.1:3130 127.0.0.1:52100 users:(("node",pid=4242,fd=23))"#;

        let ports = scanner.parse_ss_output(output).unwrap();
        assert_eq!(ports, vec![PortInfo::new(3130, 4242, "node")]);
    }

    #[test]
    fn test_process_name_with_spaces() {
        let scanner = LinuxScanner::new();
        let output =
            r#"LISTEN 0 128 127.0.0.1:3135 0.0.0.0:* users:(("Web Content",pid=77,fd=9))"#;
        let ports = scanner.parse_ss_output(output).unwrap();
        assert_eq!(ports.len(), 1);
        assert_eq!(ports[0].process_name, "Web Content");
    }
}
