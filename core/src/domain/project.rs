//! Project identity: where the dev server lives and which ports it may use.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Default inclusive port range for the development server.
pub const DEFAULT_PORT_RANGE: PortRange = PortRange::new(3130, 3139);

/// Port the server prefers when it is free.
pub const DEFAULT_PORT: u16 = 3130;

// ============================================================================
// PortRange
// ============================================================================

/// An inclusive range of TCP ports, scanned in ascending order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PortRange {
    pub start: u16,
    pub end: u16,
}

impl PortRange {
    pub const fn new(start: u16, end: u16) -> Self {
        Self { start, end }
    }

    /// Iterate over every port in the range, lowest first.
    pub fn iter(&self) -> std::ops::RangeInclusive<u16> {
        self.start..=self.end
    }

    pub fn contains(&self, port: u16) -> bool {
        (self.start..=self.end).contains(&port)
    }

    pub fn is_empty(&self) -> bool {
        self.start > self.end
    }
}

impl std::fmt::Display for PortRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

// ============================================================================
// ProjectConfig
// ============================================================================

/// Fixed description of the managed project.
///
/// Built once at startup (see [`crate::config::ConfigStore`]) and handed to
/// every operation; nothing mutates it afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectConfig {
    /// Display name used in status lines.
    pub name: String,
    /// Absolute project directory; child processes run here.
    pub dir: PathBuf,
    /// Ports the server may bind, scanned lowest first.
    pub port_range: PortRange,
    /// Preferred port. Picking any other port emits a warning.
    pub default_port: u16,
    /// Free-form label, e.g. `vite-react`.
    pub project_type: String,
    /// Text file whose `port: <n>` tokens are rewritten on start.
    pub config_file: PathBuf,
    /// File holding the PID of the launched server.
    pub pid_file: PathBuf,
    /// Directory whose absence triggers the install step.
    pub install_marker: PathBuf,
    /// Install step argv.
    pub install_command: Vec<String>,
    /// Dev server argv.
    pub dev_command: Vec<String>,
}

impl ProjectConfig {
    /// Create a config for a Vite project in `dir` with default settings.
    ///
    /// The name is taken from the last component of `dir`.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();
        let name = dir
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "project".to_string());

        Self {
            name,
            dir,
            port_range: DEFAULT_PORT_RANGE,
            default_port: DEFAULT_PORT,
            project_type: "vite-react".to_string(),
            config_file: PathBuf::from("vite.config.ts"),
            pid_file: PathBuf::from(".server.pid"),
            install_marker: PathBuf::from("node_modules"),
            install_command: vec!["npm".to_string(), "install".to_string()],
            dev_command: vec!["npm".to_string(), "run".to_string(), "dev".to_string()],
        }
    }

    /// Check the invariants the controller relies on.
    pub fn validate(&self) -> Result<()> {
        if self.port_range.is_empty() {
            return Err(Error::Config(format!(
                "Port range {} is empty",
                self.port_range
            )));
        }
        if !self.port_range.contains(self.default_port) {
            return Err(Error::Config(format!(
                "Default port {} is outside the range {}",
                self.default_port, self.port_range
            )));
        }
        if self.install_command.is_empty() {
            return Err(Error::Config("Install command is empty".to_string()));
        }
        if self.dev_command.is_empty() {
            return Err(Error::Config("Dev command is empty".to_string()));
        }
        Ok(())
    }

    pub fn config_path(&self) -> PathBuf {
        self.resolve(&self.config_file)
    }

    pub fn pid_path(&self) -> PathBuf {
        self.resolve(&self.pid_file)
    }

    pub fn install_marker_path(&self) -> PathBuf {
        self.resolve(&self.install_marker)
    }

    /// Browser URL for the server on `port`.
    pub fn url(&self, port: u16) -> String {
        format!("http://localhost:{}", port)
    }

    fn resolve(&self, relative: &Path) -> PathBuf {
        self.dir.join(relative)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_port_range_iterates_ascending() {
        let range = PortRange::new(3130, 3133);
        let ports: Vec<u16> = range.iter().collect();
        assert_eq!(ports, vec![3130, 3131, 3132, 3133]);
        assert!(range.contains(3133));
        assert!(!range.contains(3134));
        assert_eq!(range.to_string(), "3130-3133");
    }

    #[test]
    fn test_defaults() {
        let project = ProjectConfig::new("/work/card_template");
        assert_eq!(project.name, "card_template");
        assert_eq!(project.port_range, PortRange::new(3130, 3139));
        assert_eq!(project.default_port, 3130);
        assert_eq!(project.pid_path(), PathBuf::from("/work/card_template/.server.pid"));
        assert_eq!(
            project.config_path(),
            PathBuf::from("/work/card_template/vite.config.ts")
        );
        assert_eq!(project.url(3131), "http://localhost:3131");
        assert!(project.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_default_outside_range() {
        let mut project = ProjectConfig::new("/work/app");
        project.default_port = 8080;
        assert!(matches!(project.validate(), Err(Error::Config(_))));

        let mut project = ProjectConfig::new("/work/app");
        project.port_range = PortRange::new(3139, 3130);
        assert!(matches!(project.validate(), Err(Error::Config(_))));
    }

    #[test]
    fn test_validate_rejects_empty_commands() {
        let mut project = ProjectConfig::new("/work/app");
        project.dev_command.clear();
        assert!(project.validate().is_err());
    }
}
