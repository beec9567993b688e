//! Project configuration loading.
//!
//! Settings live in an optional `devport.json` next to the project. Every
//! key is optional; missing keys keep the defaults from [`ProjectConfig::new`].

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tokio::fs;
use tracing::debug;

use crate::domain::{PortRange, ProjectConfig};
use crate::error::{Error, Result};

/// File name looked up inside the project directory.
pub const CONFIG_FILE_NAME: &str = "devport.json";

/// Configuration data stored in JSON format.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigFile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port_range: Option<PortRange>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_port: Option<u16>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_type: Option<String>,

    /// File whose `port:` field is rewritten, relative to the project.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config_file: Option<PathBuf>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pid_file: Option<PathBuf>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub install_marker: Option<PathBuf>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub install_command: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dev_command: Option<Vec<String>>,
}

impl ConfigFile {
    /// Overlay the values present in this file onto `project`.
    pub fn apply(self, project: &mut ProjectConfig) {
        if let Some(name) = self.name {
            project.name = name;
        }
        if let Some(range) = self.port_range {
            project.port_range = range;
        }
        if let Some(port) = self.default_port {
            project.default_port = port;
        }
        if let Some(project_type) = self.project_type {
            project.project_type = project_type;
        }
        if let Some(path) = self.config_file {
            project.config_file = path;
        }
        if let Some(path) = self.pid_file {
            project.pid_file = path;
        }
        if let Some(path) = self.install_marker {
            project.install_marker = path;
        }
        if let Some(argv) = self.install_command {
            project.install_command = argv;
        }
        if let Some(argv) = self.dev_command {
            project.dev_command = argv;
        }
    }
}

/// Loads the [`ProjectConfig`] for a project directory.
pub struct ConfigStore {
    /// Project directory.
    project_dir: PathBuf,
    /// Path to the configuration file.
    config_path: PathBuf,
}

impl ConfigStore {
    /// Create a store reading `<project_dir>/devport.json`.
    pub fn new(project_dir: impl Into<PathBuf>) -> Self {
        let project_dir = project_dir.into();
        let config_path = project_dir.join(CONFIG_FILE_NAME);
        Self {
            project_dir,
            config_path,
        }
    }

    /// Create a store with a custom config file location.
    pub fn with_path(project_dir: impl Into<PathBuf>, config_path: PathBuf) -> Self {
        Self {
            project_dir: project_dir.into(),
            config_path,
        }
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    /// Read the raw config file. Returns an empty overlay if it doesn't exist.
    pub async fn load_file(&self) -> Result<ConfigFile> {
        if !self.config_path.exists() {
            debug!(path = %self.config_path.display(), "No project config file, using defaults");
            return Ok(ConfigFile::default());
        }

        let content = fs::read_to_string(&self.config_path)
            .await
            .map_err(|e| Error::Config(format!("Failed to read config: {}", e)))?;

        serde_json::from_str(&content)
            .map_err(|e| Error::Config(format!("Failed to parse config: {}", e)))
    }

    /// Build and validate the project configuration.
    pub async fn load(&self) -> Result<ProjectConfig> {
        let mut project = ProjectConfig::new(&self.project_dir);
        self.load_file().await?.apply(&mut project);
        project.validate()?;

        debug!(
            name = %project.name,
            range = %project.port_range,
            default_port = project.default_port,
            "Loaded project config"
        );
        Ok(project)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_load_nonexistent() {
        let dir = tempdir().unwrap();
        let project = ConfigStore::new(dir.path()).load().await.unwrap();

        assert_eq!(project, ProjectConfig::new(dir.path()));
        assert_eq!(project.port_range, PortRange::new(3130, 3139));
    }

    #[tokio::test]
    async fn test_overrides() {
        let dir = tempdir().unwrap();
        std::fs::write(
            dir.path().join(CONFIG_FILE_NAME),
            r#"{
                "name": "card_template",
                "portRange": { "start": 4000, "end": 4009 },
                "defaultPort": 4000,
                "configFile": "web/vite.config.ts",
                "devCommand": ["pnpm", "dev"]
            }"#,
        )
        .unwrap();

        let project = ConfigStore::new(dir.path()).load().await.unwrap();
        assert_eq!(project.name, "card_template");
        assert_eq!(project.port_range, PortRange::new(4000, 4009));
        assert_eq!(project.default_port, 4000);
        assert_eq!(project.config_path(), dir.path().join("web/vite.config.ts"));
        assert_eq!(project.dev_command, vec!["pnpm", "dev"]);
        // Untouched keys keep their defaults
        assert_eq!(project.install_command, vec!["npm", "install"]);
        assert_eq!(project.pid_path(), dir.path().join(".server.pid"));
    }

    #[tokio::test]
    async fn test_default_port_outside_range() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE_NAME), r#"{ "defaultPort": 8080 }"#).unwrap();

        let result = ConfigStore::new(dir.path()).load().await;
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[tokio::test]
    async fn test_malformed_json() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("custom.json");
        std::fs::write(&path, "{ not json").unwrap();

        let store = ConfigStore::with_path(dir.path(), path);
        let err = store.load().await.unwrap_err();
        assert!(err.to_string().contains("Failed to parse config"));
    }
}
