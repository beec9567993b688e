//! PID file persistence.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tokio::fs;
use tracing::debug;

use crate::error::{Error, Result};

/// A file holding the decimal PID of the launched dev server.
#[derive(Debug, Clone)]
pub struct PidFile {
    path: PathBuf,
}

impl PidFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Record `pid`, replacing any previous record.
    pub async fn write(&self, pid: u32) -> Result<()> {
        debug!(pid = pid, path = %self.path.display(), "Writing PID file");
        fs::write(&self.path, pid.to_string()).await?;
        Ok(())
    }

    /// Read the recorded PID. Surrounding whitespace is ignored.
    pub async fn read(&self) -> Result<u32> {
        let content = fs::read_to_string(&self.path).await?;
        content.trim().parse().map_err(|_| Error::InvalidPidFile {
            path: self.path.clone(),
            content: content.trim().to_string(),
        })
    }

    /// Delete the record. A missing file is not an error.
    pub async fn remove(&self) -> Result<()> {
        match fs::remove_file(&self.path).await {
            Ok(()) => {
                debug!(path = %self.path.display(), "Removed PID file");
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_write_read_remove() {
        let dir = tempdir().unwrap();
        let pid_file = PidFile::new(dir.path().join(".server.pid"));

        assert!(!pid_file.exists());
        pid_file.write(4242).await.unwrap();
        assert!(pid_file.exists());
        assert_eq!(pid_file.read().await.unwrap(), 4242);

        pid_file.remove().await.unwrap();
        assert!(!pid_file.exists());

        // Removing twice is fine
        pid_file.remove().await.unwrap();
    }

    #[tokio::test]
    async fn test_read_tolerates_trailing_newline() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(".server.pid");
        std::fs::write(&path, "1234\n").unwrap();

        assert_eq!(PidFile::new(&path).read().await.unwrap(), 1234);
    }

    #[tokio::test]
    async fn test_read_invalid_content() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(".server.pid");
        std::fs::write(&path, "not-a-pid").unwrap();

        let err = PidFile::new(&path).read().await.unwrap_err();
        assert!(matches!(err, Error::InvalidPidFile { ref content, .. } if content == "not-a-pid"));
    }
}
