//! Rewrites the `port: <n>` field of the dev server's config file.
//!
//! This is plain text substitution; the file is never parsed.

use std::path::Path;

use regex::{NoExpand, Regex};
use tokio::fs;
use tracing::debug;

use crate::error::Result;

const PORT_PATTERN: &str = r"port:\s*\d+";

/// What [`patch_port`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatchOutcome {
    /// No config file; nothing to do.
    MissingFile,
    /// File rewritten; number of port fields replaced.
    Patched { replacements: usize },
}

/// Replace every `port: <n>` in `content` with `port: <port>`.
pub fn replace_port(content: &str, port: u16) -> Result<(String, usize)> {
    let regex = Regex::new(PORT_PATTERN)?;
    let replacements = regex.find_iter(content).count();
    let replacement = format!("port: {}", port);
    let patched = regex.replace_all(content, NoExpand(&replacement));
    Ok((patched.into_owned(), replacements))
}

/// Rewrite the port fields of the file at `path` in place.
pub async fn patch_port(path: &Path, port: u16) -> Result<PatchOutcome> {
    if !path.exists() {
        debug!(path = %path.display(), "Config file not found, skipping port update");
        return Ok(PatchOutcome::MissingFile);
    }

    let content = fs::read_to_string(path).await?;
    let (patched, replacements) = replace_port(&content, port)?;
    fs::write(path, patched).await?;

    debug!(path = %path.display(), port = port, replacements = replacements, "Updated config port");
    Ok(PatchOutcome::Patched { replacements })
}
