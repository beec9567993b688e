//! Child process plumbing for the install step and the dev server.

use std::fs::File;
use std::future::Future;
use std::os::fd::OwnedFd;
use std::process::{ExitStatus, Stdio};

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::net::unix::pipe;
use tokio::process::{Child, Command};
use tracing::debug;

use crate::domain::ProjectConfig;
use crate::error::{Error, Result};
use crate::ports::Reporter;

/// How the streaming phase of a launch ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LaunchOutcome {
    /// The server exited with this status.
    Exited(ExitStatus),
    /// The interrupt fired while the server was still running.
    Interrupted,
}

/// A running dev server and the read end of its output.
///
/// stdout and stderr share one pipe, so lines arrive in the order the
/// server wrote them.
pub struct DevServer {
    child: Child,
    output: Option<pipe::Receiver>,
}

impl DevServer {
    /// OS process id, `None` once the child has been reaped.
    pub fn id(&self) -> Option<u32> {
        self.child.id()
    }

    pub fn child_mut(&mut self) -> &mut Child {
        &mut self.child
    }
}

/// Spawns project commands in the project directory.
#[derive(Debug, Default, Clone, Copy)]
pub struct Launcher;

impl Launcher {
    pub fn new() -> Self {
        Self
    }

    /// Run the install step to completion with inherited stdio.
    pub async fn install(&self, project: &ProjectConfig) -> Result<ExitStatus> {
        let mut command = Self::command(&project.install_command, project)?;
        let status = command
            .stdin(Stdio::null())
            .status()
            .await
            .map_err(|e| {
                Error::CommandFailed(format!(
                    "Failed to run {}: {}",
                    project.install_command.join(" "),
                    e
                ))
            })?;

        debug!(status = %status, "Install step finished");
        Ok(status)
    }

    /// Spawn the dev server with stdout and stderr merged into one pipe.
    pub fn spawn(&self, project: &ProjectConfig) -> Result<DevServer> {
        let (reader, writer) = std::io::pipe()?;
        let stderr = writer.try_clone()?;

        // The command owns our copies of the write end; it must be dropped
        // before reading or the pipe never reports EOF.
        let child = {
            let mut command = Self::command(&project.dev_command, project)?;
            command
                .stdin(Stdio::null())
                .stdout(writer)
                .stderr(stderr)
                .spawn()
                .map_err(|e| {
                    Error::CommandFailed(format!(
                        "Failed to run {}: {}",
                        project.dev_command.join(" "),
                        e
                    ))
                })?
        };

        let output = pipe::Receiver::from_file(File::from(OwnedFd::from(reader)))?;

        debug!(pid = ?child.id(), "Spawned dev server");
        Ok(DevServer {
            child,
            output: Some(output),
        })
    }

    /// Forward the server's output line by line until it closes, then wait
    /// for the server to exit.
    ///
    /// Returns [`LaunchOutcome::Interrupted`] as soon as `interrupt`
    /// completes, in either phase; the child is left running for the caller
    /// to stop.
    pub async fn stream<R, F>(
        &self,
        server: &mut DevServer,
        reporter: &R,
        interrupt: F,
    ) -> Result<LaunchOutcome>
    where
        R: Reporter + ?Sized,
        F: Future<Output = ()>,
    {
        let output = server
            .output
            .take()
            .ok_or_else(|| Error::CommandFailed("Dev server output already consumed".to_string()))?;
        let mut lines = BufReader::new(output).lines();

        tokio::pin!(interrupt);

        loop {
            tokio::select! {
                line = lines.next_line() => match line? {
                    Some(line) => reporter.output(&line),
                    None => break,
                },
                _ = &mut interrupt => {
                    debug!("Interrupted while streaming dev server output");
                    return Ok(LaunchOutcome::Interrupted);
                }
            }
        }

        // A server may close its output and keep running.
        tokio::select! {
            status = server.child.wait() => {
                let status = status?;
                debug!(status = %status, "Dev server exited");
                Ok(LaunchOutcome::Exited(status))
            }
            _ = &mut interrupt => {
                debug!("Interrupted while waiting for dev server");
                Ok(LaunchOutcome::Interrupted)
            }
        }
    }

    fn command(argv: &[String], project: &ProjectConfig) -> Result<Command> {
        let (program, args) = argv
            .split_first()
            .ok_or_else(|| Error::Config("Command line is empty".to_string()))?;

        let mut command = Command::new(program);
        command.args(args).current_dir(&project.dir);
        Ok(command)
    }
}
