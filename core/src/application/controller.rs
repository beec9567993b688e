//! Project lifecycle controller: start, stop, restart and status.
//!
//! The controller keeps no state of its own. Every operation re-derives
//! whether the server runs by probing the port range and reading the PID
//! file at call time.

use std::collections::HashSet;
use std::future::Future;
use std::time::Duration;

use tracing::{debug, warn};

use crate::adapters::config_patch::{self, PatchOutcome};
use crate::adapters::{
    LaunchOutcome, Launcher, PidFile, PortScanner, ProcessKiller, TcpProbe,
};
use crate::domain::{LifecycleCommand, PortInfo, ProjectConfig};
use crate::error::{Error, KillError, Result};
use crate::ports::{PortProbe, PortScannerPort, ProcessKillerPort, Reporter, Termination};

use super::PortService;

/// How long a process gets between SIGTERM and SIGKILL.
const STOP_TIMEOUT: Duration = Duration::from_secs(5);

/// Pause between stop and start on restart.
const RESTART_DELAY: Duration = Duration::from_secs(2);

/// Drives the lifecycle of one project's dev server.
pub struct ProjectController<P, S, K, R>
where
    P: PortProbe,
    S: PortScannerPort,
    K: ProcessKillerPort,
    R: Reporter,
{
    project: ProjectConfig,
    ports: PortService<P, S>,
    killer: K,
    reporter: R,
    launcher: Launcher,
    stop_timeout: Duration,
    restart_delay: Duration,
}

impl<R: Reporter> ProjectController<TcpProbe, PortScanner, ProcessKiller, R> {
    /// Controller backed by the real network, scanner and signals.
    pub fn system(project: ProjectConfig, reporter: R) -> Self {
        Self::new(
            project,
            PortService::new(TcpProbe::new(), PortScanner::new()),
            ProcessKiller::new(),
            reporter,
        )
    }
}

impl<P, S, K, R> ProjectController<P, S, K, R>
where
    P: PortProbe,
    S: PortScannerPort,
    K: ProcessKillerPort,
    R: Reporter,
{
    pub fn new(project: ProjectConfig, ports: PortService<P, S>, killer: K, reporter: R) -> Self {
        Self {
            project,
            ports,
            killer,
            reporter,
            launcher: Launcher::new(),
            stop_timeout: STOP_TIMEOUT,
            restart_delay: RESTART_DELAY,
        }
    }

    /// Override the SIGTERM grace period (default 5s).
    pub fn with_stop_timeout(mut self, timeout: Duration) -> Self {
        self.stop_timeout = timeout;
        self
    }

    /// Override the pause between stop and start (default 2s).
    pub fn with_restart_delay(mut self, delay: Duration) -> Self {
        self.restart_delay = delay;
        self
    }

    pub fn project(&self) -> &ProjectConfig {
        &self.project
    }

    pub fn reporter(&self) -> &R {
        &self.reporter
    }

    /// Run `command`; `true` on success.
    pub async fn run(&self, command: LifecycleCommand) -> bool {
        debug!(command = %command, project = %self.project.name, "Running lifecycle command");
        match command {
            LifecycleCommand::Start => self.start().await,
            LifecycleCommand::Stop => self.stop().await,
            LifecycleCommand::Restart => self.restart().await,
            LifecycleCommand::Status => self.status().await,
        }
    }

    // =========================================================================
    // Start
    // =========================================================================

    /// Start the dev server and stream its output until it exits or Ctrl-C.
    pub async fn start(&self) -> bool {
        self.start_until(ctrl_c()).await
    }

    /// Like [`start`](Self::start), with a custom interrupt.
    ///
    /// When `interrupt` completes while the server runs, the server is
    /// stopped and the start counts as failed.
    pub async fn start_until<F>(&self, interrupt: F) -> bool
    where
        F: Future<Output = ()>,
    {
        let project = &self.project;
        self.reporter.info(&format!("Starting {}...", project.name));

        let Some(port) = self.ports.find_available_port(project.port_range).await else {
            let err = Error::NoAvailablePorts {
                start: project.port_range.start,
                end: project.port_range.end,
            };
            self.reporter.error(&err.to_string());
            return false;
        };

        if port != project.default_port {
            self.reporter.warning(&format!(
                "Default port {} is in use, using port {}",
                project.default_port, port
            ));
        }

        match config_patch::patch_port(&project.config_path(), port).await {
            Ok(PatchOutcome::Patched { replacements }) => {
                debug!(port = port, replacements = replacements, "Config file patched");
            }
            Ok(PatchOutcome::MissingFile) => {}
            Err(e) => {
                self.reporter.error(&format!(
                    "Failed to update {}: {}",
                    project.config_file.display(),
                    e
                ));
                return false;
            }
        }

        if !project.install_marker_path().exists() {
            self.reporter.info("Installing dependencies...");
            match self.launcher.install(project).await {
                Ok(status) if !status.success() => {
                    self.reporter
                        .warning(&format!("Dependency install exited with {}", status));
                }
                Ok(_) => {}
                Err(e) => {
                    self.reporter
                        .error(&format!("Failed to install dependencies: {}", e));
                    return false;
                }
            }
        }

        self.reporter
            .success(&format!("Starting development server on port {}...", port));
        self.reporter.info(&format!("URL: {}", project.url(port)));

        match self.serve(interrupt).await {
            Ok(LaunchOutcome::Exited(status)) if status.success() => true,
            Ok(LaunchOutcome::Exited(status)) => {
                self.reporter
                    .error(&format!("Development server exited with {}", status));
                false
            }
            Ok(LaunchOutcome::Interrupted) => {
                self.reporter.warning("Shutting down server...");
                self.stop().await;
                false
            }
            Err(e) => {
                self.reporter.error(&format!("Failed to start server: {}", e));
                false
            }
        }
    }

    async fn serve<F>(&self, interrupt: F) -> Result<LaunchOutcome>
    where
        F: Future<Output = ()>,
    {
        let mut server = self.launcher.spawn(&self.project)?;
        let pid = server.id().ok_or_else(|| {
            Error::CommandFailed("Dev server exited before its PID was recorded".to_string())
        })?;

        PidFile::new(self.project.pid_path()).write(pid).await?;

        self.launcher
            .stream(&mut server, &self.reporter, interrupt)
            .await
    }

    // =========================================================================
    // Stop
    // =========================================================================

    /// Stop the recorded server, then anything still bound inside the range.
    ///
    /// Always succeeds; individual failures are reported along the way.
    pub async fn stop(&self) -> bool {
        self.reporter.info(&format!("Stopping {}...", self.project.name));

        let pid_file = PidFile::new(self.project.pid_path());
        if pid_file.exists() {
            self.stop_recorded(&pid_file).await;
            if let Err(e) = pid_file.remove().await {
                self.reporter.warning(&format!(
                    "Failed to remove {}: {}",
                    pid_file.path().display(),
                    e
                ));
            }
        }

        let mut stopped = HashSet::new();
        for owner in self.ports.find_processes_in_range(self.project.port_range).await {
            if owner.pid == std::process::id() || stopped.contains(&owner.pid) {
                continue;
            }
            self.reporter
                .info(&format!("Found process on port {}, stopping...", owner.port));
            self.stop_owner(&owner).await;
            stopped.insert(owner.pid);
        }

        self.reporter
            .success(&format!("{} stopped", self.project.name));
        true
    }

    async fn stop_recorded(&self, pid_file: &PidFile) {
        let pid = match pid_file.read().await {
            Ok(pid) => pid,
            Err(e) => {
                self.reporter.warning(&e.to_string());
                return;
            }
        };

        match self.killer.terminate(pid, self.stop_timeout).await {
            Ok(Termination::Graceful) => self.reporter.success("Server stopped"),
            Ok(Termination::Forced) => self.reporter.warning("Force killing server..."),
            Err(KillError::ProcessNotFound(_)) => {
                self.reporter.warning("Server process not found")
            }
            Err(e) => self
                .reporter
                .error(&format!("Failed to stop server: {}", e)),
        }
    }

    async fn stop_owner(&self, owner: &PortInfo) {
        match self.killer.terminate(owner.pid, self.stop_timeout).await {
            Ok(_) | Err(KillError::ProcessNotFound(_)) => {}
            Err(e) => {
                warn!(pid = owner.pid, port = owner.port, error = %e, "Graceful stop failed, killing");
                if let Err(e) = self.killer.kill(owner.pid).await {
                    self.reporter.error(&format!(
                        "Failed to stop process {} on port {}: {}",
                        owner.pid, owner.port, e
                    ));
                }
            }
        }
    }

    // =========================================================================
    // Restart / Status
    // =========================================================================

    /// Stop, wait, then start. The result is the start's result.
    pub async fn restart(&self) -> bool {
        self.restart_until(ctrl_c()).await
    }

    /// Like [`restart`](Self::restart), with a custom interrupt for the start.
    pub async fn restart_until<F>(&self, interrupt: F) -> bool
    where
        F: Future<Output = ()>,
    {
        self.reporter
            .info(&format!("Restarting {}...", self.project.name));
        self.stop().await;
        tokio::time::sleep(self.restart_delay).await;
        self.start_until(interrupt).await
    }

    /// Report the first occupied port in the range; `false` if none is.
    pub async fn status(&self) -> bool {
        let project = &self.project;
        self.reporter
            .info(&format!("Checking {} status...", project.name));

        for port in project.port_range.iter() {
            if !self.ports.is_port_in_use(port).await {
                continue;
            }

            self.reporter
                .success(&format!("{} is running on port {}", project.name, port));
            match self.ports.find_process_by_port(port).await {
                Some(owner) => self.reporter.info(&format!("  PID: {}", owner.pid)),
                None => self.reporter.info("  PID: unknown"),
            }
            self.reporter.info(&format!("  URL: {}", project.url(port)));
            return true;
        }

        self.reporter
            .warning(&format!("{} is not running", project.name));
        false
    }
}

/// Resolves on Ctrl-C. Never resolves if the handler cannot be installed.
async fn ctrl_c() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for Ctrl-C");
        std::future::pending::<()>().await;
    }
}
