//! Signal based process termination.
//!
//! Termination follows this pattern:
//! 1. Send SIGTERM to request graceful shutdown
//! 2. Poll every 100ms until the process is gone or the timeout expires
//! 3. If still running, send SIGKILL

use std::time::Duration;

use nix::errno::Errno;
use nix::sys::signal::{self, Signal};
use nix::sys::wait::{waitpid, WaitPidFlag, WaitStatus};
use nix::unistd::Pid;
use tokio::time::{sleep, Instant};
use tracing::{debug, warn};

use crate::error::KillError;
use crate::ports::{ProcessKillerPort, Termination};

/// Interval between liveness checks while waiting for exit.
const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Unix process killer.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessKiller;

impl ProcessKiller {
    pub fn new() -> Self {
        Self
    }

    fn target(pid: u32) -> Result<Pid, KillError> {
        i32::try_from(pid)
            .ok()
            .filter(|raw| *raw > 0)
            .map(Pid::from_raw)
            .ok_or(KillError::InvalidPid(pid))
    }

    fn send_signal(&self, pid: u32, sig: Signal) -> Result<(), KillError> {
        let target = Self::target(pid)?;
        debug!(pid = pid, signal = sig.as_str(), "Sending signal to process");

        signal::kill(target, sig).map_err(|errno| match errno {
            Errno::ESRCH => KillError::ProcessNotFound(pid),
            Errno::EPERM => {
                warn!(pid = pid, "Permission denied to signal process");
                KillError::PermissionDenied(pid)
            }
            other => KillError::Signal {
                pid,
                reason: other.desc().to_string(),
            },
        })
    }
}

impl ProcessKillerPort for ProcessKiller {
    async fn terminate(&self, pid: u32, timeout: Duration) -> Result<Termination, KillError> {
        self.send_signal(pid, Signal::SIGTERM)?;

        let deadline = Instant::now() + timeout;
        while Instant::now() < deadline {
            if !self.is_running(pid) {
                debug!(pid = pid, "Process terminated after SIGTERM");
                return Ok(Termination::Graceful);
            }
            sleep(POLL_INTERVAL).await;
        }

        if !self.is_running(pid) {
            return Ok(Termination::Graceful);
        }

        warn!(pid = pid, timeout_ms = (timeout.as_millis() as u64), "Process ignored SIGTERM, sending SIGKILL");
        match self.send_signal(pid, Signal::SIGKILL) {
            // Exited between the last check and the signal
            Ok(()) | Err(KillError::ProcessNotFound(_)) => Ok(Termination::Forced),
            Err(e) => Err(e),
        }
    }

    async fn kill(&self, pid: u32) -> Result<(), KillError> {
        self.send_signal(pid, Signal::SIGKILL)
    }

    /// A process counts as running while it can still be signalled.
    ///
    /// Our own children linger as zombies until reaped, so they are reaped
    /// here first; anything else is checked with signal 0.
    fn is_running(&self, pid: u32) -> bool {
        let Ok(target) = Self::target(pid) else {
            return false;
        };

        match waitpid(target, Some(WaitPidFlag::WNOHANG)) {
            Ok(WaitStatus::Exited(..)) | Ok(WaitStatus::Signaled(..)) => return false,
            Ok(_) => return true,
            // ECHILD: not our child
            Err(_) => {}
        }

        match signal::kill(target, None) {
            Ok(()) => true,
            Err(Errno::EPERM) => true,
            Err(_) => false,
        }
    }
}
