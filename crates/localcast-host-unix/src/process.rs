//! Child process primitives

use nix::errno::Errno;
use nix::sys::signal::{self, Signal};
use nix::unistd::Pid;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};
use tracing::debug;

use localcast_host_api::{HostError, HostResult};

/// A spawned backend process
///
/// The backend is invoked with a fixed argument list, its stdin bound to the
/// null device (it is never sent input) and its stdout/stderr inherited from
/// the host.
pub struct BackendProcess {
    child: Child,
    pub pid: u32,
    pub executable: PathBuf,
}

impl BackendProcess {
    /// Spawn the backend at `path` with `args`
    pub fn spawn(path: &Path, args: &[String]) -> HostResult<Self> {
        let child = Command::new(path)
            .args(args)
            .stdin(Stdio::null())
            .spawn()
            .map_err(|e| {
                HostError::SpawnFailed(format!("Failed to spawn {}: {}", path.display(), e))
            })?;

        let pid = child.id();
        debug!(pid = pid, path = %path.display(), "Process spawned");

        Ok(Self {
            child,
            pid,
            executable: path.to_path_buf(),
        })
    }

    /// Send SIGTERM to the process
    pub fn terminate(&self) -> HostResult<()> {
        match signal::kill(Pid::from_raw(self.pid as i32), Signal::SIGTERM) {
            Ok(()) => {
                debug!(pid = self.pid, "Sent SIGTERM");
                Ok(())
            }
            // Process already gone
            Err(Errno::ESRCH) => Ok(()),
            Err(e) => Err(HostError::StopFailed(format!(
                "Failed to send SIGTERM: {}",
                e
            ))),
        }
    }

    /// Send SIGKILL to the process
    pub fn kill(&self) -> HostResult<()> {
        match signal::kill(Pid::from_raw(self.pid as i32), Signal::SIGKILL) {
            Ok(()) => {
                debug!(pid = self.pid, "Sent SIGKILL");
                Ok(())
            }
            Err(Errno::ESRCH) => Ok(()),
            Err(e) => Err(HostError::StopFailed(format!(
                "Failed to send SIGKILL: {}",
                e
            ))),
        }
    }

    /// Check whether the process has exited (non-blocking)
    pub fn try_wait(&mut self) -> HostResult<Option<std::process::ExitStatus>> {
        self.child
            .try_wait()
            .map_err(|e| HostError::Internal(format!("Wait failed: {}", e)))
    }

    /// Wait for the process to exit (blocking)
    pub fn wait(&mut self) -> HostResult<std::process::ExitStatus> {
        self.child
            .wait()
            .map_err(|e| HostError::Internal(format!("Wait failed: {}", e)))
    }
}
