//! Backend process supervision
//!
//! Owns the lifecycle of at most one backend child: start given a resolved
//! path, hold the handle, and terminate synchronously on shutdown. The host
//! drives this from single-threaded lifecycle callbacks; the mutex keeps the
//! at-most-one invariant even if a front-end calls in from several threads.

use std::path::Path;
use std::sync::Mutex;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

use crate::process::BackendProcess;
use localcast_host_api::{BackendHandle, BackendState, HostError, HostResult};

/// Poll interval while waiting for the child to exit
const EXIT_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Default bound on the graceful-stop wait before escalating to SIGKILL
pub const DEFAULT_STOP_TIMEOUT: Duration = Duration::from_secs(5);

/// Supervisor for the single backend process
pub struct Supervisor {
    inner: Mutex<Option<BackendProcess>>,
    stop_timeout: Duration,
}

impl Supervisor {
    pub fn new() -> Self {
        Self::with_stop_timeout(DEFAULT_STOP_TIMEOUT)
    }

    pub fn with_stop_timeout(stop_timeout: Duration) -> Self {
        Self {
            inner: Mutex::new(None),
            stop_timeout,
        }
    }

    /// Spawn the backend at `path`.
    ///
    /// Rejected with [`HostError::AlreadyRunning`] while a live child is
    /// held. A child observed to have already exited on its own is reaped
    /// and replaced. On spawn failure no handle is retained and the host
    /// keeps running without a backend.
    pub fn start(&self, path: &Path, args: &[String]) -> HostResult<BackendHandle> {
        let mut slot = self.inner.lock().unwrap();

        if let Some(existing) = slot.as_mut() {
            match existing.try_wait()? {
                None => {
                    return Err(HostError::AlreadyRunning { pid: existing.pid });
                }
                Some(status) => {
                    debug!(pid = existing.pid, status = ?status, "Previous backend already exited");
                    *slot = None;
                }
            }
        }

        let proc = BackendProcess::spawn(path, args)?;
        let handle = BackendHandle::new(proc.pid, proc.executable.clone());
        info!(pid = proc.pid, path = %path.display(), "Backend started");
        *slot = Some(proc);

        Ok(handle)
    }

    /// Stop the backend and clear the handle.
    ///
    /// No-op when nothing is running. Requests termination with SIGTERM,
    /// waits up to the stop timeout for the child to exit, escalates to
    /// SIGKILL on expiry, and always clears the handle. Idempotent.
    pub fn stop(&self) {
        let Some(mut proc) = self.inner.lock().unwrap().take() else {
            return;
        };

        match proc.try_wait() {
            Ok(Some(status)) => {
                debug!(pid = proc.pid, status = ?status, "Backend already exited");
                return;
            }
            Ok(None) => {}
            Err(e) => {
                warn!(pid = proc.pid, error = %e, "Error checking backend status");
            }
        }

        if let Err(e) = proc.terminate() {
            warn!(pid = proc.pid, error = %e, "Failed to request backend termination");
        }

        let deadline = Instant::now() + self.stop_timeout;
        loop {
            match proc.try_wait() {
                Ok(Some(status)) => {
                    info!(pid = proc.pid, status = ?status, "Backend stopped");
                    return;
                }
                Ok(None) => {}
                Err(e) => {
                    warn!(pid = proc.pid, error = %e, "Error waiting for backend exit");
                    return;
                }
            }

            if Instant::now() >= deadline {
                warn!(pid = proc.pid, timeout = ?self.stop_timeout, "Backend ignored SIGTERM, killing");
                if let Err(e) = proc.kill() {
                    warn!(pid = proc.pid, error = %e, "Failed to kill backend");
                    return;
                }
                match proc.wait() {
                    Ok(status) => info!(pid = proc.pid, status = ?status, "Backend killed"),
                    Err(e) => warn!(pid = proc.pid, error = %e, "Error reaping killed backend"),
                }
                return;
            }

            std::thread::sleep(EXIT_POLL_INTERVAL);
        }
    }

    /// Last-observed state of the supervised backend
    pub fn state(&self) -> BackendState {
        let mut slot = self.inner.lock().unwrap();
        match slot.as_mut() {
            Some(proc) => match proc.try_wait() {
                Ok(None) => BackendState::Running,
                _ => BackendState::Terminated,
            },
            None => BackendState::Terminated,
        }
    }

    /// Pid of the running backend, for diagnostics
    pub fn running_pid(&self) -> Option<u32> {
        let mut slot = self.inner.lock().unwrap();
        let proc = slot.as_mut()?;
        match proc.try_wait() {
            Ok(None) => Some(proc.pid),
            _ => None,
        }
    }
}

impl Default for Supervisor {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for Supervisor {
    /// The child handle is released on every host exit path
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn start_sleep(sup: &Supervisor) -> BackendHandle {
        sup.start(Path::new("sleep"), &["60".into()]).unwrap()
    }

    #[test]
    fn start_and_stop() {
        let sup = Supervisor::new();
        let handle = start_sleep(&sup);
        assert_eq!(sup.running_pid(), Some(handle.pid));
        assert_eq!(sup.state(), BackendState::Running);

        sup.stop();
        assert_eq!(sup.running_pid(), None);
        assert_eq!(sup.state(), BackendState::Terminated);
    }

    #[test]
    fn second_start_rejected_while_running() {
        let sup = Supervisor::new();
        let handle = start_sleep(&sup);

        let second = sup.start(Path::new("sleep"), &["60".into()]);
        assert!(matches!(
            second,
            Err(HostError::AlreadyRunning { pid }) if pid == handle.pid
        ));

        // Still exactly one child, the original one
        assert_eq!(sup.running_pid(), Some(handle.pid));
        sup.stop();
    }

    #[test]
    fn start_after_spontaneous_exit_succeeds() {
        let sup = Supervisor::new();
        sup.start(Path::new("true"), &[]).unwrap();

        // Give the child a moment to exit on its own
        std::thread::sleep(Duration::from_millis(100));

        let handle = start_sleep(&sup);
        assert_eq!(sup.running_pid(), Some(handle.pid));
        sup.stop();
    }

    #[test]
    fn stop_without_start_is_noop() {
        let sup = Supervisor::new();
        sup.stop();
        assert_eq!(sup.running_pid(), None);
    }

    #[test]
    fn stop_is_idempotent() {
        let sup = Supervisor::new();
        start_sleep(&sup);
        sup.stop();
        sup.stop();
        assert_eq!(sup.state(), BackendState::Terminated);
    }

    #[test]
    fn start_missing_path_leaves_no_handle() {
        let sup = Supervisor::new();
        let result = sup.start(Path::new("/nonexistent/localcast"), &[]);
        assert!(matches!(result, Err(HostError::SpawnFailed(_))));
        assert_eq!(sup.running_pid(), None);
        assert_eq!(sup.state(), BackendState::Terminated);
    }

    #[test]
    fn sigterm_ignorer_is_killed_after_timeout() {
        let sup = Supervisor::with_stop_timeout(Duration::from_millis(200));
        sup.start(
            Path::new("/bin/sh"),
            &["-c".into(), "trap '' TERM; sleep 60".into()],
        )
        .unwrap();

        // Give the shell time to install the trap
        std::thread::sleep(Duration::from_millis(100));

        let started = Instant::now();
        sup.stop();
        assert!(started.elapsed() < Duration::from_secs(5));
        assert_eq!(sup.running_pid(), None);
    }

    #[test]
    fn drop_stops_the_backend() {
        let pid;
        {
            let sup = Supervisor::new();
            pid = start_sleep(&sup).pid;
        }

        // After drop the pid must no longer be alive
        let alive = nix::sys::signal::kill(nix::unistd::Pid::from_raw(pid as i32), None).is_ok();
        assert!(!alive);
    }
}
