//! Backend lifecycle service

use std::path::PathBuf;
use std::time::Duration;
use tracing::{info, warn};

use crate::BackendConfig;
use localcast_host_api::{AppLifecycle, BackendState};
use localcast_host_unix::{BackendLayout, Supervisor, locate};

/// Locates and supervises the backend for one host process.
///
/// Wire the host's two lifecycle hooks to [`AppLifecycle::on_launched`] and
/// [`AppLifecycle::on_will_terminate`]; nothing else is required. Failures
/// are logged and never propagate: the host stays usable with no backend.
pub struct BackendService {
    install_root: PathBuf,
    layout: BackendLayout,
    args: Vec<String>,
    supervisor: Supervisor,
}

impl BackendService {
    pub fn new(install_root: PathBuf, config: &BackendConfig) -> Self {
        Self {
            install_root,
            layout: config.layout(),
            args: config.args.clone(),
            supervisor: Supervisor::with_stop_timeout(config.stop_timeout()),
        }
    }

    pub fn with_stop_timeout(mut self, stop_timeout: Duration) -> Self {
        self.supervisor = Supervisor::with_stop_timeout(stop_timeout);
        self
    }

    /// Pid of the running backend, if any
    pub fn backend_pid(&self) -> Option<u32> {
        self.supervisor.running_pid()
    }

    pub fn backend_state(&self) -> BackendState {
        self.supervisor.state()
    }
}

impl AppLifecycle for BackendService {
    fn on_launched(&self) {
        let Some(path) = locate(&self.install_root, &self.layout) else {
            warn!(
                install_root = %self.install_root.display(),
                "Backend binary not found"
            );
            return;
        };

        match self.supervisor.start(&path, &self.args) {
            Ok(handle) => {
                info!(pid = handle.pid, path = %path.display(), "Backend running");
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Failed to start backend");
            }
        }
    }

    fn on_will_terminate(&self) {
        self.supervisor.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::os::unix::fs::PermissionsExt;
    use std::path::Path;
    use tempfile::TempDir;

    fn place_backend(path: &Path, body: &str) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, format!("#!/bin/sh\n{body}\n")).unwrap();
        fs::set_permissions(path, fs::Permissions::from_mode(0o755)).unwrap();
    }

    #[test]
    fn launch_starts_packaged_backend_and_terminate_stops_it() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path().join("App");
        place_backend(&root.join("Contents/Helpers/localcast"), "sleep 60");

        let service = BackendService::new(root, &BackendConfig::default());
        service.on_launched();
        assert!(service.backend_pid().is_some());
        assert_eq!(service.backend_state(), BackendState::Running);

        service.on_will_terminate();
        assert_eq!(service.backend_pid(), None);
        assert_eq!(service.backend_state(), BackendState::Terminated);
    }

    #[test]
    fn launch_without_backend_is_harmless() {
        let tmp = TempDir::new().unwrap();
        let service = BackendService::new(tmp.path().to_path_buf(), &BackendConfig::default());

        service.on_launched();
        assert_eq!(service.backend_pid(), None);

        service.on_will_terminate();
    }

    #[test]
    fn terminate_without_launch_is_noop() {
        let tmp = TempDir::new().unwrap();
        let service = BackendService::new(tmp.path().to_path_buf(), &BackendConfig::default());
        service.on_will_terminate();
        service.on_will_terminate();
    }
}
