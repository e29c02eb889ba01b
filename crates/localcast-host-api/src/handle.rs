//! Backend process handle

use std::path::PathBuf;

/// State of the supervised backend, as last observed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendState {
    Running,
    Terminated,
}

/// Handle to a spawned backend process
///
/// Created by the supervisor on a successful start. The supervisor retains
/// exclusive ownership of the underlying child; this handle carries the
/// identifiers a front-end needs for diagnostics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendHandle {
    /// OS process identifier
    pub pid: u32,

    /// Path the backend was launched from
    pub executable: PathBuf,
}

impl BackendHandle {
    pub fn new(pid: u32, executable: PathBuf) -> Self {
        Self { pid, executable }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn handle_carries_pid_and_path() {
        let handle = BackendHandle::new(4242, PathBuf::from("/opt/app/localcast"));
        assert_eq!(handle.pid, 4242);
        assert_eq!(handle.executable, PathBuf::from("/opt/app/localcast"));
    }
}
