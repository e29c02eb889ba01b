//! Errors from backend supervision

use thiserror::Error;

/// Errors from supervisor operations
#[derive(Debug, Error)]
pub enum HostError {
    #[error("Spawn failed: {0}")]
    SpawnFailed(String),

    #[error("Backend already running (pid {pid})")]
    AlreadyRunning { pid: u32 },

    #[error("Stop failed: {0}")]
    StopFailed(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type HostResult<T> = Result<T, HostError>;
