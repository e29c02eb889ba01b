//! Backend binary discovery
//!
//! Resolves the backend executable for the current install context:
//! - Packaged: `<install_root>/Contents/Helpers/localcast`, placed there by
//!   the packaging script. The backend lives in its own subdirectory because
//!   the host executable shares its name and the filesystem may be
//!   case-insensitive.
//! - Development: walk up from the install root to the project root (marked
//!   by `Cargo.toml`) and probe `target/{release,debug}/localcast`, so a
//!   locally built backend is picked up without packaging.
//!
//! The first match wins; `release` is preferred over `debug` when both
//! artifacts exist on disk.

use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Backend executable filename
const BACKEND_NAME: &str = "localcast";

/// Subdirectory of the install root holding the packaged backend
const PACKAGED_SUBPATH: &str = "Contents/Helpers";

/// File marking the root of a development source tree
const MARKER_FILE: &str = "Cargo.toml";

/// Build output directory under the project root
const BUILD_DIR: &str = "target";

/// Bound on the upward walk from the install root
const MAX_WALK_UP: usize = 10;

/// Build profile determining which output subdirectory to probe
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Profile {
    Release,
    Debug,
}

impl Profile {
    /// Probe order: prefer the optimized artifact when both exist
    pub const PRIORITY: [Profile; 2] = [Profile::Release, Profile::Debug];

    pub fn as_str(&self) -> &'static str {
        match self {
            Profile::Release => "release",
            Profile::Debug => "debug",
        }
    }
}

/// What kind of placement a probed candidate came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CandidateKind {
    Packaged,
    DevelopmentBuild { profile: Profile },
}

/// Filesystem layout the locator searches
#[derive(Debug, Clone)]
pub struct BackendLayout {
    /// Backend executable filename
    pub backend_name: String,

    /// Packaged placement, relative to the install root
    pub packaged_subpath: PathBuf,

    /// File identifying a development project root
    pub marker_file: String,

    /// Build output directory under the project root
    pub build_dir: String,

    /// Maximum number of parent levels to walk
    pub max_walk_up: usize,
}

impl Default for BackendLayout {
    fn default() -> Self {
        Self {
            backend_name: BACKEND_NAME.into(),
            packaged_subpath: PathBuf::from(PACKAGED_SUBPATH),
            marker_file: MARKER_FILE.into(),
            build_dir: BUILD_DIR.into(),
            max_walk_up: MAX_WALK_UP,
        }
    }
}

/// Resolve the backend executable for an install root.
///
/// Returns the first executable candidate, packaged placement first. Absence
/// is a normal outcome: the host keeps running without a backend.
pub fn locate(install_root: &Path, layout: &BackendLayout) -> Option<PathBuf> {
    // Packaged placement takes absolute priority; nothing above the install
    // root is touched when it hits.
    let packaged = install_root
        .join(&layout.packaged_subpath)
        .join(&layout.backend_name);
    if is_executable(&packaged) {
        debug!(path = %packaged.display(), kind = ?CandidateKind::Packaged, "Backend candidate matched");
        return Some(packaged);
    }

    // Development placement: find the project root, then probe build outputs.
    // Once the marker is found the project root is unambiguous, so the walk
    // ends there even if no artifact exists yet.
    let mut dir = install_root;
    for _ in 0..layout.max_walk_up {
        dir = dir.parent()?;
        if !dir.join(&layout.marker_file).is_file() {
            continue;
        }
        for profile in Profile::PRIORITY {
            let candidate = dir
                .join(&layout.build_dir)
                .join(profile.as_str())
                .join(&layout.backend_name);
            if is_executable(&candidate) {
                let kind = CandidateKind::DevelopmentBuild { profile };
                debug!(path = %candidate.display(), kind = ?kind, "Backend candidate matched");
                return Some(candidate);
            }
        }
        return None;
    }

    None
}

/// A regular file with any execute bit set
fn is_executable(path: &Path) -> bool {
    match std::fs::metadata(path) {
        Ok(meta) => meta.is_file() && meta.permissions().mode() & 0o111 != 0,
        Err(_) => false,
    }
}
