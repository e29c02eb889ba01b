//! Unix host platform code for the LocalCast backend
//!
//! This crate provides:
//! - Binary discovery (packaged install layout, then development build tree)
//! - Child process primitives (spawn, SIGTERM/SIGKILL, exit observation)
//! - The supervisor owning the at-most-one backend process

mod locate;
mod process;
mod supervisor;

pub use locate::*;
pub use process::*;
pub use supervisor::*;
