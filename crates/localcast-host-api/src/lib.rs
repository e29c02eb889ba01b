//! Host-facing interface for the LocalCast backend supervisor
//!
//! This crate defines the seam between the host application front-end and
//! the platform code that locates and supervises the backend process. It
//! contains no platform code itself.

mod error;
mod handle;
mod lifecycle;

pub use error::*;
pub use handle::*;
pub use lifecycle::*;
