//! Backend lifecycle glue for LocalCast hosts
//!
//! Ties the binary locator and the supervisor together behind the
//! `AppLifecycle` hooks, with an optional TOML configuration layer.

mod config;
mod service;

pub use config::*;
pub use service::*;
