//! localcast-shell - minimal host front-end for the backend supervisor
//!
//! Stands in for a real host application: it drives the two lifecycle hooks
//! and nothing else. On startup it locates and starts the backend, then
//! parks until SIGTERM/SIGINT, then stops the backend and exits.

use anyhow::{Context, Result};
use clap::Parser;
use localcast_core::{BackendService, load_config};
use localcast_host_api::AppLifecycle;
use std::path::PathBuf;
use tokio::signal::unix::{SignalKind, signal};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Host shell for the LocalCast backend
#[derive(Parser, Debug)]
#[command(name = "localcast-shell")]
#[command(about = "Runs the LocalCast backend for the lifetime of the host", long_about = None)]
struct Args {
    /// Configuration file path
    #[arg(short, long, default_value = "localcast.toml")]
    config: PathBuf,

    /// Install root to resolve the backend against
    /// (default: directory of this executable)
    #[arg(short, long, env = "LOCALCAST_INSTALL_ROOT")]
    install_root: Option<PathBuf>,

    /// Log level
    #[arg(short, long, default_value = "info")]
    log_level: String,
}

fn default_install_root() -> Result<PathBuf> {
    let exe = std::env::current_exe().context("Failed to resolve current executable")?;
    exe.parent()
        .map(PathBuf::from)
        .context("Executable has no parent directory")
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();

    info!(version = env!("CARGO_PKG_VERSION"), "localcast-shell starting");

    let config = load_config(&args.config)
        .with_context(|| format!("Failed to load config from {:?}", args.config))?;

    let install_root = match args.install_root {
        Some(root) => root,
        None => default_install_root()?,
    };
    info!(install_root = %install_root.display(), "Install root resolved");

    let service = BackendService::new(install_root, &config);
    service.on_launched();

    let mut sigterm = signal(SignalKind::terminate()).context("Failed to create SIGTERM handler")?;
    let mut sigint = signal(SignalKind::interrupt()).context("Failed to create SIGINT handler")?;

    tokio::select! {
        _ = sigterm.recv() => {
            info!("Received SIGTERM, shutting down");
        }
        _ = sigint.recv() => {
            info!("Received SIGINT, shutting down");
        }
    }

    service.on_will_terminate();
    info!("Shutdown complete");
    Ok(())
}
