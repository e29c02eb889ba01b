//! Configuration parsing and validation
//!
//! Supports a small TOML file with:
//! - Backend executable name and argument vector
//! - Packaged and development filesystem layout
//! - Stop timeout before SIGKILL escalation
//!
//! Every field is defaulted and the file itself is optional: a host with no
//! configuration at all runs with the stock LocalCast layout.

use localcast_host_unix::BackendLayout;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Validation failed: {0}")]
    ValidationFailed(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Backend supervision configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BackendConfig {
    /// Backend executable filename
    #[serde(default = "default_backend_name")]
    pub backend_name: String,

    /// Packaged placement, relative to the install root
    #[serde(default = "default_packaged_subpath")]
    pub packaged_subpath: PathBuf,

    /// File identifying a development project root
    #[serde(default = "default_marker_file")]
    pub marker_file: String,

    /// Build output directory under the project root
    #[serde(default = "default_build_dir")]
    pub build_dir: String,

    /// Arguments the backend is invoked with
    #[serde(default = "default_args")]
    pub args: Vec<String>,

    /// Seconds to wait for graceful exit before SIGKILL
    #[serde(default = "default_stop_timeout_secs")]
    pub stop_timeout_secs: u64,
}

fn default_backend_name() -> String {
    "localcast".into()
}

fn default_packaged_subpath() -> PathBuf {
    PathBuf::from("Contents/Helpers")
}

fn default_marker_file() -> String {
    "Cargo.toml".into()
}

fn default_build_dir() -> String {
    "target".into()
}

fn default_args() -> Vec<String> {
    vec!["--api".into()]
}

fn default_stop_timeout_secs() -> u64 {
    5
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            backend_name: default_backend_name(),
            packaged_subpath: default_packaged_subpath(),
            marker_file: default_marker_file(),
            build_dir: default_build_dir(),
            args: default_args(),
            stop_timeout_secs: default_stop_timeout_secs(),
        }
    }
}

impl BackendConfig {
    /// The filesystem layout the locator should search
    pub fn layout(&self) -> BackendLayout {
        BackendLayout {
            backend_name: self.backend_name.clone(),
            packaged_subpath: self.packaged_subpath.clone(),
            marker_file: self.marker_file.clone(),
            build_dir: self.build_dir.clone(),
            ..BackendLayout::default()
        }
    }

    pub fn stop_timeout(&self) -> Duration {
        Duration::from_secs(self.stop_timeout_secs)
    }
}

/// Load and validate configuration from a TOML file.
///
/// A missing file yields the built-in defaults.
pub fn load_config(path: impl AsRef<Path>) -> ConfigResult<BackendConfig> {
    let path = path.as_ref();
    if !path.exists() {
        return Ok(BackendConfig::default());
    }
    let content = std::fs::read_to_string(path)?;
    parse_config(&content)
}

/// Parse and validate configuration from a TOML string
pub fn parse_config(content: &str) -> ConfigResult<BackendConfig> {
    let config: BackendConfig = toml::from_str(content)?;
    validate_config(&config)?;
    Ok(config)
}

fn validate_config(config: &BackendConfig) -> ConfigResult<()> {
    if config.backend_name.is_empty() {
        return Err(ConfigError::ValidationFailed(
            "backend_name must not be empty".into(),
        ));
    }
    if config.backend_name.contains('/') {
        return Err(ConfigError::ValidationFailed(
            "backend_name must be a bare filename".into(),
        ));
    }
    if config.marker_file.is_empty() {
        return Err(ConfigError::ValidationFailed(
            "marker_file must not be empty".into(),
        ));
    }
    if config.stop_timeout_secs == 0 {
        return Err(ConfigError::ValidationFailed(
            "stop_timeout_secs must be at least 1".into(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_uses_defaults() {
        let config = parse_config("").unwrap();
        assert_eq!(config.backend_name, "localcast");
        assert_eq!(config.args, vec!["--api".to_string()]);
        assert_eq!(config.packaged_subpath, PathBuf::from("Contents/Helpers"));
        assert_eq!(config.stop_timeout(), Duration::from_secs(5));
    }

    #[test]
    fn parse_full_config() {
        let config = parse_config(
            r#"
            backend_name = "castd"
            packaged_subpath = "Helpers"
            marker_file = "Cargo.toml"
            build_dir = "out"
            args = ["--api", "--verbose"]
            stop_timeout_secs = 10
        "#,
        )
        .unwrap();

        assert_eq!(config.backend_name, "castd");
        assert_eq!(config.layout().build_dir, "out");
        assert_eq!(config.stop_timeout(), Duration::from_secs(10));
    }

    #[test]
    fn reject_empty_backend_name() {
        let result = parse_config(r#"backend_name = """#);
        assert!(matches!(result, Err(ConfigError::ValidationFailed(_))));
    }

    #[test]
    fn reject_backend_name_with_path_separator() {
        let result = parse_config(r#"backend_name = "bin/localcast""#);
        assert!(matches!(result, Err(ConfigError::ValidationFailed(_))));
    }

    #[test]
    fn reject_zero_stop_timeout() {
        let result = parse_config("stop_timeout_secs = 0");
        assert!(matches!(result, Err(ConfigError::ValidationFailed(_))));
    }

    #[test]
    fn reject_unknown_field() {
        let result = parse_config("backend = \"localcast\"");
        assert!(matches!(result, Err(ConfigError::ParseError(_))));
    }

    #[test]
    fn missing_file_yields_defaults() {
        let tmp = tempfile::TempDir::new().unwrap();
        let config = load_config(tmp.path().join("localcast.toml")).unwrap();
        assert_eq!(config.backend_name, "localcast");
    }
}
