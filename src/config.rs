use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

// =============================================================================
// Registry-related constants
// =============================================================================

/// Default package index
pub const DEFAULT_PYPI_REGISTRY: &str = "https://pypi.org";

/// Format of `upload_time` in the PyPI JSON API
pub const UPLOAD_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// `packagetype` of source distributions
pub const SOURCE_PACKAGE_TYPE: &str = "sdist";

/// Interpreter used to introspect `setup.py`
pub const DEFAULT_PYTHON: &str = "python3";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid config file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// Runtime configuration
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct LagConfig {
    /// Base URL of the package index
    pub registry_url: String,
    /// Python interpreter for build-script introspection
    pub python: String,
    /// Stop recursing when a package reappears on its own dependency path
    pub detect_cycles: bool,
    /// Parent directory for per-package extraction directories
    pub temp_dir: Option<PathBuf>,
}

impl Default for LagConfig {
    fn default() -> Self {
        Self {
            registry_url: DEFAULT_PYPI_REGISTRY.to_string(),
            python: DEFAULT_PYTHON.to_string(),
            detect_cycles: false,
            temp_dir: None,
        }
    }
}

impl LagConfig {
    /// Read a JSON config file. Missing fields keep their defaults.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load `explicit` if given, otherwise the default config file if it exists.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        match explicit {
            Some(path) => Self::from_file(path),
            None => {
                let path = config_path();
                if path.is_file() {
                    Self::from_file(&path)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }
}

/// Returns the path to the default config file.
/// Uses $XDG_CONFIG_HOME/techlag/config.json if XDG_CONFIG_HOME is set,
/// otherwise falls back to ~/.config/techlag/config.json,
/// or ./techlag/config.json if neither is available.
pub fn config_path() -> PathBuf {
    config_dir_with_env(std::env::var("XDG_CONFIG_HOME").ok(), dirs::home_dir())
        .join("config.json")
}

fn config_dir_with_env(xdg_config_home: Option<String>, home_dir: Option<PathBuf>) -> PathBuf {
    let config_dir = xdg_config_home
        .map(PathBuf::from)
        .or_else(|| home_dir.map(|home| home.join(".config")))
        .unwrap_or_else(|| PathBuf::from("."));

    config_dir.join("techlag")
}
