use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::check::CheckOptions;
use crate::report::StatusFilter;
use crate::version::registries::helm::DEFAULT_BINARY;

// =============================================================================
// Defaults
// =============================================================================

/// Manifest read when no path is given
pub const DEFAULT_MANIFEST_PATH: &str = "helmfile.yaml";

/// Timeout for a single chart lookup in milliseconds (30 seconds)
pub const LOOKUP_TIMEOUT_MS: u64 = 30_000;

/// Environment variable holding the log filter directives
pub const LOG_FILTER_ENV: &str = "HELMFILE_UPDATES_LOG";

const APP_DIR: &str = "helmfile-updates";

/// Configuration file structure
#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct Config {
    pub helm: HelmConfig,
    pub check: CheckConfig,
    pub report: ReportConfig,
}

/// How the helm binary is invoked
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct HelmConfig {
    /// Path or name of the helm binary
    pub binary: PathBuf,
    /// Include development versions in searches
    pub devel: bool,
}

impl Default for HelmConfig {
    fn default() -> Self {
        Self {
            binary: PathBuf::from(DEFAULT_BINARY),
            devel: false,
        }
    }
}

/// Lookup fan-out settings
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct CheckConfig {
    /// Lookup timeout in milliseconds, 0 disables it
    pub lookup_timeout_ms: u64,
    pub max_concurrency: Option<usize>,
}

impl Default for CheckConfig {
    fn default() -> Self {
        Self {
            lookup_timeout_ms: LOOKUP_TIMEOUT_MS,
            max_concurrency: None,
        }
    }
}

impl CheckConfig {
    pub fn options(&self) -> CheckOptions {
        CheckOptions {
            lookup_timeout: (self.lookup_timeout_ms > 0)
                .then(|| Duration::from_millis(self.lookup_timeout_ms)),
            max_concurrency: self.max_concurrency,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct ReportConfig {
    pub status: StatusFilter,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl Config {
    /// Load configuration
    ///
    /// An explicit path must exist. Without one, the default location is read
    /// if present and defaults are used otherwise.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
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

    fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Returns the path to the configuration directory for helmfile-updates.
/// Uses $XDG_CONFIG_HOME/helmfile-updates if XDG_CONFIG_HOME is set,
/// otherwise falls back to ~/.config/helmfile-updates,
/// or ./helmfile-updates if neither is available.
pub fn config_dir() -> PathBuf {
    config_dir_with_env(std::env::var("XDG_CONFIG_HOME").ok(), dirs::home_dir())
}

/// Returns the path to the configuration file.
pub fn config_path() -> PathBuf {
    config_dir().join("config.json")
}

fn config_dir_with_env(xdg_config_home: Option<String>, home_dir: Option<PathBuf>) -> PathBuf {
    let config_dir = xdg_config_home
        .map(PathBuf::from)
        .or_else(|| home_dir.map(|home| home.join(".config")))
        .unwrap_or_else(|| PathBuf::from("."));

    config_dir.join(APP_DIR)
}
