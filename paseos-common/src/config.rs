//! Configuration loading and config file resolution
//!
//! Bootstrap configuration comes from a TOML file. Lookup priority:
//! 1. Command-line argument (highest priority)
//! 2. `PASEOS_CONFIG` environment variable
//! 3. `<config_dir>/paseos/config.toml`
//! 4. Compiled defaults (fallback)
//!
//! A missing config file never prevents startup: a warning is logged and the
//! compiled defaults are used. A file that exists but fails to parse is an error.

use crate::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Environment variable naming an explicit config file
pub const CONFIG_ENV_VAR: &str = "PASEOS_CONFIG";

/// Default HTTP port
pub const DEFAULT_PORT: u16 = 5780;

/// Default collection path on a remote document store
pub const DEFAULT_COLLECTION: &str = "api/guidebooks";

/// Bootstrap configuration loaded from TOML file
#[derive(Debug, Clone, Deserialize)]
pub struct PaseosConfig {
    /// HTTP server port
    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default)]
    pub store: StoreConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for PaseosConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            store: StoreConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

/// Which guidebook store adapter to use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    /// Local SQLite database
    #[default]
    Local,
    /// Remote document store over HTTP
    Remote,
    /// In-memory, lost on restart
    Memory,
}

impl std::str::FromStr for StoreBackend {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "local" => Ok(Self::Local),
            "remote" => Ok(Self::Remote),
            "memory" => Ok(Self::Memory),
            other => Err(Error::Config(format!("Unknown store backend: {}", other))),
        }
    }
}

/// Guidebook store configuration
#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    #[serde(default)]
    pub backend: StoreBackend,

    /// SQLite database file for the local backend
    #[serde(default = "default_database_path")]
    pub database_path: PathBuf,

    /// Base URL of the remote document store (required for the remote backend)
    #[serde(default)]
    pub remote_url: Option<String>,

    /// Collection path under `remote_url`
    #[serde(default = "default_collection")]
    pub collection: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: StoreBackend::default(),
            database_path: default_database_path(),
            remote_url: None,
            collection: default_collection(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_collection() -> String {
    DEFAULT_COLLECTION.to_string()
}

/// OS-dependent default database location
fn default_database_path() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join("paseos"))
        .unwrap_or_else(|| PathBuf::from("./paseos_data"))
        .join("paseos.db")
}

impl PaseosConfig {
    /// Parse configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::Config(e.to_string()))
    }

    /// Resolve and load configuration, falling back to defaults
    pub fn load(cli_path: Option<&Path>) -> Result<Self> {
        let Some(path) = resolve_config_path(cli_path) else {
            warn!("No config file found; using compiled defaults");
            return Ok(Self::default());
        };

        match std::fs::read_to_string(&path) {
            Ok(content) => {
                info!("Loading configuration from {}", path.display());
                Self::from_toml_str(&content)
            }
            Err(e) => {
                warn!(
                    "Could not read config file {}: {}; using compiled defaults",
                    path.display(),
                    e
                );
                Ok(Self::default())
            }
        }
    }
}

/// Find the config file to load, if any
pub fn resolve_config_path(cli_path: Option<&Path>) -> Option<PathBuf> {
    // Priority 1: Command-line argument
    if let Some(path) = cli_path {
        return Some(path.to_path_buf());
    }

    // Priority 2: Environment variable
    if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
        if !path.is_empty() {
            return Some(PathBuf::from(path));
        }
    }

    // Priority 3: Platform config directory
    dirs::config_dir()
        .map(|d| d.join("paseos").join("config.toml"))
        .filter(|p| p.exists())
}
