//! Server configuration.
//!
//! Defaults are embedded; a YAML config file and `TASKKEEPER_*` environment
//! variables can override them, and CLI flags take final precedence in `main`.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::warn;

/// Default port for the HTTP API.
pub const DEFAULT_PORT: u16 = 8000;

/// HTTP server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Bind address (default: 127.0.0.1).
    #[serde(default = "default_host")]
    pub host: String,

    /// Bind port (default: 8000).
    #[serde(default = "default_port")]
    pub port: u16,

    /// CORS origins allowed to call the API. `*` allows any origin.
    #[serde(default = "default_allowed_origins")]
    pub allowed_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            allowed_origins: default_allowed_origins(),
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_allowed_origins() -> Vec<String> {
    vec![
        "http://localhost:5173".to_string(),
        "http://127.0.0.1:5173".to_string(),
    ]
}

/// Storage settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Directory holding the JSON data files (default: ./data).
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("data")
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub storage: StorageConfig,
}

impl Config {
    /// Load configuration from a YAML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: Config = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        Ok(config)
    }

    /// Load from an optional file path, falling back to embedded defaults,
    /// then apply environment overrides.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::load(path)?,
            None => {
                let default_path = Path::new("taskkeeper.yaml");
                if default_path.exists() {
                    Self::load(default_path)?
                } else {
                    Config::default()
                }
            }
        };
        config.apply_env_overrides();
        Ok(config)
    }

    /// Apply `TASKKEEPER_*` environment variable overrides.
    fn apply_env_overrides(&mut self) {
        if let Ok(host) = std::env::var("TASKKEEPER_HOST") {
            self.server.host = host;
        }

        if let Ok(port) = std::env::var("TASKKEEPER_PORT") {
            match port.parse() {
                Ok(port) => self.server.port = port,
                Err(_) => warn!(value = %port, "Ignoring unparseable TASKKEEPER_PORT"),
            }
        }

        if let Ok(origins) = std::env::var("TASKKEEPER_ALLOWED_ORIGINS") {
            self.server.allowed_origins = origins
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
        }

        if let Ok(data_dir) = std::env::var("TASKKEEPER_DATA_DIR") {
            self.storage.data_dir = PathBuf::from(data_dir);
        }
    }

    /// Ensure the data directory exists.
    pub fn ensure_data_dir(&self) -> Result<()> {
        std::fs::create_dir_all(&self.storage.data_dir).with_context(|| {
            format!(
                "Failed to create data directory: {}",
                self.storage.data_dir.display()
            )
        })?;
        Ok(())
    }
}
