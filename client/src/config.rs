//! Configuration loading
//!
//! Configuration is loaded from:
//! 1. Environment variable EXEMPLAR_CONFIG_PATH
//! 2. <config dir>/exemplar/exemplar.toml
//! 3. Default values
//!
//! The EXEMPLAR_URL environment variable overrides the service URL from
//! any of the above.

use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Query service configuration
    #[serde(default)]
    pub service: ServiceConfig,
    /// Search behavior configuration
    #[serde(default)]
    pub search: SearchConfig,
    /// Usage reporting configuration
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

/// Query service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Base URL of the article service
    #[serde(default = "default_service_url")]
    pub url: String,
    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// User agent sent with every request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

/// Search behavior configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Quiet period after the last keystroke before a query is submitted
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
}

/// Usage reporting configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelemetryConfig {
    /// Enable recording of submitted queries to the local usage store
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Path of the usage database; defaults to the user config directory
    #[serde(default)]
    pub db_path: Option<PathBuf>,
}

// Default value functions
fn default_service_url() -> String {
    "http://localhost:5000".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_user_agent() -> String {
    "exemplar-client/0.1".to_string()
}

fn default_debounce_ms() -> u64 {
    1000
}

fn default_true() -> bool {
    true
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            url: default_service_url(),
            timeout_secs: default_timeout_secs(),
            user_agent: default_user_agent(),
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
        }
    }
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            db_path: None,
        }
    }
}

impl TelemetryConfig {
    /// Resolve the usage database path, or None when reporting is disabled.
    pub fn resolved_db_path(&self) -> Option<PathBuf> {
        if !self.enabled {
            return None;
        }

        self.db_path
            .clone()
            .or_else(|| dirs::config_dir().map(|dir| dir.join("exemplar").join("usage.db")))
    }
}

impl Config {
    /// Load configuration from file or use defaults
    pub fn load() -> Result<Self> {
        let mut config = match Self::find_config_path() {
            Some(path) if path.exists() => {
                tracing::info!("Loading config from: {}", path.display());
                Self::load_from(&path)?
            }
            _ => {
                tracing::debug!("No config file found, using defaults");
                Self::default()
            }
        };

        // Service URL from environment (highest priority)
        if let Ok(url) = std::env::var("EXEMPLAR_URL") {
            config.service.url = url;
        }

        Ok(config)
    }

    /// Load configuration from a specific file
    pub fn load_from(path: &std::path::Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;

        toml::from_str(&content)
            .with_context(|| format!("failed to parse config file: {}", path.display()))
    }

    /// Find the configuration file path
    fn find_config_path() -> Option<PathBuf> {
        // 1. Check environment variable
        if let Ok(path) = std::env::var("EXEMPLAR_CONFIG_PATH") {
            return Some(PathBuf::from(path));
        }

        // 2. Check <config dir>/exemplar/exemplar.toml
        dirs::config_dir().map(|dir| dir.join("exemplar").join("exemplar.toml"))
    }
}
