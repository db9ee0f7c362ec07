use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Default backend when nothing is configured
pub const DEFAULT_API_URL: &str = "http://localhost:8000";

/// Environment variable that overrides the configured backend URL
pub const API_URL_ENV: &str = "PARLEY_API_URL";

/// Main application configuration. Missing fields in a hand-edited
/// config.toml fall back to their defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Base URL of the assistant backend
    pub api_url: String,

    /// Per-request deadline in seconds
    pub request_timeout_secs: u64,

    /// Parley home directory
    #[serde(skip)]
    pub home: PathBuf,

    /// UI preferences
    pub ui: UiConfig,
}

/// UI configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    pub show_timestamps: bool,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            show_timestamps: true,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("~"));

        Config {
            api_url: DEFAULT_API_URL.to_string(),
            request_timeout_secs: crate::client::REQUEST_TIMEOUT_SECS,
            home: home.join(".parley"),
            ui: UiConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from file and apply the environment override
    pub fn load() -> Result<Self> {
        let home = dirs::home_dir().context("Could not find home directory")?;
        let parley_home = home.join(".parley");
        let config_path = parley_home.join("config.toml");

        fs::create_dir_all(&parley_home).context("Failed to create .parley directory")?;

        let mut config = if config_path.exists() {
            let content =
                fs::read_to_string(&config_path).context("Failed to read config file")?;
            toml::from_str(&content).context("Failed to parse config file")?
        } else {
            Config::default()
        };

        config.home = parley_home;

        // Environment wins over the config file
        if let Ok(url) = std::env::var(API_URL_ENV) {
            if !url.trim().is_empty() {
                config.api_url = url;
            }
        }

        // A trailing slash would double up in request paths
        while config.api_url.ends_with('/') {
            config.api_url.pop();
        }

        Ok(config)
    }

    /// Save configuration to file
    #[allow(dead_code)]
    pub fn save(&self) -> Result<()> {
        let config_path = self.home.join("config.toml");
        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        fs::write(&config_path, content).context("Failed to write config file")?;
        Ok(())
    }

    /// Path of the log file the subscriber writes to
    pub fn log_path(&self) -> PathBuf {
        self.home.join("parley.log")
    }
}
