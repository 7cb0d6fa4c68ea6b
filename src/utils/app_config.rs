/// Application configuration management
/// Stores user preferences in ~/.config/sysglance/config.toml

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Persisted knobs. Durations are humantime strings ("3s", "100ms") so the
/// file reads the same way the CLI flags do; CLI flags override file values.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Collection cadence (default 3s)
    pub interval: Option<String>,
    /// Loading spinner tick (default 100ms)
    pub tick: Option<String>,
    /// Default per-probe timeout (default 10s)
    pub probe_timeout: Option<String>,
    /// Panel columns (default 2)
    pub columns: Option<usize>,
    /// Directory tree depth (default 2)
    pub tree_depth: Option<usize>,
    /// Files shown per directory in the tree (default 5)
    pub tree_files: Option<usize>,
}

impl AppConfig {
    /// Get config file path
    pub fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Could not determine config directory")?
            .join("sysglance");

        // Create directory if it doesn't exist
        fs::create_dir_all(&config_dir)
            .context("Failed to create config directory")?;

        Ok(config_dir.join("config.toml"))
    }

    /// Load configuration from file
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;

        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&path)
            .context("Failed to read config file")?;

        let config: Self = toml::from_str(&contents)
            .context("Failed to parse config file")?;

        Ok(config)
    }

    /// Save configuration to file
    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;
        let contents = toml::to_string_pretty(self)
            .context("Failed to serialize config")?;

        fs::write(&path, contents)
            .context("Failed to write config file")?;

        Ok(())
    }
}
