//! Configuration management for the Dezire wallet libraries.
//!
//! Settings are stored in TOML format. The structure is strongly typed, every field has
//! a reasonable default, and `validate` checks the values that the selection code relies
//! on before they are used.
//!
//! ```toml
//! [selection]
//! network = "bitcoin"
//! min_broadcast_peers = 1
//!
//! [logging]
//! level = "Info"
//! console_logging = true
//! json_format = false
//! ```

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::fs;
use std::path::Path;

use crate::logging::{self, LogConfig, LogLevel};
use crate::types::{parse_network, DEFAULT_MIN_BROADCAST_PEERS};
use bitcoin::Network;

/// Main configuration structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub selection: SelectionConfig,

    #[serde(default)]
    pub logging: LogConfig,
}

/// Coin selection configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionConfig {
    /// bitcoin, testnet, signet or regtest
    #[serde(default = "default_network")]
    pub network: String,

    /// Self-originated pending transactions need strictly more peers than this
    #[serde(default = "default_min_broadcast_peers")]
    pub min_broadcast_peers: u32,

    /// Override of the "select everything" sentinel, in satoshis
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_money_sats: Option<u64>,
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            network: default_network(),
            min_broadcast_peers: default_min_broadcast_peers(),
            max_money_sats: None,
        }
    }
}

impl SelectionConfig {
    /// Parsed network
    pub fn network(&self) -> Result<Network> {
        parse_network(&self.network).map_err(|e| anyhow!(e))
    }
}

impl Config {
    /// Load configuration from file
    pub fn load(path: &str) -> Result<Self> {
        let content =
            fs::read_to_string(path).map_err(|e| anyhow!("Failed to read config file: {}", e))?;

        let config = Self::from_toml_str(&content)?;

        logging::log_config(
            LogLevel::Debug,
            "configuration loaded",
            Some(json!({ "path": path, "network": config.selection.network })),
        );

        Ok(config)
    }

    /// Parse configuration from a TOML document
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| anyhow!("Failed to parse config file: {}", e))
    }

    /// Save configuration to file
    pub fn save(&self, path: &str) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| anyhow!("Failed to serialize config: {}", e))?;

        fs::write(path, content).map_err(|e| anyhow!("Failed to write config file: {}", e))?;

        logging::log_config(
            LogLevel::Info,
            "configuration saved",
            Some(json!({ "path": path })),
        );

        Ok(())
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        self.selection.network()?;

        if self.selection.max_money_sats == Some(0) {
            return Err(anyhow!(
                "Invalid max_money_sats: must be greater than 0"
            ));
        }

        if let Some(file) = &self.logging.log_file {
            if file.trim().is_empty() {
                anyhow::bail!("Invalid log file: path must not be empty");
            }
        }

        Ok(())
    }
}

/// Ensure a configuration file exists at the specified path
/// If it doesn't exist, create it with default values
pub fn ensure_config_exists(path: &Path) -> Result<()> {
    if !path.exists() {
        let default_config = Config::default();
        let content = toml::to_string_pretty(&default_config)
            .map_err(|e| anyhow!("Failed to serialize default config: {}", e))?;

        if let Some(parent) = path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent)
                    .map_err(|e| anyhow!("Failed to create config directory: {}", e))?;
            }
        }

        fs::write(path, content)
            .map_err(|e| anyhow!("Failed to write default config file: {}", e))?;

        logging::log_config(
            LogLevel::Info,
            "default configuration written",
            Some(logging::log_params(vec![(
                "path",
                path.display().to_string(),
            )])),
        );
    }

    Ok(())
}

// Default value functions

fn default_network() -> String {
    "bitcoin".to_string()
}

fn default_min_broadcast_peers() -> u32 {
    DEFAULT_MIN_BROADCAST_PEERS
}
