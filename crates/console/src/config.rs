//! Console settings management
//!
//! Settings live in a TOML file holding the log configuration and the list
//! of registered servers. The file is read once at startup and rewritten
//! whenever a server is added from the UI.

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

/// One registered monitored server
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerSettings {
    /// Display name, unique across the list
    pub name: String,
    /// Host name or IP address
    pub address: String,
    /// Monitor port
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConsoleConfig {
    pub console: ConsoleSettings,
    #[serde(default)]
    pub servers: Vec<ServerSettings>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConsoleSettings {
    pub log_level: String,
    /// Directory for log files (`~` is expanded). Defaults to the local data dir.
    #[serde(default)]
    pub log_dir: Option<String>,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            console: ConsoleSettings {
                log_level: "info".to_string(),
                log_dir: None,
            },
            servers: Vec::new(),
        }
    }
}

impl ConsoleConfig {
    /// Find a registered server sharing the name or the address and port
    pub fn find_conflict(&self, name: &str, address: &str, port: u16) -> Option<&ServerSettings> {
        self.servers
            .iter()
            .find(|s| (s.address == address && s.port == port) || s.name == name)
    }

    /// Register a server; the caller has already checked for conflicts
    pub fn add_server(&mut self, server: ServerSettings) {
        self.servers.push(server);
    }

    /// Resolved log directory, if one is configured
    pub fn log_dir(&self) -> Option<PathBuf> {
        self.console
            .log_dir
            .as_deref()
            .map(|dir| PathBuf::from(shellexpand::tilde(dir).as_ref()))
    }
}

impl ConsoleConfig {
    /// Load settings from the specified path, or from the default location
    pub fn load(path: Option<PathBuf>) -> Result<Self> {
        let config_path = path.unwrap_or_else(Self::default_path);
        Self::load_from(&config_path)
    }

    /// Load settings from the default location, or return defaults if no file exists
    ///
    /// A file that exists but cannot be read, parsed or validated is an error,
    /// so the servers it holds are never overwritten by a later save.
    pub fn load_or_default() -> Result<Self> {
        Self::load_or_default_at(&Self::default_path())
    }

    /// Load settings from `path`, or return defaults if no file exists there
    pub fn load_or_default_at(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        Self::load_from(path)
    }

    fn load_from(config_path: &Path) -> Result<Self> {
        let content = fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read config file: {}", config_path.display()))?;

        let config: ConsoleConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", config_path.display()))?;

        config.validate().with_context(|| {
            format!("Invalid config file: {}", config_path.display())
        })?;

        tracing::info!("Loaded configuration from: {}", config_path.display());
        tracing::debug!("Config: {} registered servers", config.servers.len());
        Ok(config)
    }

    /// Save settings to the specified path
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self).context("Failed to serialize configuration")?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        tracing::info!("Saved configuration to: {}", path.display());
        Ok(())
    }

    /// Get the default configuration file path
    pub fn default_path() -> PathBuf {
        if let Some(config_dir) = dirs::config_dir() {
            config_dir.join("monitor-console").join("console.toml")
        } else {
            PathBuf::from(".config/monitor-console/console.toml")
        }
    }

    /// Validate configuration values
    fn validate(&self) -> Result<()> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.console.log_level.as_str()) {
            return Err(anyhow!(
                "Invalid log level '{}', must be one of: {}",
                self.console.log_level,
                valid_levels.join(", ")
            ));
        }

        let mut names = HashSet::new();
        let mut endpoints = HashSet::new();
        for server in &self.servers {
            if server.name.trim().is_empty() {
                return Err(anyhow!("Empty server name in servers list"));
            }
            if server.address.trim().is_empty() {
                return Err(anyhow!("Server '{}' has an empty address", server.name));
            }
            if server.port == 0 {
                return Err(anyhow!("Server '{}' has port 0", server.name));
            }
            if !names.insert(server.name.as_str()) {
                return Err(anyhow!("Duplicate server name '{}'", server.name));
            }
            if !endpoints.insert((server.address.as_str(), server.port)) {
                return Err(anyhow!(
                    "Duplicate server endpoint {}:{}",
                    server.address,
                    server.port
                ));
            }
        }

        Ok(())
    }
}
