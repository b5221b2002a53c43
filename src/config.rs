use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

/// Default configuration file name
pub const DEFAULT_CONFIG_FILE: &str = ".slashdeck.toml";

/// Base URL of the platform REST API
pub const DEFAULT_API_BASE_URL: &str = "https://discord.com/api/v10";

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub bot: BotConfig,
    #[serde(default)]
    pub plugins: PluginsConfig,
    /// Permission tag to role ids, e.g. `MODERATE = ["123", "456"]`
    #[serde(default)]
    pub permissions: HashMap<String, Vec<String>>,
    #[serde(default)]
    pub dispatch: DispatchConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct BotConfig {
    /// Bot token used for the `Authorization: Bot` header
    #[serde(default)]
    pub token: Option<String>,
    /// Application id the bot's commands are registered under
    #[serde(default)]
    pub application_id: Option<String>,
    /// Guilds to synchronize when none are given on the command line
    #[serde(default)]
    pub guilds: Vec<String>,
    /// Override for the REST API base URL
    #[serde(default)]
    pub api_base_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct PluginsConfig {
    /// Directory of plugin manifests. When unset, every built-in plugin is loaded.
    #[serde(default)]
    pub directory: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct DispatchConfig {
    /// Upper bound on a single command execution, in seconds
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

impl Config {
    /// Load `.slashdeck.toml` from the working directory, or defaults when
    /// there is none
    pub fn load() -> Result<Self> {
        Self::load_from_dir(Path::new("."))
    }

    /// Load `.slashdeck.toml` from `dir`, or defaults when there is none
    pub fn load_from_dir(dir: &Path) -> Result<Self> {
        let path = dir.join(DEFAULT_CONFIG_FILE);
        if !path.exists() {
            debug!("No {} in {:?}, using defaults", DEFAULT_CONFIG_FILE, dir);
            return Ok(Config::default());
        }
        Self::from_file(&path)
    }

    /// Load configuration from a file the user named; it must exist
    pub fn from_file(config_path: &Path) -> Result<Self> {
        if !config_path.exists() {
            return Err(Error::Config(format!(
                "config file {:?} not found",
                config_path
            )));
        }

        let content = fs::read_to_string(config_path).map_err(|e| {
            Error::Config(format!(
                "Failed to read config file {:?}: {}",
                config_path, e
            ))
        })?;

        Self::from_toml(&content).map_err(|e| match e {
            Error::Config(msg) => Error::Config(format!("{:?}: {}", config_path, msg)),
            other => other,
        })
    }

    /// Parse configuration from TOML text
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content)
            .map_err(|e| Error::Config(format!("Failed to parse TOML config: {}", e)))
    }

    /// Bot token, required for any platform call
    pub fn token(&self) -> Result<&str> {
        self.bot
            .token
            .as_deref()
            .filter(|t| !t.is_empty())
            .ok_or_else(|| Error::Config("bot token is not set".to_string()))
    }

    /// Application id, required to address the command endpoints
    pub fn application_id(&self) -> Result<&str> {
        self.bot
            .application_id
            .as_deref()
            .filter(|id| !id.is_empty())
            .ok_or_else(|| Error::Config("application id is not set".to_string()))
    }

    pub fn api_base_url(&self) -> &str {
        self.bot
            .api_base_url
            .as_deref()
            .unwrap_or(DEFAULT_API_BASE_URL)
    }

    pub fn dispatch_timeout(&self) -> Option<Duration> {
        self.dispatch
            .timeout_secs
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
    }
}
