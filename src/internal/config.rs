//! Application configuration: TOML file with serde defaults, plus
//! environment-variable overrides.
//!
//! Resolution order for each setting: environment variable > config file >
//! built-in default. The config file is `--config <path>` if given, else
//! `taskdeck.toml` in the working directory, else
//! `<os config dir>/taskdeck/config.toml`; a missing file is not an error.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub web: WebConfig,
    #[serde(default)]
    pub agent: AgentConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_db_url")]
    pub url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WebConfig {
    #[serde(default = "default_web_addr")]
    pub addr: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AgentConfig {
    /// Single time budget applied to every tool call, in seconds.
    #[serde(default = "default_tool_timeout_secs")]
    pub tool_timeout_secs: u64,
    /// Sandbox root for the file tools. Defaults to the working directory.
    #[serde(default)]
    pub workspace_root: Option<PathBuf>,
}

fn default_db_url() -> String {
    "sqlite://taskdeck.db?mode=rwc".to_string()
}

fn default_web_addr() -> String {
    "127.0.0.1:8080".to_string()
}

fn default_tool_timeout_secs() -> u64 {
    30
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: default_db_url(),
        }
    }
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            addr: default_web_addr(),
        }
    }
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            tool_timeout_secs: default_tool_timeout_secs(),
            workspace_root: None,
        }
    }
}

impl Config {
    /// Load configuration, tolerating a missing file.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match Self::resolve_path(path) {
            Some(file) => {
                let raw = std::fs::read_to_string(&file)
                    .with_context(|| format!("failed to read config file {}", file.display()))?;
                toml::from_str(&raw)
                    .with_context(|| format!("failed to parse config file {}", file.display()))?
            }
            None => Self::default(),
        };
        config.apply_env_overrides();
        Ok(config)
    }

    fn resolve_path(explicit: Option<&Path>) -> Option<PathBuf> {
        if let Some(path) = explicit {
            return Some(path.to_path_buf());
        }
        let local = PathBuf::from("taskdeck.toml");
        if local.exists() {
            return Some(local);
        }
        let global = dirs::config_dir()?.join("taskdeck").join("config.toml");
        global.exists().then_some(global)
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(url) = std::env::var("TASKDECK_DATABASE_URL") {
            self.database.url = url;
        }
        if let Ok(addr) = std::env::var("TASKDECK_WEB_ADDR") {
            self.web.addr = addr;
        }
        if let Ok(secs) = std::env::var("TASKDECK_TOOL_TIMEOUT_SECS")
            && let Ok(secs) = secs.parse()
        {
            self.agent.tool_timeout_secs = secs;
        }
    }

    /// The tool time budget as a [`Duration`].
    pub fn tool_timeout(&self) -> Duration {
        Duration::from_secs(self.agent.tool_timeout_secs)
    }
}
