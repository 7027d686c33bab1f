//! Board configuration
//!
//! Stored at `<config dir>/taskboard/config.toml` (XDG on Linux). A missing
//! or unreadable file means defaults; `TASKBOARD_API_URL` overrides the
//! configured backend.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::core::models::DEFAULT_LIST;

/// Environment variable overriding [`StoreConfig::api_url`]
pub const API_URL_ENV: &str = "TASKBOARD_API_URL";

const CONFIG_DIR: &str = "taskboard";
const CONFIG_FILE: &str = "config.toml";

/// Board configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardConfig {
    /// Backend connection
    #[serde(default)]
    pub store: StoreConfig,
    /// Board behaviour
    #[serde(default)]
    pub board: BoardSettings,
}

/// Where the task store lives
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Base URL of the REST backend
    #[serde(default = "default_api_url")]
    pub api_url: String,
    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_api_url() -> String {
    "http://localhost:3000/api".to_string()
}

const fn default_timeout_secs() -> u64 {
    10
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Board settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardSettings {
    /// List used when a task is created without one
    #[serde(default = "default_fallback_list")]
    pub fallback_list: String,
}

fn default_fallback_list() -> String {
    DEFAULT_LIST.to_string()
}

impl Default for BoardSettings {
    fn default() -> Self {
        Self {
            fallback_list: default_fallback_list(),
        }
    }
}

impl BoardConfig {
    /// Directory holding the config file
    #[must_use]
    pub fn config_dir() -> PathBuf {
        dirs::config_dir()
            .or_else(|| dirs::home_dir().map(|home| home.join(".config")))
            .unwrap_or_else(|| PathBuf::from(".config"))
            .join(CONFIG_DIR)
    }

    /// Path of the config file
    #[must_use]
    pub fn config_path() -> PathBuf {
        Self::config_dir().join(CONFIG_FILE)
    }

    /// Load the user's config, falling back to defaults
    ///
    /// Environment overrides are applied on top.
    #[must_use]
    pub fn load() -> Self {
        let path = Self::config_path();
        let mut config = if path.exists() {
            Self::load_from(&path).unwrap_or_else(|err| {
                log::warn!("Ignoring config at {}: {err:#}", path.display());
                Self::default()
            })
        } else {
            Self::default()
        };
        config.apply_env();
        config
    }

    /// Load a config file, failing on unreadable or malformed content
    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        let content = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
        let config = toml::from_str(&content).with_context(|| format!("parsing {}", path.display()))?;
        Ok(config)
    }

    /// Save to the user's config file
    pub fn save(&self) -> anyhow::Result<()> {
        self.save_to(&Self::config_path())
    }

    /// Save to a specific path, creating parent directories
    pub fn save_to(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)?;
        }
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Apply `TASKBOARD_API_URL` if it is set and non-empty
    pub fn apply_env(&mut self) {
        self.override_api_url(std::env::var(API_URL_ENV).ok());
    }

    /// Replace the API URL when `url` holds a non-empty value
    pub fn override_api_url(&mut self, url: Option<String>) {
        if let Some(url) = url.filter(|u| !u.trim().is_empty()) {
            self.store.api_url = url;
        }
    }

    /// Per-request timeout
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.store.timeout_secs)
    }
}
