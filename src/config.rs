//! Local configuration management.
//!
//! Config is stored at `~/.config/expenseflow/config.toml` and contains:
//! - API key, base URL and model for the assistant
//! - Mock backend latency and list page size for the CLI
//! - UI preferences (theme, sidebar, currency), which are safe to lose

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};

use crate::types::CurrencyCode;

const CONFIG_DIR: &str = "expenseflow";
const CONFIG_FILE: &str = "config.toml";

/// Process-wide UI preferences.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preferences {
    #[serde(default = "default_dark_mode")]
    pub dark_mode: bool,

    #[serde(default)]
    pub sidebar_open: bool,

    /// Currency amounts are displayed in. Follows the active organization.
    #[serde(default)]
    pub currency: CurrencyCode,
}

fn default_dark_mode() -> bool {
    true
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            dark_mode: default_dark_mode(),
            sidebar_open: false,
            currency: CurrencyCode::default(),
        }
    }
}

/// Local configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// API key for the chat assistant.
    #[serde(default)]
    pub assistant_api_key: Option<String>,

    /// Base URL for an OpenAI-compatible API (default: https://api.openai.com).
    #[serde(default = "default_assistant_base_url")]
    pub assistant_base_url: String,

    /// Chat model (default: gpt-4o-mini).
    #[serde(default = "default_assistant_model")]
    pub assistant_model: String,

    /// Artificial latency added to every mock backend call.
    #[serde(default)]
    pub backend_latency_ms: u64,

    #[serde(default = "default_page_size")]
    pub page_size: usize,

    #[serde(default)]
    pub preferences: Preferences,
}

fn default_assistant_base_url() -> String {
    "https://api.openai.com".to_string()
}

fn default_assistant_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_page_size() -> usize {
    crate::views::DEFAULT_PAGE_SIZE
}

impl Default for Config {
    fn default() -> Self {
        Self {
            assistant_api_key: None,
            assistant_base_url: default_assistant_base_url(),
            assistant_model: default_assistant_model(),
            backend_latency_ms: 0,
            page_size: default_page_size(),
            preferences: Preferences::default(),
        }
    }
}

impl Config {
    /// Load config from the default location.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// Load config from `path`, falling back to defaults if it does not exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).context("Failed to read config file")?;

        toml::from_str(&content).context("Failed to parse config file")
    }

    /// Save config to the default location.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;

        std::fs::write(path, content).context("Failed to write config file")
    }

    /// Get the assistant API key as a SecretString.
    pub fn assistant_api_key_secret(&self) -> Option<SecretString> {
        self.assistant_api_key
            .clone()
            .filter(|k| !k.is_empty())
            .map(SecretString::from)
    }

    pub fn has_assistant_key(&self) -> bool {
        self.assistant_api_key
            .as_ref()
            .map(|k| !k.is_empty())
            .unwrap_or(false)
    }

    pub fn set_assistant_key(&mut self, key: String) {
        self.assistant_api_key = Some(key);
    }

    pub fn backend_latency(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.backend_latency_ms)
    }

    /// Get the config file path.
    pub fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir().context("Could not determine config directory")?;

        Ok(config_dir.join(CONFIG_DIR).join(CONFIG_FILE))
    }
}
