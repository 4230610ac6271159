pub mod error;

pub use error::{ConfigError, ConfigResult};

use crate::console::VerbosityLevel;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

pub const TOKEN_ENV_VAR: &str = "REPASTE_GITHUB_TOKEN";

const SETTABLE_KEYS: &str = "github_token, verbosity, log_window, maintainer, jsx_channels, \
     gist_api_base, shortener_url, prettier_path";

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct AppConfig {
    #[serde(default)]
    pub github_token: Option<String>,
    #[serde(default)]
    pub verbosity: Option<String>,
    /// How many recent chat lines a bare `repaste` looks through.
    #[serde(default = "default_log_window")]
    pub log_window: usize,
    /// Nick pinged when the bot hits something it cannot handle.
    #[serde(default = "default_maintainer")]
    pub maintainer: String,
    /// Channels whose scripts are published as `.jsx`.
    #[serde(default = "default_jsx_channels")]
    pub jsx_channels: Vec<String>,
    #[serde(default = "default_gist_api_base")]
    pub gist_api_base: String,
    #[serde(default)]
    pub shortener_url: Option<String>,
    #[serde(default = "default_prettier_path")]
    pub prettier_path: String,
}

fn default_log_window() -> usize {
    500
}

fn default_maintainer() -> String {
    "ljharb".to_string()
}

fn default_jsx_channels() -> Vec<String> {
    vec!["#reactjs".to_string()]
}

fn default_gist_api_base() -> String {
    "https://api.github.com".to_string()
}

fn default_prettier_path() -> String {
    "prettier".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            github_token: None,
            verbosity: None,
            log_window: default_log_window(),
            maintainer: default_maintainer(),
            jsx_channels: default_jsx_channels(),
            gist_api_base: default_gist_api_base(),
            shortener_url: None,
            prettier_path: default_prettier_path(),
        }
    }
}

impl AppConfig {
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;
        let mut config = Self::load_from(&config_path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Loads the config at `path`, writing the defaults there first if the
    /// file does not exist yet.
    pub fn load_from(path: &Path) -> Result<Self> {
        let config = if path.exists() {
            let content = fs::read_to_string(path).context("Failed to read config file")?;
            toml::from_str(&content).context("Failed to parse config file")?
        } else {
            let config = Self::default();
            config.save_to(path)?;
            config
        };

        Ok(config)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).context("Failed to create config directory")?;
        }
        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        fs::write(path, content).context("Failed to write config file")
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(token) = std::env::var(TOKEN_ENV_VAR)
            && !token.is_empty()
        {
            self.github_token = Some(token);
        }
    }

    /// The token, treating an empty string as unset.
    pub fn token(&self) -> Option<&str> {
        self.github_token.as_deref().filter(|t| !t.is_empty())
    }

    pub fn update_setting(&mut self, key: &str, value: String) -> ConfigResult<()> {
        match key {
            "github_token" => self.github_token = Some(value),
            "verbosity" => {
                if VerbosityLevel::parse(&value).is_none() {
                    return Err(ConfigError::InvalidValue {
                        field: key.to_string(),
                        value,
                    });
                }
                self.verbosity = Some(value);
            }
            "log_window" => {
                self.log_window = value.parse().map_err(|_| ConfigError::InvalidValue {
                    field: key.to_string(),
                    value: value.clone(),
                })?;
            }
            "maintainer" => self.maintainer = value,
            "jsx_channels" => {
                self.jsx_channels = value
                    .split(',')
                    .map(|c| c.trim().to_string())
                    .filter(|c| !c.is_empty())
                    .collect();
            }
            "gist_api_base" => self.gist_api_base = value.trim_end_matches('/').to_string(),
            "shortener_url" => {
                self.shortener_url = if value.is_empty() { None } else { Some(value) };
            }
            "prettier_path" => self.prettier_path = value,
            _ => {
                return Err(ConfigError::UnknownConfigKey {
                    key: key.to_string(),
                    available: SETTABLE_KEYS.to_string(),
                });
            }
        }

        Ok(())
    }

    /// Get the configured verbosity level, falling back to Normal if not set
    pub fn get_verbosity(&self) -> VerbosityLevel {
        self.verbosity
            .as_deref()
            .and_then(VerbosityLevel::parse)
            .unwrap_or(VerbosityLevel::Normal)
    }

    pub fn config_path() -> ConfigResult<PathBuf> {
        let mut path = dirs::home_dir().ok_or(ConfigError::NoHomeDirectory)?;
        path.push(".config");
        path.push("repaste");
        path.push("config.toml");
        Ok(path)
    }
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
