use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};

use crate::provider::{
    openmeteo::DEFAULT_FORECAST_URL, openweather::DEFAULT_CURRENT_WEATHER_URL,
};

/// Environment variable that overrides the configured OpenWeather key.
pub const API_KEY_ENV: &str = "OPENWEATHER_API_KEY";

pub const DEFAULT_CITY: &str = "Mbeya";

/// Provider endpoints. Overridable so the app can be pointed at a proxy or a mock server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Endpoints {
    pub current_weather_url: String,
    pub forecast_url: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            current_weather_url: DEFAULT_CURRENT_WEATHER_URL.to_string(),
            forecast_url: DEFAULT_FORECAST_URL.to_string(),
        }
    }
}

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// api_key = "..."
/// default_city = "Mbeya"
/// timeout_secs = 10
///
/// [endpoints]
/// forecast_url = "https://api.open-meteo.com/v1/forecast"
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// OpenWeather API key.
    pub api_key: Option<String>,

    /// City looked up when the current-conditions view is first shown.
    pub default_city: String,

    /// Request timeout; absent means the HTTP client's default.
    pub timeout_secs: Option<u64>,

    pub endpoints: Endpoints,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            default_city: DEFAULT_CITY.to_string(),
            timeout_secs: None,
            endpoints: Endpoints::default(),
        }
    }
}

impl Config {
    /// API key from the environment, falling back to the config file. Blank keys count as absent.
    pub fn resolve_api_key(&self) -> Option<String> {
        let non_blank = |k: &String| !k.trim().is_empty();
        std::env::var(API_KEY_ENV)
            .ok()
            .filter(non_blank)
            .or_else(|| self.api_key.clone().filter(non_blank))
    }

    pub fn set_api_key(&mut self, api_key: String) {
        self.api_key = Some(api_key);
    }

    /// Replace the default city; blank input keeps the current one.
    pub fn set_default_city(&mut self, city: &str) {
        let city = city.trim();
        if !city.is_empty() {
            self.default_city = city.to_string();
        }
    }

    /// Load config from disk, or return defaults if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::from_toml(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    pub fn from_toml(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<PathBuf> {
        let path = Self::config_file_path()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(&path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(path)
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "weatherwise", "weatherwise")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }
}
