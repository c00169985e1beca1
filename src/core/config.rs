use crate::core::scenario::ScenarioInputs;
use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use std::{fs, path::PathBuf};
use tracing::debug;

pub const DEFAULT_EXCHANGERATE_URL: &str = "https://api.exchangerate.host";

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ExchangeRateProviderConfig {
    pub base_url: String,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ProvidersConfig {
    pub exchangerate: Option<ExchangeRateProviderConfig>,
}

impl Default for ProvidersConfig {
    fn default() -> Self {
        ProvidersConfig {
            exchangerate: Some(ExchangeRateProviderConfig {
                base_url: DEFAULT_EXCHANGERATE_URL.to_string(),
            }),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct RatesConfig {
    /// Seconds to wait for the rate service before giving up on a refresh.
    pub timeout_secs: u64,
}

impl Default for RatesConfig {
    fn default() -> Self {
        RatesConfig { timeout_secs: 10 }
    }
}

impl RatesConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub scenario: ScenarioInputs,
    #[serde(default)]
    pub providers: ProvidersConfig,
    #[serde(default)]
    pub rates: RatesConfig,
}

impl AppConfig {
    /// Loads the default config file, falling back to built-in defaults when
    /// there is none yet.
    pub fn load() -> Result<Self> {
        debug!("Loading default config");
        let config_path = Self::default_config_path()?;
        if !config_path.exists() {
            debug!(
                "No config at {}, using built-in defaults",
                config_path.display()
            );
            return Ok(Self::default());
        }
        Self::load_from_path(&config_path)
    }

    pub fn default_config_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("io", "landed", "landed")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.config_dir().join("config.yaml"))
    }

    pub fn load_from_path<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let config_str = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: Self = serde_yaml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;
        debug!("Successfully loaded config");
        Ok(config)
    }

    pub fn exchangerate_url(&self) -> &str {
        self.providers
            .exchangerate
            .as_ref()
            .map_or(DEFAULT_EXCHANGERATE_URL, |p| &p.base_url)
    }
}
