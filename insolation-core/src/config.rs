use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{env, fs, path::PathBuf};

/// Top-level configuration, stored on disk as TOML.
///
/// Endpoint URLs and the store key can also come from the environment
/// (`INSOLATION_*` variables), which wins over the file. Secrets never get a
/// baked-in default.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub store: StoreConfig,
    pub inference: InferenceConfig,
    pub coverage: CoverageConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Listen address, e.g. "0.0.0.0:8000".
    pub bind: String,
}

/// Weather store endpoint (PostgREST dialect).
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct StoreConfig {
    pub url: String,
    pub api_key: String,
    pub table: String,
}

/// Base URLs of the two hosted prediction endpoints.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct InferenceConfig {
    /// Model fed the fifteen stored weather features.
    pub feature_url: String,
    /// Model fed the bare date/time tuple.
    pub forecast_url: String,
}

/// Historical coverage window and the out-of-window behavior.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CoverageConfig {
    pub min_year: i32,
    pub max_year: i32,
    /// When true, years outside the window are answered by the forecast
    /// model; when false, they go through the store like any other year.
    pub forecast_fallback: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { bind: "0.0.0.0:8000".to_string() }
    }
}

impl Default for CoverageConfig {
    fn default() -> Self {
        Self { min_year: 2009, max_year: 2023, forecast_fallback: true }
    }
}

impl Config {
    /// Load config from disk (if present), then apply environment overrides.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        let mut cfg = if path.exists() {
            let contents = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read config file: {}", path.display()))?;

            toml::from_str(&contents)
                .with_context(|| format!("Failed to parse config file: {}", path.display()))?
        } else {
            Self::default()
        };

        cfg.apply_env_overrides();
        Ok(cfg)
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "insolation", "insolation-server")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(v) = env::var("INSOLATION_BIND") {
            self.server.bind = v;
        }
        if let Ok(v) = env::var("INSOLATION_STORE_URL") {
            self.store.url = v;
        }
        if let Ok(v) = env::var("INSOLATION_STORE_KEY") {
            self.store.api_key = v;
        }
        if let Ok(v) = env::var("INSOLATION_STORE_TABLE") {
            self.store.table = v;
        }
        if let Ok(v) = env::var("INSOLATION_FEATURE_URL") {
            self.inference.feature_url = v;
        }
        if let Ok(v) = env::var("INSOLATION_FORECAST_URL") {
            self.inference.forecast_url = v;
        }
    }

    /// Fail early at startup when a required endpoint is not configured.
    pub fn ensure_complete(&self) -> Result<()> {
        if self.store.url.is_empty() {
            return Err(anyhow!(
                "No weather store URL configured.\n\
                 Hint: set INSOLATION_STORE_URL or add [store] url to config.toml."
            ));
        }
        if self.store.api_key.is_empty() {
            return Err(anyhow!(
                "No weather store API key configured.\n\
                 Hint: set INSOLATION_STORE_KEY or add [store] api_key to config.toml."
            ));
        }
        if self.inference.feature_url.is_empty() {
            return Err(anyhow!(
                "No feature-model URL configured.\n\
                 Hint: set INSOLATION_FEATURE_URL or add [inference] feature_url to config.toml."
            ));
        }
        if self.forecast_fallback() && self.inference.forecast_url.is_empty() {
            return Err(anyhow!(
                "Forecast fallback is enabled but no forecast-model URL is configured.\n\
                 Hint: set INSOLATION_FORECAST_URL, or disable [coverage] forecast_fallback."
            ));
        }
        Ok(())
    }

    pub fn forecast_fallback(&self) -> bool {
        self.coverage.forecast_fallback
    }

    /// Table holding the hourly observations; defaults to "Hourly_weather".
    pub fn store_table(&self) -> &str {
        if self.store.table.is_empty() { "Hourly_weather" } else { &self.store.table }
    }
}
