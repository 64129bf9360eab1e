//! Configuration loading
//!
//! Config is loaded with a two-layer resolution:
//! 1. Check for override in data dir (~/.local/share/financeflow/config.toml)
//! 2. Fall back to embedded defaults (compiled into binary)
//!
//! Environment variables `FORECAST_URL` and `FORECAST_TIMEOUT_SECS` are
//! applied on top of whichever file was used.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::error::{Error, Result};
use crate::models::CategorySet;

/// Embedded default config (compiled into binary)
const DEFAULT_CONFIG: &str = include_str!("../../../config/financeflow.toml");

const DEFAULT_TIMEOUT_SECS: u64 = 5;

/// Forecast service settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForecastConfig {
    /// Prediction endpoint; forecasting is disabled when unset
    pub endpoint: Option<String>,
    pub timeout_secs: u64,
}

impl ForecastConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

/// Values used when creating a new expense book
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BookDefaults {
    pub categories: CategorySet,
    pub budget: f64,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AppConfig {
    pub forecast: ForecastConfig,
    pub defaults: BookDefaults,
}

impl AppConfig {
    /// Load from the default override location, or the embedded defaults
    pub fn load() -> Result<Self> {
        load_config(None)
    }

    /// Load from `path` if it exists, or the embedded defaults
    pub fn load_from(path: &Path) -> Result<Self> {
        load_config(Some(path))
    }

    /// The embedded defaults, without reading files or the environment
    pub fn embedded() -> Result<Self> {
        parse_config(DEFAULT_CONFIG)
    }
}

/// Get the default override config path
pub fn default_config_path() -> Option<PathBuf> {
    dirs::data_local_dir().map(|d| d.join("financeflow").join("config.toml"))
}

/// Load configuration (override first, then default)
///
/// An explicitly given path must exist; the data dir override is optional.
fn load_config(override_path: Option<&Path>) -> Result<AppConfig> {
    let path = match override_path {
        Some(path) if !path.exists() => {
            return Err(Error::Config(format!(
                "Config file {} does not exist",
                path.display()
            )));
        }
        Some(path) => Some(path.to_path_buf()),
        None => default_config_path().filter(|path| path.exists()),
    };

    let content = match path {
        Some(ref path) => {
            tracing::debug!(path = %path.display(), "Loading config override");
            fs::read_to_string(path)
                .map_err(|e| Error::Config(format!("Failed to read {}: {}", path.display(), e)))?
        }
        None => DEFAULT_CONFIG.to_string(),
    };

    let mut config = parse_config(&content)?;
    apply_env(&mut config.forecast, |key| std::env::var(key).ok())?;
    Ok(config)
}

/// Apply `FORECAST_URL` and `FORECAST_TIMEOUT_SECS` using `var` to read them
fn apply_env(
    forecast: &mut ForecastConfig,
    var: impl Fn(&str) -> Option<String>,
) -> Result<()> {
    if let Some(url) = var("FORECAST_URL") {
        if !url.trim().is_empty() {
            forecast.endpoint = Some(url);
        }
    }
    if let Some(secs) = var("FORECAST_TIMEOUT_SECS") {
        let timeout = secs.trim().parse().map_err(|_| {
            Error::Config(format!(
                "FORECAST_TIMEOUT_SECS must be whole seconds, got '{}'",
                secs
            ))
        })?;
        forecast.timeout_secs = positive_timeout(timeout, "FORECAST_TIMEOUT_SECS")?;
    }
    Ok(())
}

fn positive_timeout(secs: u64, source: &str) -> Result<u64> {
    if secs == 0 {
        return Err(Error::Config(format!("{} must be positive", source)));
    }
    Ok(secs)
}

/// Raw config file structure
#[derive(Debug, Deserialize)]
struct RawConfig {
    forecast: Option<RawForecast>,
    defaults: Option<RawDefaults>,
}

#[derive(Debug, Deserialize)]
struct RawForecast {
    endpoint: Option<String>,
    timeout_secs: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct RawDefaults {
    categories: Option<Vec<String>>,
    budget: Option<f64>,
}

/// Parse config from TOML content
fn parse_config(content: &str) -> Result<AppConfig> {
    let raw: RawConfig = toml::from_str(content)
        .map_err(|e| Error::Config(format!("Invalid config TOML: {}", e)))?;

    let mut config = AppConfig::default();

    if let Some(forecast) = raw.forecast {
        config.forecast.endpoint = forecast.endpoint.filter(|e| !e.trim().is_empty());
        if let Some(timeout) = forecast.timeout_secs {
            config.forecast.timeout_secs = positive_timeout(timeout, "forecast.timeout_secs")?;
        }
    }

    if let Some(defaults) = raw.defaults {
        if let Some(categories) = defaults.categories {
            config.defaults.categories = categories.into_iter().collect();
        }
        if let Some(budget) = defaults.budget {
            config.defaults.budget = budget;
        }
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_default_config() {
        let config = AppConfig::embedded().unwrap();
        assert_eq!(config.forecast.endpoint, None);
        assert_eq!(config.forecast.timeout(), Duration::from_secs(5));
        assert!(config.defaults.categories.contains("Food"));
        assert_eq!(config.defaults.budget, 0.0);
    }

    #[test]
    fn test_parse_override() {
        let config = parse_config(
            r#"
            [forecast]
            endpoint = "http://localhost:5000/predict"
            timeout_secs = 2

            [defaults]
            categories = ["Rent", "Food", "Rent"]
            budget = 1500.0
            "#,
        )
        .unwrap();

        assert_eq!(
            config.forecast.endpoint.as_deref(),
            Some("http://localhost:5000/predict")
        );
        assert_eq!(config.forecast.timeout_secs, 2);
        let names: Vec<&str> = config.defaults.categories.iter().collect();
        assert_eq!(names, vec!["Rent", "Food"]);
        assert_eq!(config.defaults.budget, 1500.0);
    }

    #[test]
    fn test_parse_empty_uses_defaults() {
        let config = parse_config("").unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_parse_rejects_zero_timeout() {
        assert!(parse_config("[forecast]\ntimeout_secs = 0").is_err());
    }

    #[test]
    fn test_parse_invalid_toml() {
        let err = parse_config("[forecast").unwrap_err();
        assert!(err.to_string().contains("Invalid config TOML"));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[defaults]\nbudget = 42.0\n").unwrap();

        let config = AppConfig::load_from(&path).unwrap();
        assert_eq!(config.defaults.budget, 42.0);
        assert!(config.defaults.categories.is_empty());
    }

    #[test]
    fn test_load_from_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = AppConfig::load_from(&dir.path().join("missing.toml")).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
        assert!(err.to_string().contains("does not exist"));
    }

    fn env(pairs: &'static [(&'static str, &'static str)]) -> impl Fn(&str) -> Option<String> {
        move |key: &str| {
            pairs
                .iter()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| v.to_string())
        }
    }

    #[test]
    fn test_env_overrides() {
        let mut forecast = ForecastConfig::default();
        apply_env(
            &mut forecast,
            env(&[
                ("FORECAST_URL", "http://10.0.0.5/predict"),
                ("FORECAST_TIMEOUT_SECS", " 12 "),
            ]),
        )
        .unwrap();

        assert_eq!(forecast.endpoint.as_deref(), Some("http://10.0.0.5/predict"));
        assert_eq!(forecast.timeout_secs, 12);
    }

    #[test]
    fn test_env_rejects_bad_timeout() {
        let mut forecast = ForecastConfig::default();
        assert!(apply_env(&mut forecast, env(&[("FORECAST_TIMEOUT_SECS", "0")])).is_err());
        assert!(apply_env(&mut forecast, env(&[("FORECAST_TIMEOUT_SECS", "soon")])).is_err());
        assert_eq!(forecast.timeout_secs, 5);
    }
}
