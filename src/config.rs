use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::data::Field;
use crate::stats::{Dispersion, Tendency};

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub system: SystemConfig,
    #[serde(default)]
    pub forecast: ForecastConfig,
    #[serde(default)]
    pub feed: FeedConfig,
    #[serde(default)]
    pub monitoring: MonitoringConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SystemConfig {
    #[serde(default = "default_database_path")]
    pub database_path: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ForecastConfig {
    #[serde(default)]
    pub tendency: Tendency,
    #[serde(default)]
    pub dispersion: Dispersion,
    /// -1 favors down moves, 1 favors up moves.
    #[serde(default)]
    pub bias: i64,
    #[serde(default)]
    pub field: Field,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FeedConfig {
    #[serde(default = "default_feed_url")]
    pub base_url: String,
    #[serde(default = "default_feed_function")]
    pub function: String,
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MonitoringConfig {
    #[serde(default)]
    pub csv_logging: bool,
    #[serde(default = "default_csv_log_path")]
    pub csv_log_path: String,
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_database_path() -> String { "tradecast.db".to_string() }
fn default_feed_url() -> String { "https://www.alphavantage.co/query".to_string() }
fn default_feed_function() -> String { "TIME_SERIES_DAILY".to_string() }
fn default_timeout() -> u64 { 30 }
fn default_csv_log_path() -> String { "forecasts.csv".to_string() }
fn default_log_level() -> String { "info".to_string() }

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
        }
    }
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            base_url: default_feed_url(),
            function: default_feed_function(),
            timeout_secs: default_timeout(),
        }
    }
}

impl Default for MonitoringConfig {
    fn default() -> Self {
        Self {
            csv_logging: false,
            csv_log_path: default_csv_log_path(),
            log_level: default_log_level(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct EnvConfig {
    pub alphavantage_api_key: Option<String>,
    pub alphavantage_url: Option<String>,
}

impl Config {
    pub fn load(path: &str) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path))?;

        Self::parse(&contents).with_context(|| format!("Failed to parse config file: {}", path))
    }

    /// Defaults when `path` does not exist; a present but broken file is still an error.
    pub fn load_or_default(path: &str) -> Result<(Self, bool)> {
        if Path::new(path).exists() {
            Ok((Self::load(path)?, true))
        } else {
            Ok((Self::default(), false))
        }
    }

    pub fn parse(contents: &str) -> Result<Self> {
        let config: Config = toml::from_str(contents)?;
        Ok(config)
    }
}

impl EnvConfig {
    pub fn load() -> Self {
        dotenv::dotenv().ok();

        Self {
            alphavantage_api_key: std::env::var("ALPHAVANTAGE_API_KEY").ok(),
            alphavantage_url: std::env::var("ALPHAVANTAGE_URL").ok(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = Config::parse("").unwrap();

        assert_eq!(config.system.database_path, "tradecast.db");
        assert_eq!(config.forecast.tendency, Tendency::MeanLeastDifference);
        assert_eq!(config.forecast.dispersion, Dispersion::MeanAbsoluteDeviation);
        assert_eq!(config.forecast.field, Field::Close);
        assert_eq!(config.forecast.bias, 0);
        assert_eq!(config.feed.function, "TIME_SERIES_DAILY");
        assert!(!config.monitoring.csv_logging);
    }

    #[test]
    fn test_partial_config() {
        let config = Config::parse(
            r#"
            [system]
            database_path = "/tmp/btc.db"

            [forecast]
            tendency = "median"
            dispersion = "standard_deviation"
            bias = -1
            field = "high"

            [monitoring]
            csv_logging = true
            "#,
        )
        .unwrap();

        assert_eq!(config.system.database_path, "/tmp/btc.db");
        assert_eq!(config.forecast.tendency, Tendency::Median);
        assert_eq!(config.forecast.dispersion, Dispersion::StandardDeviation);
        assert_eq!(config.forecast.bias, -1);
        assert_eq!(config.forecast.field, Field::High);
        assert!(config.monitoring.csv_logging);
        assert_eq!(config.monitoring.csv_log_path, "forecasts.csv");
    }

    #[test]
    fn test_unknown_tendency_is_rejected() {
        assert!(Config::parse("[forecast]\ntendency = \"mode\"").is_err());
    }

    #[test]
    fn test_missing_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.toml");

        let (config, found) = Config::load_or_default(&path.to_string_lossy()).unwrap();
        assert!(!found);
        assert_eq!(config.feed.timeout_secs, 30);
    }
}
