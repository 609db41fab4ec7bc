//! Configuration management for the `cnweather` application
//!
//! Handles loading configuration from files, environment variables,
//! and provides validation for all configuration settings.

use crate::CnWeatherError;
use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Placeholder replaced by the region code in source URL templates
pub const CODE_PLACEHOLDER: &str = "{code}";

/// Root configuration structure for the `cnweather` application
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CnWeatherConfig {
    /// Forecast page sources
    #[serde(default)]
    pub source: SourceConfig,
    /// Region dataset and picker defaults
    #[serde(default)]
    pub region: RegionConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Terminal chart settings
    #[serde(default)]
    pub chart: ChartConfig,
}

/// Forecast page source settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    /// URL template of the 7-day page
    #[serde(default = "default_short_range_url")]
    pub short_range_url: String,
    /// URL template of the 15-day page
    #[serde(default = "default_extended_range_url")]
    pub extended_range_url: String,
    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u32,
    /// Browser-like User-Agent sent with every request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

/// Region dataset settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegionConfig {
    /// Path to the province/city/district JSON tree
    #[serde(default = "default_data_path")]
    pub data_path: String,
    #[serde(default = "default_province")]
    pub default_province: String,
    #[serde(default = "default_city")]
    pub default_city: String,
    #[serde(default = "default_district")]
    pub default_district: String,
}

/// Logging configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Log format (pretty or json)
    #[serde(default = "default_log_format")]
    pub format: String,
}

/// Terminal chart settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChartConfig {
    /// Width of the temperature bar in cells
    #[serde(default = "default_chart_width")]
    pub width: u32,
}

// Default value functions
fn default_short_range_url() -> String {
    "https://www.weather.com.cn/weather/{code}.shtml".to_string()
}

fn default_extended_range_url() -> String {
    "https://www.weather.com.cn/weather15d/{code}.shtml".to_string()
}

fn default_timeout() -> u32 {
    10
}

fn default_user_agent() -> String {
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
     (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36"
        .to_string()
}

fn default_data_path() -> String {
    "data/city_code.json".to_string()
}

fn default_province() -> String {
    "辽宁".to_string()
}

fn default_city() -> String {
    "沈阳".to_string()
}

fn default_district() -> String {
    "沈阳".to_string()
}

fn default_log_level() -> String {
    "warn".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

fn default_chart_width() -> u32 {
    40
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            short_range_url: default_short_range_url(),
            extended_range_url: default_extended_range_url(),
            timeout_seconds: default_timeout(),
            user_agent: default_user_agent(),
        }
    }
}

impl Default for RegionConfig {
    fn default() -> Self {
        Self {
            data_path: default_data_path(),
            default_province: default_province(),
            default_city: default_city(),
            default_district: default_district(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            width: default_chart_width(),
        }
    }
}

impl SourceConfig {
    /// Expand a URL template for the given region code
    #[must_use]
    pub fn url_for(template: &str, region_code: &str) -> String {
        template.replace(CODE_PLACEHOLDER, &urlencoding::encode(region_code))
    }
}

impl CnWeatherConfig {
    /// Load configuration from a file (the default location when `None`),
    /// then apply `CNWEATHER_*` environment overrides
    pub fn load_from_path(config_path: Option<PathBuf>) -> Result<Self> {
        let mut builder = Config::builder();

        // Load from file if path is provided or use default location
        let config_file = config_path.unwrap_or_else(|| {
            Self::get_config_path().unwrap_or_else(|| PathBuf::from("config.toml"))
        });

        if config_file.exists() {
            builder = builder.add_source(
                File::from(config_file.clone())
                    .required(false)
                    .format(config::FileFormat::Toml),
            );
        }

        // Environment overrides, e.g. CNWEATHER_SOURCE__TIMEOUT_SECONDS=5
        builder = builder.add_source(
            Environment::with_prefix("CNWEATHER")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .with_context(|| "Failed to build configuration")?;

        let mut config: CnWeatherConfig = settings
            .try_deserialize()
            .with_context(|| "Failed to deserialize configuration")?;

        config.apply_defaults();
        config.validate()?;

        Ok(config)
    }

    /// Get the default configuration file path
    #[must_use]
    pub fn get_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("cnweather").join("config.toml"))
    }

    /// Apply default values to empty configuration fields
    pub fn apply_defaults(&mut self) {
        if self.source.short_range_url.is_empty() {
            self.source.short_range_url = default_short_range_url();
        }
        if self.source.extended_range_url.is_empty() {
            self.source.extended_range_url = default_extended_range_url();
        }
        if self.source.timeout_seconds == 0 {
            self.source.timeout_seconds = default_timeout();
        }
        if self.source.user_agent.is_empty() {
            self.source.user_agent = default_user_agent();
        }
        if self.region.data_path.is_empty() {
            self.region.data_path = default_data_path();
        }
        if self.logging.level.is_empty() {
            self.logging.level = default_log_level();
        }
        if self.logging.format.is_empty() {
            self.logging.format = default_log_format();
        }
        if self.chart.width == 0 {
            self.chart.width = default_chart_width();
        }
    }

    /// Validate all configuration settings
    pub fn validate(&self) -> Result<()> {
        self.validate_sources()?;
        self.validate_numeric_ranges()?;
        self.validate_string_values()?;
        Ok(())
    }

    fn validate_sources(&self) -> Result<()> {
        for (name, template) in [
            ("short_range_url", &self.source.short_range_url),
            ("extended_range_url", &self.source.extended_range_url),
        ] {
            if !template.starts_with("http://") && !template.starts_with("https://") {
                return Err(CnWeatherError::config(format!(
                    "source.{name} must be a valid HTTP or HTTPS URL"
                ))
                .into());
            }
            if !template.contains(CODE_PLACEHOLDER) {
                return Err(CnWeatherError::config(format!(
                    "source.{name} must contain the {CODE_PLACEHOLDER} placeholder"
                ))
                .into());
            }
        }
        Ok(())
    }

    /// Validate numeric configuration ranges
    fn validate_numeric_ranges(&self) -> Result<()> {
        if !(1..=120).contains(&self.source.timeout_seconds) {
            return Err(CnWeatherError::config(
                "Source timeout must be between 1 and 120 seconds",
            )
            .into());
        }

        if !(10..=200).contains(&self.chart.width) {
            return Err(CnWeatherError::config("Chart width must be between 10 and 200").into());
        }

        Ok(())
    }

    /// Validate string configuration values
    fn validate_string_values(&self) -> Result<()> {
        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&self.logging.level.as_str()) {
            return Err(CnWeatherError::config(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.logging.level,
                valid_log_levels.join(", ")
            ))
            .into());
        }

        let valid_log_formats = ["pretty", "json"];
        if !valid_log_formats.contains(&self.logging.format.as_str()) {
            return Err(CnWeatherError::config(format!(
                "Invalid log format '{}'. Must be one of: {}",
                self.logging.format,
                valid_log_formats.join(", ")
            ))
            .into());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = CnWeatherConfig::default();
        assert_eq!(
            config.source.short_range_url,
            "https://www.weather.com.cn/weather/{code}.shtml"
        );
        assert_eq!(config.source.timeout_seconds, 10);
        assert!(config.source.user_agent.starts_with("Mozilla/5.0"));
        assert_eq!(config.region.default_province, "辽宁");
        assert_eq!(config.logging.level, "warn");
        assert_eq!(config.chart.width, 40);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_url_for_substitutes_code() {
        let url = SourceConfig::url_for(&default_extended_range_url(), "101070101");
        assert_eq!(url, "https://www.weather.com.cn/weather15d/101070101.shtml");
    }

    #[test]
    fn test_url_for_encodes_code() {
        let url = SourceConfig::url_for("https://example.com/{code}.shtml", "a b/c");
        assert_eq!(url, "https://example.com/a%20b%2Fc.shtml");
    }

    #[test]
    fn test_config_validation_missing_placeholder() {
        let mut config = CnWeatherConfig::default();
        config.source.extended_range_url = "https://example.com/weather15d.shtml".to_string();
        let result = config.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("placeholder"));
    }

    #[test]
    fn test_config_validation_invalid_log_level() {
        let mut config = CnWeatherConfig::default();
        config.logging.level = "invalid".to_string();
        let result = config.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("Invalid log level"));
    }

    #[test]
    fn test_config_validation_numeric_ranges() {
        let mut config = CnWeatherConfig::default();
        config.source.timeout_seconds = 500;
        let result = config.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("timeout"));
    }

    #[test]
    fn test_apply_defaults_fills_empty_values() {
        let mut config = CnWeatherConfig::default();
        config.source.timeout_seconds = 0;
        config.logging.format = String::new();
        config.apply_defaults();
        assert_eq!(config.source.timeout_seconds, 10);
        assert_eq!(config.logging.format, "pretty");
    }

    #[test]
    fn test_load_from_toml_file() {
        let mut file = NamedTempFile::with_suffix(".toml").unwrap();
        writeln!(
            file,
            "[source]\ntimeout_seconds = 5\n\n[chart]\nwidth = 60\n\n[region]\ndefault_province = \"北京\""
        )
        .unwrap();

        let config = CnWeatherConfig::load_from_path(Some(file.path().to_path_buf())).unwrap();
        assert_eq!(config.source.timeout_seconds, 5);
        assert_eq!(config.chart.width, 60);
        assert_eq!(config.region.default_province, "北京");
        // untouched sections keep their defaults
        assert_eq!(config.region.default_city, "沈阳");
        assert_eq!(config.logging.level, "warn");
    }

    #[test]
    fn test_environment_variable_override() {
        let mut file = NamedTempFile::with_suffix(".toml").unwrap();
        writeln!(file, "[source]\ntimeout_seconds = 30\n\n[chart]\nwidth = 60").unwrap();

        // SAFETY: test environment, setting test values only
        unsafe {
            env::set_var("CNWEATHER_SOURCE__TIMEOUT_SECONDS", "5");
            env::set_var("CNWEATHER_REGION__DEFAULT_DISTRICT", "辽中");
        }

        let result = CnWeatherConfig::load_from_path(Some(file.path().to_path_buf()));

        // SAFETY: test cleanup
        unsafe {
            env::remove_var("CNWEATHER_SOURCE__TIMEOUT_SECONDS");
            env::remove_var("CNWEATHER_REGION__DEFAULT_DISTRICT");
        }

        let config = result.unwrap();
        assert_eq!(config.source.timeout_seconds, 5);
        assert_eq!(config.region.default_district, "辽中");
        // the file still applies where no variable overrides it
        assert_eq!(config.chart.width, 60);
    }

    #[test]
    fn test_config_path_generation() {
        if let Some(path) = CnWeatherConfig::get_config_path() {
            assert!(path.to_string_lossy().contains("cnweather"));
            assert!(path.to_string_lossy().contains("config.toml"));
        }
    }
}
