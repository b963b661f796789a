//! Application configuration management.
//!
//! This module handles loading, parsing, and validating the application
//! configuration. Values are layered: built-in defaults, an optional TOML
//! file, `DASHBOARD__*` environment variables, then CLI overrides.

use crate::error::{ConfigError, Result};
use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Config file read when `--config` is not given. A missing file is fine.
pub const DEFAULT_CONFIG_FILE: &str = "sensor-dashboard.toml";

/// Upper bound for points kept per chart series.
pub const MAX_CHART_POINTS: usize = 1_000;

/// Upper bound for event log rows; the log panel is sized to fit them all.
pub const MAX_LOG_ROWS: usize = 200;

/// Top-level application configuration
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub source: SourceConfig,
    #[serde(default)]
    pub dashboard: DashboardConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Where sensor summaries come from
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct SourceConfig {
    #[serde(default = "default_url")]
    pub url: String,
    #[serde(default = "default_request_timeout")]
    pub request_timeout_ms: u64,
}

/// Poll cadence and view sizes
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct DashboardConfig {
    #[serde(default = "default_poll_interval")]
    pub poll_interval_ms: u64,
    #[serde(default = "default_clock_interval")]
    pub clock_interval_ms: u64,
    #[serde(default = "default_chart_points")]
    pub chart_points: usize,
    #[serde(default = "default_log_rows")]
    pub log_rows: usize,
    /// Motion value that does not count as movement.
    #[serde(default = "default_stable_motion")]
    pub stable_motion: String,
}

/// Logging configuration
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default)]
    pub file: Option<String>,
    #[serde(default)]
    pub json: bool,
}

// Default value functions
fn default_url() -> String {
    "http://192.168.4.1/data".to_string()
}

fn default_request_timeout() -> u64 {
    5000
}

fn default_poll_interval() -> u64 {
    500
}

fn default_clock_interval() -> u64 {
    1000
}

fn default_chart_points() -> usize {
    30
}

fn default_log_rows() -> usize {
    10
}

fn default_stable_motion() -> String {
    "Stable".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            url: default_url(),
            request_timeout_ms: default_request_timeout(),
        }
    }
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: default_poll_interval(),
            clock_interval_ms: default_clock_interval(),
            chart_points: default_chart_points(),
            log_rows: default_log_rows(),
            stable_motion: default_stable_motion(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: None,
            json: false,
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file layered under the environment.
    ///
    /// `required` controls whether a missing file is an error; the default
    /// file is optional, an explicit `--config` path is not.
    pub fn load<P: AsRef<Path>>(path: P, required: bool) -> Result<Self> {
        let path = path.as_ref().to_string_lossy();
        let config: AppConfig = Config::builder()
            .add_source(File::new(&path, FileFormat::Toml).required(required))
            .add_source(
                Environment::with_prefix("DASHBOARD")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .and_then(|c| c.try_deserialize())
            .map_err(ConfigError::from)?;

        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if !self.source.url.starts_with("http://") {
            return Err(invalid("source.url", "must be an http:// URL"));
        }

        if self.source.request_timeout_ms == 0 {
            return Err(invalid("source.request_timeout_ms", "must be greater than 0"));
        }

        if self.dashboard.poll_interval_ms == 0 {
            return Err(invalid("dashboard.poll_interval_ms", "must be greater than 0"));
        }

        if self.dashboard.clock_interval_ms == 0 {
            return Err(invalid("dashboard.clock_interval_ms", "must be greater than 0"));
        }

        if !(1..=MAX_CHART_POINTS).contains(&self.dashboard.chart_points) {
            return Err(invalid(
                "dashboard.chart_points",
                &format!("must be between 1 and {}", MAX_CHART_POINTS),
            ));
        }

        if !(1..=MAX_LOG_ROWS).contains(&self.dashboard.log_rows) {
            return Err(invalid(
                "dashboard.log_rows",
                &format!("must be between 1 and {}", MAX_LOG_ROWS),
            ));
        }

        if self.dashboard.stable_motion.is_empty() {
            return Err(invalid("dashboard.stable_motion", "cannot be empty"));
        }

        Ok(())
    }

    /// Apply CLI argument overrides to configuration
    pub fn apply_cli_overrides(&mut self, cli: &crate::cli::Cli) {
        if let Some(url) = &cli.url {
            self.source.url = url.clone();
        }

        if let Some(interval) = cli.interval {
            self.dashboard.poll_interval_ms = interval;
        }

        if let Some(level) = cli.log_level {
            self.logging.level = level.to_filter_string().to_string();
        }
    }

    /// Render the effective configuration for diagnostics
    pub fn to_toml_string(&self) -> String {
        toml::to_string(self).unwrap_or_else(|e| format!("<unrenderable config: {}>", e))
    }
}

fn invalid(field: &str, message: &str) -> crate::error::AppError {
    ConfigError::InvalidValue {
        field: field.to_string(),
        message: message.to_string(),
    }
    .into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.source.url, "http://192.168.4.1/data");
        assert_eq!(config.dashboard.poll_interval_ms, 500);
        assert_eq!(config.dashboard.clock_interval_ms, 1000);
        assert_eq!(config.dashboard.chart_points, 30);
        assert_eq!(config.dashboard.log_rows, 10);
        assert_eq!(config.dashboard.stable_motion, "Stable");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_zero_poll_interval() {
        let mut config = AppConfig::default();
        config.dashboard.poll_interval_ms = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_view_size_bounds() {
        let mut config = AppConfig::default();
        config.dashboard.log_rows = 65534;
        assert!(config.validate().is_err());
        config.dashboard.log_rows = MAX_LOG_ROWS;
        assert!(config.validate().is_ok());
        config.dashboard.log_rows = 0;
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.dashboard.chart_points = usize::MAX;
        assert!(config.validate().is_err());
        config.dashboard.chart_points = MAX_CHART_POINTS;
        assert!(config.validate().is_ok());
        config.dashboard.chart_points = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_https_url() {
        let mut config = AppConfig::default();
        config.source.url = "https://sensor.local/data".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_empty_stable_motion() {
        let mut config = AppConfig::default();
        config.dashboard.stable_motion = String::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_partial_file_keeps_defaults() {
        let mut file = tempfile::Builder::new()
            .suffix(".toml")
            .tempfile()
            .unwrap();
        writeln!(file, "[source]\nurl = \"http://10.1.1.5:8080/data\"\n").unwrap();
        writeln!(file, "[dashboard]\nlog_rows = 4").unwrap();

        let config = AppConfig::load(file.path(), true).unwrap();
        assert_eq!(config.source.url, "http://10.1.1.5:8080/data");
        assert_eq!(config.source.request_timeout_ms, 5000);
        assert_eq!(config.dashboard.log_rows, 4);
        assert_eq!(config.dashboard.chart_points, 30);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_missing_optional_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig::load(dir.path().join("absent.toml"), false).unwrap();
        assert_eq!(config.dashboard.poll_interval_ms, 500);
    }

    #[test]
    fn test_missing_required_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        assert!(AppConfig::load(dir.path().join("absent.toml"), true).is_err());
    }

    #[test]
    fn test_cli_overrides() {
        let cli = crate::cli::Cli {
            help: false,
            config: None,
            url: Some("http://127.0.0.1:9000/data".to_string()),
            interval: Some(250),
            log_level: Some(crate::cli::LogLevel::Debug),
            headless: false,
            simulate: false,
        };
        let mut config = AppConfig::default();
        config.apply_cli_overrides(&cli);
        assert_eq!(config.source.url, "http://127.0.0.1:9000/data");
        assert_eq!(config.dashboard.poll_interval_ms, 250);
        assert_eq!(config.logging.level, "debug");
    }
}
