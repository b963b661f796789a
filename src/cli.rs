//! Command-line interface argument parsing.
//!
//! This module defines the CLI structure using gumdrop. Every option is
//! optional; anything left unset falls back to the configuration file.

use gumdrop::Options;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Log level for the application
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    /// Convert LogLevel to a tracing filter directive
    pub fn to_filter_string(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "trace" => Ok(LogLevel::Trace),
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            other => Err(format!("unknown log level `{}`", other)),
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.to_filter_string())
    }
}

/// Sensor dashboard: live view of a motion sensor's summary endpoint
#[derive(Debug, Options)]
pub struct Cli {
    #[options(help = "print help message")]
    pub help: bool,

    #[options(help = "path to configuration file", meta = "PATH")]
    pub config: Option<PathBuf>,

    #[options(help = "sensor summary URL (overrides config file)", meta = "URL")]
    pub url: Option<String>,

    #[options(help = "poll interval in milliseconds (overrides config file)", meta = "MS")]
    pub interval: Option<u64>,

    #[options(help = "log level: trace, debug, info, warn, error", meta = "LEVEL")]
    pub log_level: Option<LogLevel>,

    #[options(no_short, help = "run without the terminal UI, logging each sample")]
    pub headless: bool,

    #[options(no_short, help = "use the built-in sensor simulator instead of HTTP")]
    pub simulate: bool,
}

impl Cli {
    /// Parse command-line arguments, exiting on `--help` or bad input
    pub fn parse_args() -> Self {
        Self::parse_args_default_or_exit()
    }
}
