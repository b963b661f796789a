//! Tracing subscriber setup.
//!
//! `RUST_LOG` takes precedence over the configured level. The interactive
//! dashboard owns the terminal, so in that mode logs always go to a file.

use crate::config::LoggingConfig;
use crate::error::Result;
use crate::service::RunMode;
use std::fs::OpenOptions;
use std::sync::Mutex;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::EnvFilter;

/// Log file used by the interactive dashboard when none is configured.
pub const DEFAULT_UI_LOG_FILE: &str = "sensor-dashboard.log";

/// Pick the log file for a run mode, if logs should go to a file at all
pub fn log_file_for(config: &LoggingConfig, mode: RunMode) -> Option<String> {
    match (&config.file, mode) {
        (Some(file), _) => Some(file.clone()),
        (None, RunMode::Interactive) => Some(DEFAULT_UI_LOG_FILE.to_string()),
        (None, RunMode::Headless) => None,
    }
}

/// Install the global tracing subscriber
pub fn init(config: &LoggingConfig, mode: RunMode) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .map_err(|e| anyhow::anyhow!("invalid log level `{}`: {}", config.level, e))?;

    let file = log_file_for(config, mode);
    let (writer, ansi) = match &file {
        Some(path) => {
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            (BoxMakeWriter::new(Mutex::new(file)), false)
        }
        None => (BoxMakeWriter::new(std::io::stderr), atty::is(atty::Stream::Stderr)),
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(ansi)
        .with_target(false);

    let installed = if config.json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
    installed.map_err(|e| anyhow::anyhow!("failed to install tracing subscriber: {}", e))?;

    Ok(())
}
