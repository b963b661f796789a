//! Sensor dashboard: polls a motion sensor's `/data` endpoint and shows the
//! latest readings, three rolling charts and a short event log.
//!
//! Startup:
//! 1. Parses CLI options and loads the layered configuration.
//! 2. Initializes tracing (to a file when the terminal UI owns the screen).
//! 3. Builds the summary source (HTTP or simulator) and the service.
//! 4. Runs the interactive dashboard, or the headless loop when requested
//!    or when stdout is not a terminal.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use tracing::{debug, info};

mod analysis;
mod cli;
mod config;
mod error;
mod logging;
mod poller;
mod service;
mod source;
mod summary;
mod ui;

use cli::Cli;
use config::{AppConfig, DEFAULT_CONFIG_FILE};
use service::{DashboardService, RunMode};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse_args();

    // An explicit --config must exist; the default file is optional
    let (config_path, required) = match &cli.config {
        Some(path) => (path.clone(), true),
        None => (PathBuf::from(DEFAULT_CONFIG_FILE), false),
    };
    let mut config = AppConfig::load(&config_path, required)?;
    config.apply_cli_overrides(&cli);
    config.validate()?;

    let mode = if cli.headless || !atty::is(atty::Stream::Stdout) {
        RunMode::Headless
    } else {
        RunMode::Interactive
    };

    logging::init(&config.logging, mode)?;
    info!(
        version = env!("CARGO_PKG_VERSION"),
        mode = ?mode,
        config = %config_path.display(),
        "Sensor dashboard starting"
    );
    debug!("Effective configuration:\n{}", config.to_toml_string());

    let service = DashboardService::new(Arc::new(config), cli.simulate)?;
    service::setup_signal_handler(service.shutdown_token())?;

    match mode {
        RunMode::Interactive => service.run_interactive().await?,
        RunMode::Headless => service.run_headless().await?,
    }

    Ok(())
}
