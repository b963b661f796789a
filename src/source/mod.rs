//! Sources of sensor summaries.
//!
//! This module defines the `SummarySource` trait and its implementations:
//! an HTTP client for the sensor's `/data` endpoint and a built-in simulator.

use crate::config::SourceConfig;
use crate::error::{FetchError, Result};
use crate::summary::SensorSummary;
use async_trait::async_trait;
use std::sync::Arc;

pub mod http;
pub mod simulated;

pub use http::HttpSource;
pub use simulated::SimulatedSource;

/// Trait for anything that can produce the latest sensor summary
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SummarySource: Send + Sync {
    /// Fetch the current summary. One call per poll tick.
    async fn fetch(&self) -> std::result::Result<SensorSummary, FetchError>;

    /// Short human-readable description, shown in the status bar
    fn describe(&self) -> String;
}

/// Build the source selected by configuration and CLI flags
pub fn from_config(config: &SourceConfig, simulate: bool) -> Result<Arc<dyn SummarySource>> {
    if simulate {
        tracing::info!("Using simulated sensor source");
        return Ok(Arc::new(SimulatedSource::new()));
    }

    let source = HttpSource::new(&config.url)?;
    tracing::info!(url = %config.url, "Using HTTP sensor source");
    Ok(Arc::new(source))
}
