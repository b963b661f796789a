//! Application state management for the dashboard.
//!
//! `App` is the single session-state object: display fields, chart views,
//! the log table, the behavior tally and the live flag. Only the driver loop
//! owns it, so it needs no locking.

use crate::config::DashboardConfig;
use crate::summary::{fixed, walking_label, SensorSummary};
use crate::ui::history::SeriesView;
use crate::ui::log_table::{LogRow, LogTable};
use crate::ui::tally::BehaviorTally;
use chrono::{DateTime, Local};

/// Placeholder shown before the first sample arrives.
const EMPTY_FIELD: &str = "--";

/// Wall-clock label used for status, chart and log timestamps
pub fn clock_label(time: &DateTime<Local>) -> String {
    time.format("%H:%M:%S").to_string()
}

/// Chart-type selector value. Selecting one changes nothing yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChartKind {
    #[default]
    Line,
    Scatter,
    Bar,
}

impl ChartKind {
    pub fn next(self) -> Self {
        match self {
            ChartKind::Line => ChartKind::Scatter,
            ChartKind::Scatter => ChartKind::Bar,
            ChartKind::Bar => ChartKind::Line,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ChartKind::Line => "Line",
            ChartKind::Scatter => "Scatter",
            ChartKind::Bar => "Bar",
        }
    }
}

/// Rendered text of every scalar display field
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayFields {
    pub motion: String,
    pub behavior: String,
    pub walking: String,
    pub variance: String,
    pub intensity: Option<String>,
    pub tilt: Option<String>,
    pub accel: [String; 3],
    pub gyro: [String; 3],
    pub status_time: String,
    pub last_moved: String,
}

impl Default for DisplayFields {
    fn default() -> Self {
        let empty = || EMPTY_FIELD.to_string();
        Self {
            motion: empty(),
            behavior: empty(),
            walking: empty(),
            variance: empty(),
            intensity: None,
            tilt: None,
            accel: [empty(), empty(), empty()],
            gyro: [empty(), empty(), empty()],
            status_time: String::new(),
            last_moved: String::new(),
        }
    }
}

/// Application state
pub struct App {
    /// Whether the application should quit
    pub should_quit: bool,
    /// Inert chart-type selection
    pub chart_kind: ChartKind,
    /// Show help panel
    pub show_help: bool,
    /// Scalar display fields
    pub fields: DisplayFields,
    /// Accelerometer chart (X, Y, Z)
    pub accel: SeriesView,
    /// Gyroscope chart (X, Y, Z)
    pub gyro: SeriesView,
    /// Z variance chart
    pub variance: SeriesView,
    /// Recent samples, newest first
    pub log: LogTable,
    /// Behavior occurrences
    pub tally: BehaviorTally,
    /// Last time a non-stable motion was seen
    pub last_motion_change: Option<DateTime<Local>>,
    /// Where samples come from, for the status bar
    pub source_label: String,
    live: bool,
    stable_motion: String,
    needs_redraw: bool,
}

impl App {
    /// Create a new application state
    pub fn new(settings: &DashboardConfig, source_label: String) -> Self {
        let points = settings.chart_points;
        Self {
            should_quit: false,
            chart_kind: ChartKind::default(),
            show_help: false,
            fields: DisplayFields::default(),
            accel: SeriesView::new("Accelerometer (g)", &["Accel X", "Accel Y", "Accel Z"], points),
            gyro: SeriesView::new("Gyroscope (°/s)", &["Gyro X", "Gyro Y", "Gyro Z"], points),
            variance: SeriesView::new("Variance Z", &["Variance Z"], points),
            log: LogTable::new(settings.log_rows),
            tally: BehaviorTally::new(),
            last_motion_change: None,
            source_label,
            live: true,
            stable_motion: settings.stable_motion.clone(),
            needs_redraw: true,
        }
    }

    pub fn is_live(&self) -> bool {
        self.live
    }

    /// Flip the live flag. Samples missed while paused are not buffered.
    pub fn toggle_live(&mut self) {
        self.live = !self.live;
        tracing::info!(live = self.live, "Polling {}", if self.live { "resumed" } else { "paused" });
        self.needs_redraw = true;
    }

    /// Label of the pause/resume control for the current state
    pub fn toggle_label(&self) -> &'static str {
        if self.live { "Pause" } else { "Resume" }
    }

    /// Render one successfully fetched sample into every view.
    pub fn apply_summary(&mut self, sample: &SensorSummary, now: DateTime<Local>) {
        let stamp = clock_label(&now);
        let variance = fixed(sample.summary.variance_z, 4);
        let walking = walking_label(sample.summary.walking);

        // Scalar fields
        self.fields.motion = sample.motion.clone();
        self.fields.behavior = sample.summary.behavior.clone();
        self.fields.walking = walking.to_string();
        self.fields.variance = variance.clone();
        self.fields.intensity = sample.summary.intensity.clone();
        self.fields.tilt = sample.summary.tilt.clone();
        self.fields.accel = sample.accel.to_array().map(|v| fixed(v, 2));
        self.fields.gyro = sample.gyro.to_array().map(|v| fixed(v, 2));
        self.fields.status_time = stamp.clone();

        // Charts share one label sequence
        self.accel.push(stamp.clone(), &sample.accel.to_array());
        self.gyro.push(stamp.clone(), &sample.gyro.to_array());
        self.variance.push(stamp.clone(), &[sample.summary.variance_z]);

        self.log.insert(LogRow {
            time: stamp,
            motion: sample.motion.clone(),
            behavior: sample.summary.behavior.clone(),
            walking: walking.to_string(),
            variance,
        });

        if sample.motion != self.stable_motion {
            self.last_motion_change = Some(now);
        }
        if let Some(moved) = &self.last_motion_change {
            self.fields.last_moved = clock_label(moved);
        }

        self.tally.record(&sample.summary.behavior);
        self.needs_redraw = true;
    }

    /// Refresh the status clock; runs whether or not polling is live.
    pub fn stamp_clock(&mut self, now: DateTime<Local>) {
        self.fields.status_time = clock_label(&now);
        self.needs_redraw = true;
    }

    /// Advance the chart-type selector
    pub fn cycle_chart_kind(&mut self) {
        self.chart_kind = self.chart_kind.next();
        tracing::debug!(kind = self.chart_kind.label(), "Chart type selected");
        self.needs_redraw = true;
    }

    /// Toggle help panel
    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
        self.needs_redraw = true;
    }

    pub fn request_redraw(&mut self) {
        self.needs_redraw = true;
    }

    /// Returns whether a redraw is pending and clears the flag
    pub fn take_redraw(&mut self) -> bool {
        std::mem::take(&mut self.needs_redraw)
    }
}
