//! UI widgets for displaying sensor data.

pub mod chart;
pub mod help;
pub mod log_table;
pub mod readings;
pub mod status_bar;

pub use chart::render_chart;
pub use help::render_help;
pub use log_table::render_log_table;
pub use readings::render_readings;
pub use status_bar::render_status_bar;
