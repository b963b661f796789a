//! Terminal UI module using ratatui.
//!
//! This module provides the interactive dashboard: session state, keyboard
//! controls and the widgets that draw them.

pub mod app;
pub mod history;
pub mod input;
pub mod log_table;
pub mod tally;
pub mod terminal;
pub mod widgets;

pub use app::App;
pub use input::{map_key_to_action, InputAction};
pub use terminal::Tui;

use ratatui::{
    layout::{Constraint, Flex, Layout, Rect},
    style::Color,
    Frame,
};

const ACCEL_COLORS: [Color; 3] = [Color::Red, Color::Green, Color::Blue];
const GYRO_COLORS: [Color; 3] = [Color::Yellow, Color::LightGreen, Color::LightBlue];
const VARIANCE_COLORS: [Color; 1] = [Color::Magenta];

/// Draw the whole dashboard for one frame
pub fn draw(frame: &mut Frame, app: &App) {
    // Borders and header around the rows
    let log_height = u16::try_from(app.log.capacity())
        .unwrap_or(u16::MAX)
        .saturating_add(3);
    let [readings_area, charts_area, log_area, status_area] = Layout::vertical([
        Constraint::Length(8),
        Constraint::Min(8),
        Constraint::Length(log_height),
        Constraint::Length(3),
    ])
    .areas(frame.area());

    let [accel_area, gyro_area, variance_area] =
        Layout::horizontal([Constraint::Ratio(1, 3); 3]).areas(charts_area);

    widgets::render_readings(frame, readings_area, &app.fields);
    widgets::render_chart(frame, accel_area, &app.accel, &ACCEL_COLORS);
    widgets::render_chart(frame, gyro_area, &app.gyro, &GYRO_COLORS);
    widgets::render_chart(frame, variance_area, &app.variance, &VARIANCE_COLORS);
    widgets::render_log_table(frame, log_area, &app.log);
    widgets::render_status_bar(frame, status_area, app);

    if app.show_help {
        widgets::render_help(frame, centered(frame.area(), 56, 18));
    }
}

fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let [area] = Layout::horizontal([Constraint::Length(width)])
        .flex(Flex::Center)
        .areas(area);
    let [area] = Layout::vertical([Constraint::Length(height)])
        .flex(Flex::Center)
        .areas(area);
    area
}
