//! Readings panel: the latest scalar fields.

use crate::ui::app::DisplayFields;
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

fn field<'a>(name: &'a str, value: &'a str, color: Color) -> Line<'a> {
    Line::from(vec![
        Span::styled(format!("{:<10}", name), Style::default().fg(Color::Gray)),
        Span::styled(value, Style::default().fg(color).add_modifier(Modifier::BOLD)),
    ])
}

/// Render the summary, raw axis and timing fields side by side
pub fn render_readings(frame: &mut Frame, area: Rect, fields: &DisplayFields) {
    let [summary_area, raw_area, timing_area] = Layout::horizontal([
        Constraint::Percentage(40),
        Constraint::Percentage(35),
        Constraint::Percentage(25),
    ])
    .areas(area);

    let mut summary = vec![
        field("Motion", &fields.motion, Color::Yellow),
        field("Behavior", &fields.behavior, Color::Yellow),
        field("Walking", &fields.walking, Color::Green),
        field("Var Z", &fields.variance, Color::Magenta),
    ];
    if let Some(tilt) = &fields.tilt {
        summary.push(field("Tilt", tilt, Color::Cyan));
    }
    if let Some(intensity) = &fields.intensity {
        summary.push(field("Intensity", intensity, Color::Cyan));
    }
    frame.render_widget(
        Paragraph::new(summary).block(panel(" Summary ")),
        summary_area,
    );

    let raw = vec![
        field("Accel X", &fields.accel[0], Color::Red),
        field("Accel Y", &fields.accel[1], Color::Green),
        field("Accel Z", &fields.accel[2], Color::Blue),
        field("Gyro X", &fields.gyro[0], Color::Yellow),
        field("Gyro Y", &fields.gyro[1], Color::LightGreen),
        field("Gyro Z", &fields.gyro[2], Color::LightBlue),
    ];
    frame.render_widget(Paragraph::new(raw).block(panel(" Raw Sensor ")), raw_area);

    let timing = vec![
        field("Updated", &fields.status_time, Color::White),
        field("Last move", &fields.last_moved, Color::White),
    ];
    frame.render_widget(Paragraph::new(timing).block(panel(" Time ")), timing_area);
}

fn panel(title: &str) -> Block<'_> {
    Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
}
