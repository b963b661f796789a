//! Event log table widget.

use crate::ui::log_table::LogTable;
use ratatui::{
    layout::{Constraint, Rect},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Row, Table},
    Frame,
};

/// Render the log rows newest first under a fixed header
pub fn render_log_table(frame: &mut Frame, area: Rect, log: &LogTable) {
    let header = Row::new(vec!["Time", "Motion", "Behavior", "Walking", "Var Z"]).style(
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD),
    );

    let rows: Vec<Row> = log
        .rows()
        .enumerate()
        .map(|(idx, row)| {
            // Newest row stands out
            let style = if idx == 0 {
                Style::default().fg(Color::White)
            } else {
                Style::default().fg(Color::Gray)
            };
            Row::new(vec![
                row.time.clone(),
                row.motion.clone(),
                row.behavior.clone(),
                row.walking.clone(),
                row.variance.clone(),
            ])
            .style(style)
        })
        .collect();

    let widths = [
        Constraint::Length(10),
        Constraint::Min(16),
        Constraint::Length(12),
        Constraint::Length(8),
        Constraint::Length(8),
    ];

    let title = if log.is_empty() {
        " Event Log (waiting for samples) ".to_string()
    } else {
        format!(" Event Log ({}/{}) ", log.len(), log.capacity())
    };

    let table = Table::new(rows, widths).header(header).block(
        Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan)),
    );

    frame.render_widget(table, area);
}
