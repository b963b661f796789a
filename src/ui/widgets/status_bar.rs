//! Status bar widget.

use crate::ui::app::App;
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// Render the status bar: live state, toggle control, chart selector, clock
pub fn render_status_bar(frame: &mut Frame, area: Rect, app: &App) {
    let mut spans = vec![];

    // Live status
    let (live_text, live_color) = if app.is_live() {
        ("LIVE", Color::Green)
    } else {
        ("PAUSED", Color::Yellow)
    };
    spans.push(Span::styled(
        live_text,
        Style::default().fg(live_color).add_modifier(Modifier::BOLD),
    ));

    spans.push(Span::raw(" │ "));
    spans.push(Span::styled("[Space] ", Style::default().fg(Color::Cyan)));
    spans.push(Span::raw(app.toggle_label()));

    spans.push(Span::raw(" │ "));
    spans.push(Span::styled("[t] Chart: ", Style::default().fg(Color::Cyan)));
    spans.push(Span::raw(app.chart_kind.label()));

    spans.push(Span::raw(" │ "));
    spans.push(Span::styled(
        app.fields.status_time.as_str(),
        Style::default().fg(Color::White),
    ));

    spans.push(Span::raw(" │ "));
    spans.push(Span::styled(
        app.source_label.as_str(),
        Style::default().fg(Color::Gray),
    ));

    spans.push(Span::raw(" │ "));
    spans.push(Span::styled("? help", Style::default().fg(Color::DarkGray)));

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray));

    let paragraph = Paragraph::new(Line::from(spans)).block(block);
    frame.render_widget(paragraph, area);
}
