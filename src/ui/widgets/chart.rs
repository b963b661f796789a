//! Chart widget for displaying a bounded series view.

use crate::ui::history::SeriesView;
use ratatui::{
    layout::Rect,
    style::{Color, Style},
    symbols,
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType},
    Frame,
};

/// Render one series view as a line chart, coloring series in palette order
pub fn render_chart(frame: &mut Frame, area: Rect, view: &SeriesView, palette: &[Color]) {
    let block = Block::default()
        .title(format!(" {} ", view.title()))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    if view.is_empty() {
        let chart = Chart::new(vec![])
            .block(block)
            .x_axis(Axis::default().title("Time").bounds([0.0, 1.0]))
            .y_axis(Axis::default().bounds([-1.0, 1.0]));
        frame.render_widget(chart, area);
        return;
    }

    // Prepare data points, x is the sample index within the window
    let points: Vec<Vec<(f64, f64)>> = view
        .series()
        .iter()
        .map(|series| {
            series
                .points
                .iter()
                .enumerate()
                .map(|(i, v)| (i as f64, *v))
                .collect()
        })
        .collect();

    let datasets: Vec<Dataset> = view
        .series()
        .iter()
        .zip(points.iter())
        .enumerate()
        .map(|(idx, (series, data))| {
            Dataset::default()
                .name(series.name.clone())
                .marker(symbols::Marker::Braille)
                .graph_type(GraphType::Line)
                .style(Style::default().fg(palette.get(idx).copied().unwrap_or(Color::White)))
                .data(data)
        })
        .collect();

    // Calculate bounds with a little headroom so flat lines stay visible
    let (min, max) = view.value_bounds().unwrap_or((-1.0, 1.0));
    let pad = ((max - min) * 0.1).max(0.05);
    let (y_min, y_max) = (min - pad, max + pad);

    let first = view.labels().front().cloned().unwrap_or_default();
    let last = view.labels().back().cloned().unwrap_or_default();

    let chart = Chart::new(datasets)
        .block(block)
        .x_axis(
            Axis::default()
                .style(Style::default().fg(Color::Gray))
                .bounds([0.0, (view.capacity().max(2) - 1) as f64])
                .labels(vec![first, last]),
        )
        .y_axis(
            Axis::default()
                .style(Style::default().fg(Color::Gray))
                .bounds([y_min, y_max])
                .labels(vec![
                    format!("{:.2}", y_min),
                    format!("{:.2}", (y_min + y_max) / 2.0),
                    format!("{:.2}", y_max),
                ]),
        );

    frame.render_widget(chart, area);
}
