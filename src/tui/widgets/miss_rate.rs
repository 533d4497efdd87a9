//! # Widget: Miss Rate
//!
//! ## Responsibility
//! Line chart of the client-accumulated miss-rate history (percent, oldest
//! first), with the first and last sample times on the x axis.
//!
//! ## Guarantees
//! - Empty history renders empty axes
//! - The y axis is fixed to 0..100

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::symbols;
use ratatui::text::Span;
use ratatui::widgets::{Axis, Block, Borders, Chart, Dataset, GraphType};
use ratatui::Frame;

use crate::sync::{LinePoint, MISS_RATE_HISTORY_CAP};
use crate::tui::app::App;

/// Chart coordinates of the line series: x is the sample index.
pub fn chart_points(line: &[LinePoint]) -> Vec<(f64, f64)> {
    line.iter()
        .enumerate()
        .map(|(i, p)| (i as f64, p.percent.clamp(0.0, 100.0)))
        .collect()
}

/// Renders the miss-rate chart.
pub fn render(f: &mut Frame, area: Rect, app: &App) {
    let line = &app.view.view_model.line;
    let points = chart_points(line);
    let current = line
        .last()
        .map_or_else(|| "--".to_string(), |p| format!("{:.1}%", p.percent));

    let x_labels = match (line.first(), line.last()) {
        (Some(first), Some(last)) => vec![first.label.clone(), last.label.clone()],
        _ => vec![String::new(), String::new()],
    };

    let dataset = Dataset::default()
        .name("miss %")
        .marker(symbols::Marker::Braille)
        .graph_type(GraphType::Line)
        .style(Style::default().fg(Color::Red))
        .data(&points);

    let block = Block::default()
        .title(Span::styled(
            format!(" MISS RATE ({current}) "),
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray));

    let chart = Chart::new(vec![dataset])
        .block(block)
        .x_axis(
            Axis::default()
                .style(Style::default().fg(Color::DarkGray))
                .bounds([0.0, (MISS_RATE_HISTORY_CAP - 1) as f64])
                .labels(x_labels),
        )
        .y_axis(
            Axis::default()
                .style(Style::default().fg(Color::DarkGray))
                .bounds([0.0, 100.0])
                .labels(vec!["0", "50", "100"]),
        );
    f.render_widget(chart, area);
}
