//! # Widget: Predictions
//!
//! Predicted next queries with their confidence. Predictions at or above the
//! displayed threshold are marked as prefetch-eligible.

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use crate::tui::app::App;

/// Renders the predictions list.
pub fn render(f: &mut Frame, area: Rect, app: &App) {
    let block = Block::default()
        .title(Span::styled(
            format!(" PREDICTIONS (>= {:.2}) ", app.view.confidence.value),
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray));

    let lines: Vec<Line> = app
        .view
        .prediction_rows()
        .into_iter()
        .map(|(prediction, eligible)| {
            let (marker, color) = if eligible {
                ("\u{25cf}", Color::Green)
            } else {
                ("\u{25cb}", Color::DarkGray)
            };
            Line::from(vec![
                Span::styled(format!("{marker} "), Style::default().fg(color)),
                Span::styled(
                    format!("{:>4.0}% ", prediction.confidence * 100.0),
                    Style::default().fg(color),
                ),
                Span::raw(prediction.query.clone()),
            ])
        })
        .collect();

    f.render_widget(Paragraph::new(lines).block(block), area);
}
