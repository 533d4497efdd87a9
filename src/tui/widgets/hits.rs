//! # Widget: Recent Hits
//!
//! The server's hit log, newest first, coloured by source.

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use super::source_color;
use crate::sync::reducer::time_label;
use crate::tui::app::App;

/// Renders the recent hits list.
pub fn render(f: &mut Frame, area: Rect, app: &App) {
    let block = Block::default()
        .title(Span::styled(
            " RECENT HITS ",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray));

    let lines: Vec<Line> = match &app.view.snapshot {
        Some(snapshot) => snapshot
            .last_10_hits
            .iter()
            .rev()
            .map(|hit| {
                let at = hit.time.map_or_else(
                    || "--:--:--".to_string(),
                    |secs| time_label(secs.saturating_mul(1000)),
                );
                Line::from(vec![
                    Span::styled(format!("{at} "), Style::default().fg(Color::DarkGray)),
                    Span::styled(
                        format!("{:<12}", hit.source.label()),
                        Style::default().fg(source_color(hit.source)),
                    ),
                    Span::raw(hit.query.as_str()),
                ])
            })
            .collect(),
        None => Vec::new(),
    };

    f.render_widget(Paragraph::new(lines).block(block), area);
}
