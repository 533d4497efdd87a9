//! # Widget: Analytics
//!
//! Server-reported counters, displayed verbatim.

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use crate::tui::app::App;

fn stat(label: &'static str, value: String) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("{label:<18}"), Style::default().fg(Color::DarkGray)),
        Span::styled(value, Style::default().fg(Color::White)),
    ])
}

/// Renders the analytics panel.
pub fn render(f: &mut Frame, area: Rect, app: &App) {
    let block = Block::default()
        .title(Span::styled(
            " ANALYTICS ",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray));

    let lines = match &app.view.snapshot {
        Some(s) => vec![
            stat("miss rate", format!("{:.1}%", s.clamped_miss_rate() * 100.0)),
            stat("api calls saved", s.api_calls_saved.to_string()),
            stat("backend calls", s.total_backend_calls.to_string()),
            stat("cache hits", s.total_cache_hits.to_string()),
            stat("avg latency saved", format!("{:.1} ms", s.avg_latency_saved)),
        ],
        None => vec![Line::from(Span::styled(
            "no data yet",
            Style::default().fg(Color::DarkGray),
        ))],
    };

    f.render_widget(Paragraph::new(lines).block(block), area);
}
