//! # Widget: Header
//!
//! Active identity, wall clock, confidence threshold (with a busy marker while
//! a persist is in flight) and poll counter on one line.

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use crate::sync::reducer::time_label;
use crate::tui::app::App;

/// Renders the header bar.
pub fn render(f: &mut Frame, area: Rect, app: &App) {
    let view = &app.view;
    let mut spans = vec![
        Span::styled(
            " CacheCraft ",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(" user: "),
        Span::styled(
            view.identity.to_string(),
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw("   "),
        Span::styled(time_label(view.now_ms), Style::default().fg(Color::White)),
        Span::raw("   confidence: "),
        Span::styled(
            format!("{:.2}", view.confidence.value),
            Style::default().fg(Color::Magenta),
        ),
    ];
    if view.confidence.busy {
        spans.push(Span::styled(
            format!(" {} saving", app.spinner()),
            Style::default().fg(Color::Yellow),
        ));
    }
    spans.push(Span::styled(
        format!("   polls: {}", view.poll_count),
        Style::default().fg(Color::DarkGray),
    ));

    let block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(Style::default().fg(Color::DarkGray));
    f.render_widget(Paragraph::new(Line::from(spans)).block(block), area);
}
