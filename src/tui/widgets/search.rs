//! # Widget: Search Bar
//!
//! ## Responsibility
//! Shows the search input while typing, otherwise the last submitted query
//! with its loading marker, inline result (tagged by source) or inline error.

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use super::source_color;
use crate::tui::app::{App, InputMode};

/// Renders the search bar.
pub fn render(f: &mut Frame, area: Rect, app: &App) {
    let editing = app.mode == InputMode::Search;
    let border = if editing { Color::Yellow } else { Color::DarkGray };
    let block = Block::default()
        .title(Span::styled(
            " SEARCH [/] ",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border));

    let search = &app.view.search;
    let mut lines = Vec::with_capacity(2);
    if editing {
        lines.push(Line::from(vec![
            Span::styled("> ", Style::default().fg(Color::Yellow)),
            Span::raw(app.search_input.as_str()),
            Span::styled("_", Style::default().fg(Color::Yellow)),
        ]));
    } else if !search.query.is_empty() {
        lines.push(Line::from(vec![
            Span::styled("> ", Style::default().fg(Color::DarkGray)),
            Span::raw(search.query.as_str()),
        ]));
    }

    if search.loading {
        lines.push(Line::from(Span::styled(
            format!("{} searching...", app.spinner()),
            Style::default().fg(Color::Yellow),
        )));
    } else if let Some(error) = &search.error {
        lines.push(Line::from(Span::styled(
            error.as_str(),
            Style::default().fg(Color::Red),
        )));
    } else if let Some(result) = &search.result {
        lines.push(Line::from(vec![
            Span::styled(
                format!("[{}] ", result.source.label()),
                Style::default().fg(source_color(result.source)),
            ),
            Span::raw(result.result.as_str()),
        ]));
    }

    f.render_widget(Paragraph::new(lines).block(block), area);
}
