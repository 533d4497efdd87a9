//! # Widget: Cache Table
//!
//! ## Responsibility
//! Renders the live cache entries with a per-second countdown, the row
//! coloured by expiry band, and a spinner on rows with a refresh in flight.
//!
//! ## Guarantees
//! - Empty or missing snapshot renders a placeholder
//! - The highlighted row follows `App::selected`

use ratatui::layout::{Constraint, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Span;
use ratatui::widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState};
use ratatui::Frame;

use super::{band_color, source_color};
use crate::sync::CacheRow;
use crate::tui::app::App;

/// Formats a countdown as `M:SS`.
pub fn format_countdown(secs: i64) -> String {
    let secs = secs.max(0);
    format!("{}:{:02}", secs / 60, secs % 60)
}

fn row<'a>(entry: &'a CacheRow, spinner: &'static str) -> Row<'a> {
    let color = band_color(entry.band);
    let marker = if entry.refreshing { spinner } else { " " };
    Row::new(vec![
        Cell::from(Span::styled(marker, Style::default().fg(Color::Yellow))),
        Cell::from(entry.query.as_str()),
        Cell::from(Span::styled(
            entry.source.label(),
            Style::default().fg(source_color(entry.source)),
        )),
        Cell::from(Span::styled(
            format_countdown(entry.expires_in),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        )),
        Cell::from(Span::styled(entry.band.label(), Style::default().fg(color))),
    ])
}

/// Renders the cache table.
pub fn render(f: &mut Frame, area: Rect, app: &App) {
    let rows = app.view.cache_rows();
    let block = Block::default()
        .title(Span::styled(
            format!(" CACHE ({}) ", rows.len()),
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray));

    if rows.is_empty() {
        let placeholder = if app.view.snapshot.is_some() {
            "cache is empty"
        } else {
            "waiting for first poll..."
        };
        let para = Paragraph::new(Span::styled(placeholder, Style::default().fg(Color::DarkGray)))
            .block(block);
        f.render_widget(para, area);
        return;
    }

    let spinner = app.spinner();
    let table = Table::new(
        rows.iter().map(|r| row(r, spinner)),
        [
            Constraint::Length(2),
            Constraint::Min(20),
            Constraint::Length(12),
            Constraint::Length(7),
            Constraint::Length(9),
        ],
    )
    .header(
        Row::new(vec!["", "QUERY", "SOURCE", "TTL", "STATUS"])
            .style(Style::default().fg(Color::DarkGray)),
    )
    .block(block)
    .row_highlight_style(Style::default().add_modifier(Modifier::REVERSED));

    let mut state = TableState::default().with_selected(Some(app.selected));
    f.render_stateful_widget(table, area, &mut state);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_countdown() {
        assert_eq!(format_countdown(0), "0:00");
        assert_eq!(format_countdown(75), "1:15");
        assert_eq!(format_countdown(300), "5:00");
    }

    #[test]
    fn test_format_countdown_negative_is_zero() {
        assert_eq!(format_countdown(-4), "0:00");
    }
}
