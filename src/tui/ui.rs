//! # Module: TUI Rendering
//!
//! ## Responsibility
//! Orchestrates the overall dashboard layout by dividing the terminal into regions
//! and delegating to individual widget renderers. Handles the minimum size guard,
//! the toast stack and the help overlay.
//!
//! ## Guarantees
//! - Minimum size guard displays a centered message if terminal is too small
//! - No panics during rendering regardless of terminal dimensions

use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use ratatui::Frame;

use super::app::{App, MIN_COLS, MIN_ROWS};
use super::widgets;

const KEY_HINTS: &str =
    " [q]uit  [/]search  [Tab]user  [+/-]confidence  [r]efresh  [e/E]xport  [h]elp ";

/// Renders the complete dashboard UI into the given frame.
pub fn draw(f: &mut Frame, app: &App) {
    let size = f.area();

    if size.width < MIN_COLS || size.height < MIN_ROWS {
        draw_too_small(f, size);
        return;
    }

    let outer_block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title_bottom(Line::from(Span::styled(
            KEY_HINTS,
            Style::default().fg(Color::DarkGray),
        )));
    let inner = outer_block.inner(size);
    f.render_widget(outer_block, size);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),  // Header
            Constraint::Length(4),  // Search
            Constraint::Min(10),    // Cache + side panels
            Constraint::Length(10), // Charts
        ])
        .split(inner);

    let middle = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(rows[2]);

    let side = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(5),    // Hits
            Constraint::Length(5), // Predictions
        ])
        .split(middle[1]);

    let bottom = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(30), // Distribution
            Constraint::Percentage(45), // Miss rate
            Constraint::Percentage(25), // Analytics
        ])
        .split(rows[3]);

    widgets::header::render(f, rows[0], app);
    widgets::search::render(f, rows[1], app);
    widgets::cache::render(f, middle[0], app);
    widgets::hits::render(f, side[0], app);
    widgets::predictions::render(f, side[1], app);
    widgets::distribution::render(f, bottom[0], app);
    widgets::miss_rate::render(f, bottom[1], app);
    widgets::analytics::render(f, bottom[2], app);
    widgets::toasts::render(f, inner, app);

    if app.show_help {
        draw_help_overlay(f, size);
    }
}

/// Renders the "terminal too small" warning.
fn draw_too_small(f: &mut Frame, area: Rect) {
    let msg = format!("Terminal too small, resize to at least {MIN_COLS}x{MIN_ROWS}");
    let current_size = format!("Current size: {}x{}", area.width, area.height);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Red));

    let para = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled(
            msg,
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            current_size,
            Style::default().fg(Color::DarkGray),
        )),
    ])
    .block(block)
    .alignment(Alignment::Center)
    .wrap(Wrap { trim: true });

    f.render_widget(para, area);
}

/// Centred popup of at most `width` x `height` inside `area`.
pub fn popup_area(area: Rect, width: u16, height: u16) -> Rect {
    let popup_width = width.min(area.width.saturating_sub(4));
    let popup_height = height.min(area.height.saturating_sub(4));
    let popup_x = area.x + (area.width.saturating_sub(popup_width)) / 2;
    let popup_y = area.y + (area.height.saturating_sub(popup_height)) / 2;
    Rect::new(popup_x, popup_y, popup_width, popup_height)
}

/// Renders the help overlay.
fn draw_help_overlay(f: &mut Frame, area: Rect) {
    let popup = popup_area(area, 54, 19);
    f.render_widget(Clear, popup);

    let key =
        |text: &'static str| Line::from(Span::styled(text, Style::default().fg(Color::DarkGray)));
    let help_text = vec![
        Line::from(""),
        Line::from(Span::styled(
            "  CacheCraft live dashboard",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        key("    [q] / [Esc] / [Ctrl+C]  Quit"),
        key("    [/]        Search (Enter submits, Esc cancels)"),
        key("    [Tab]      Switch user"),
        key("    [+] / [-]  Confidence threshold +/- 0.01"),
        key("    [\u{2191}\u{2193}]       Select cache entry"),
        key("    [r]        Refresh selected entry"),
        key("    [e] / [E]  Export JSON / CSV"),
        key("    [h]        Toggle this help"),
        Line::from(""),
        key("  TTL colours: green > 60s, yellow > 15s, red <= 15s"),
        key("  \u{25cf} prediction at or above the threshold"),
        Line::from(""),
        Line::from(Span::styled(
            "  Press any key to close",
            Style::default().fg(Color::Yellow),
        )),
    ];

    let block = Block::default()
        .title(" Help ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    f.render_widget(Paragraph::new(help_text).block(block), popup);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_popup_centering_calculation() {
        let popup = popup_area(Rect::new(0, 0, 120, 50), 54, 19);
        assert_eq!(popup.width, 54);
        assert_eq!(popup.height, 19);
        assert_eq!(popup.x, 33);
        assert_eq!(popup.y, 15);
    }

    #[test]
    fn test_popup_centering_small_terminal() {
        let popup = popup_area(Rect::new(0, 0, 40, 15), 54, 19);
        assert_eq!(popup.width, 36);
        assert_eq!(popup.height, 11);
    }
}
