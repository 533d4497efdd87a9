//! # Widget: Toasts
//!
//! Live toasts stacked in the bottom-right corner, oldest on top.

use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use ratatui::Frame;

use super::severity_color;
use crate::tui::app::App;

/// Widest a toast gets.
pub const TOAST_WIDTH: u16 = 44;

/// Area of the toast stack inside `area` for `count` toasts.
pub fn stack_area(area: Rect, count: usize) -> Option<Rect> {
    if count == 0 {
        return None;
    }
    let width = TOAST_WIDTH.min(area.width.saturating_sub(2));
    let wanted = u16::try_from(count).unwrap_or(u16::MAX).saturating_mul(3);
    let height = wanted.min(area.height.saturating_sub(2));
    if width == 0 || height == 0 {
        return None;
    }
    Some(Rect::new(
        area.x + area.width - width - 1,
        area.y + area.height - height - 1,
        width,
        height,
    ))
}

/// Renders the toast stack over whatever is below it.
pub fn render(f: &mut Frame, area: Rect, app: &App) {
    let toasts = app.view.toasts.toasts();
    let Some(stack) = stack_area(area, toasts.len()) else {
        return;
    };
    let visible = usize::from(stack.height / 3);
    let skip = toasts.len().saturating_sub(visible);

    for (i, toast) in toasts.iter().skip(skip).enumerate() {
        let offset = u16::try_from(i).unwrap_or(u16::MAX).saturating_mul(3);
        if offset >= stack.height {
            break;
        }
        let slot = Rect::new(stack.x, stack.y + offset, stack.width, 3.min(stack.height - offset));
        let color = severity_color(toast.severity);
        let block = Block::default()
            .title(Span::styled(
                format!(" {} ", toast.severity.label()),
                Style::default().fg(color),
            ))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(color));
        let para = Paragraph::new(Line::from(Span::styled(
            toast.message.as_str(),
            Style::default().fg(Color::White),
        )))
        .block(block)
        .wrap(Wrap { trim: true });
        f.render_widget(Clear, slot);
        f.render_widget(para, slot);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stack_area_none_without_toasts() {
        assert!(stack_area(Rect::new(0, 0, 120, 40), 0).is_none());
    }

    #[test]
    fn test_stack_area_bottom_right() {
        let area = stack_area(Rect::new(0, 0, 120, 40), 2).unwrap();
        assert_eq!(area.width, TOAST_WIDTH);
        assert_eq!(area.height, 6);
        assert_eq!(area.x + area.width, 119);
        assert_eq!(area.y + area.height, 39);
    }

    #[test]
    fn test_stack_area_capped_by_terminal() {
        let area = stack_area(Rect::new(0, 0, 20, 5), 10).unwrap();
        assert_eq!(area.width, 18);
        assert_eq!(area.height, 3);
    }
}
