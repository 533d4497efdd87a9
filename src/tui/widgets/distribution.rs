//! # Widget: Source Distribution
//!
//! Bar chart of the last ten hits by source, in the fixed order
//! backend, cache, predicted.

use ratatui::layout::{Direction, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Bar, BarChart, BarGroup, Block, Borders};
use ratatui::Frame;

use crate::sync::reducer::PIE_LABELS;
use crate::tui::app::App;

const BAR_COLORS: [Color; 3] = [Color::Red, Color::Green, Color::Magenta];

/// Renders the distribution chart.
pub fn render(f: &mut Frame, area: Rect, app: &App) {
    let pie = app.view.view_model.pie;
    let bars: Vec<Bar> = PIE_LABELS
        .iter()
        .zip(pie.iter())
        .zip(BAR_COLORS.iter())
        .map(|((label, value), color)| {
            Bar::default()
                .value(*value)
                .label(Line::from(*label))
                .style(Style::default().fg(*color))
                .value_style(Style::default().fg(Color::Black).bg(*color))
        })
        .collect();

    let block = Block::default()
        .title(Span::styled(
            " LAST 10 HITS BY SOURCE ",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray));

    let chart = BarChart::default()
        .block(block)
        .direction(Direction::Horizontal)
        .data(BarGroup::default().bars(&bars))
        .bar_width(1)
        .bar_gap(1)
        .max(10);
    f.render_widget(chart, area);
}
