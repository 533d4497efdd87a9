//! # Module: TUI Widgets
//!
//! ## Responsibility
//! Individual rendering widgets for each dashboard section. Each widget is a pure
//! function that takes app state and a layout rect, and renders into a frame.
//!
//! ## Guarantees
//! - All widgets handle a missing snapshot gracefully (empty state rendering)
//! - No widget panics on any input range
//! - Band, severity and source colours are consistent across widgets

use ratatui::style::Color;

use crate::model::Source;
use crate::sync::{ExpiryBand, Severity};

pub mod analytics;
pub mod cache;
pub mod distribution;
pub mod header;
pub mod hits;
pub mod miss_rate;
pub mod predictions;
pub mod search;
pub mod toasts;

/// Colour of an expiry band: green, yellow, red.
pub fn band_color(band: ExpiryBand) -> Color {
    match band {
        ExpiryBand::Fresh => Color::Green,
        ExpiryBand::Expiring => Color::Yellow,
        ExpiryBand::Critical => Color::Red,
    }
}

/// Colour of a toast severity.
pub fn severity_color(severity: Severity) -> Color {
    match severity {
        Severity::Info => Color::Cyan,
        Severity::Success => Color::Green,
        Severity::Warn => Color::Yellow,
        Severity::Error => Color::Red,
    }
}

/// Colour of a hit or entry source.
pub fn source_color(source: Source) -> Color {
    match source {
        Source::Backend => Color::Red,
        Source::Cache => Color::Green,
        Source::FuzzyCache => Color::LightGreen,
        Source::Predicted => Color::Magenta,
        Source::Unknown => Color::DarkGray,
    }
}
