//! # Module: View Model Reducer
//!
//! ## Responsibility
//! Pure derivations from state to chart-ready series and per-row display
//! values. Safe to call on every render.
//!
//! ## Guarantees
//! - Deterministic for identical input: no clock reads, no randomness
//! - Time labels are formatted in UTC, independent of the host time zone
//! - Displayed countdowns never go negative
//!
//! ## NOT Responsible For
//! - Drawing (that belongs to `tui`)
//! - Accumulating history (that belongs to `history`)

use std::time::Duration;

use chrono::{DateTime, Utc};

use super::history::{MissRateHistory, SourceDistribution};

/// Seconds above which an entry is comfortably fresh.
pub const FRESH_ABOVE_SECS: i64 = 60;

/// Seconds at or below which an entry is about to expire.
pub const CRITICAL_AT_OR_BELOW_SECS: i64 = 15;

/// Fixed slice labels of the source pie, matching `pie` order.
pub const PIE_LABELS: [&str; 3] = ["backend", "cache", "predicted"];

/// One point of the miss-rate line.
#[derive(Debug, Clone, PartialEq)]
pub struct LinePoint {
    /// `HH:MM:SS` label of the poll completion time.
    pub label: String,
    /// Miss rate as a percentage (value × 100).
    pub percent: f64,
}

/// Chart-ready series.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ViewModel {
    /// Hit counts in order `[backend, cache, predicted]`.
    pub pie: [u64; 3],
    /// Miss-rate history, oldest first.
    pub line: Vec<LinePoint>,
}

/// Derives the chart series from the distribution and the history.
pub fn reduce(distribution: &SourceDistribution, history: &MissRateHistory) -> ViewModel {
    ViewModel {
        pie: distribution.as_array(),
        line: history
            .iter()
            .map(|p| LinePoint {
                label: time_label(p.timestamp_ms),
                percent: p.value * 100.0,
            })
            .collect(),
    }
}

/// Formats epoch milliseconds as `HH:MM:SS` (UTC).
pub fn time_label(timestamp_ms: i64) -> String {
    match DateTime::<Utc>::from_timestamp_millis(timestamp_ms) {
        Some(dt) => dt.format("%H:%M:%S").to_string(),
        None => "--:--:--".to_string(),
    }
}

/// Display colour band of a cache entry, by remaining lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpiryBand {
    /// More than 60 s left.
    Fresh,
    /// More than 15 s and at most 60 s left.
    Expiring,
    /// 15 s or less left.
    Critical,
}

impl ExpiryBand {
    /// Classifies a remaining lifetime in seconds.
    pub fn for_expires_in(expires_in: i64) -> Self {
        if expires_in > FRESH_ABOVE_SECS {
            Self::Fresh
        } else if expires_in > CRITICAL_AT_OR_BELOW_SECS {
            Self::Expiring
        } else {
            Self::Critical
        }
    }

    /// Returns the display label for this band.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Fresh => "fresh",
            Self::Expiring => "expiring",
            Self::Critical => "critical",
        }
    }
}

/// Countdown shown between polls: the polled value minus whole seconds
/// elapsed since the snapshot arrived, floored at zero.
pub fn displayed_expires_in(expires_in: i64, since_snapshot: Duration) -> i64 {
    let elapsed = i64::try_from(since_snapshot.as_secs()).unwrap_or(i64::MAX);
    expires_in.saturating_sub(elapsed).max(0)
}
