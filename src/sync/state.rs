//! # Module: Dashboard View
//!
//! ## Responsibility
//! The state the coordinator owns and publishes. Readers receive it as an
//! immutable `Arc<DashboardView>`; only the coordinator mutates it.
//!
//! ## Guarantees
//! - `snapshot`, `history`, `distribution` and `view_model` are always
//!   updated in the same event, so readers never see them disagree
//! - Per-row display values are computed on read and never written back
//!   into the snapshot

use std::sync::Arc;
use std::time::Duration;

use tokio::time::Instant;

use crate::model::{Prediction, SearchResult, Snapshot, Source};
use crate::Identity;

use super::history::{MissRateHistory, SourceDistribution};
use super::pending::PendingRefresh;
use super::reducer::{displayed_expires_in, ExpiryBand, ViewModel};
use super::toast::ToastQueue;

/// Search box state.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchState {
    /// Last submitted query.
    pub query: String,
    /// Whether a request is in flight.
    pub loading: bool,
    /// Result of the last successful search.
    pub result: Option<SearchResult>,
    /// Inline error of the last failed search; cleared by the next submit.
    pub error: Option<String>,
}

/// Confidence slider state.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfidenceState {
    /// Locally displayed threshold, changed only by user interaction.
    pub value: f64,
    /// Whether a persist call is in flight.
    pub busy: bool,
}

/// One row of the cache table, ready to draw.
#[derive(Debug, Clone, PartialEq)]
pub struct CacheRow {
    /// Cache key.
    pub query: String,
    /// Entry origin.
    pub source: Source,
    /// Authoritative remaining lifetime from the last poll.
    pub polled_expires_in: i64,
    /// Remaining lifetime counted down by the clock since that poll.
    pub expires_in: i64,
    /// Colour band of `expires_in`.
    pub band: ExpiryBand,
    /// Whether a refresh spinner is showing.
    pub refreshing: bool,
}

/// Everything a renderer needs, published after each applied event.
#[derive(Debug, Clone)]
pub struct DashboardView {
    /// Identity all polled data belongs to.
    pub identity: Identity,
    /// Identities offered for switching.
    pub identities: Vec<Identity>,
    /// Latest snapshot for `identity`, if one arrived yet.
    pub snapshot: Option<Arc<Snapshot>>,
    /// When `snapshot` was applied.
    pub snapshot_received_at: Option<Instant>,
    /// Clock reference, advanced by the ticker.
    pub now: Instant,
    /// Wall-clock time of the last tick, epoch milliseconds.
    pub now_ms: i64,
    /// Miss-rate history for `identity`.
    pub history: MissRateHistory,
    /// Hit distribution of `snapshot`.
    pub distribution: SourceDistribution,
    /// Chart series derived from `history` and `distribution`.
    pub view_model: ViewModel,
    /// Live toasts.
    pub toasts: ToastQueue,
    /// Queries with a visible refresh spinner.
    pub pending_refresh: PendingRefresh,
    /// Search box.
    pub search: SearchState,
    /// Confidence slider.
    pub confidence: ConfidenceState,
    /// Successful polls applied for `identity`.
    pub poll_count: u64,
}

impl DashboardView {
    /// Creates the initial view for `identity`.
    pub fn new(identity: Identity, identities: Vec<Identity>, confidence: f64) -> Self {
        Self {
            identity,
            identities,
            snapshot: None,
            snapshot_received_at: None,
            now: Instant::now(),
            now_ms: chrono::Utc::now().timestamp_millis(),
            history: MissRateHistory::new(),
            distribution: SourceDistribution::default(),
            view_model: ViewModel::default(),
            toasts: ToastQueue::new(),
            pending_refresh: PendingRefresh::new(),
            search: SearchState::default(),
            confidence: ConfidenceState {
                value: confidence,
                busy: false,
            },
            poll_count: 0,
        }
    }

    /// Time between the snapshot's arrival and the current clock reference.
    pub fn since_snapshot(&self) -> Duration {
        match self.snapshot_received_at {
            Some(at) => self.now.saturating_duration_since(at),
            None => Duration::ZERO,
        }
    }

    /// Cache table rows with countdown and colour band applied.
    pub fn cache_rows(&self) -> Vec<CacheRow> {
        let Some(snapshot) = &self.snapshot else {
            return Vec::new();
        };
        let elapsed = self.since_snapshot();
        snapshot
            .cache
            .iter()
            .map(|entry| {
                let expires_in = displayed_expires_in(entry.expires_in, elapsed);
                CacheRow {
                    query: entry.query.clone(),
                    source: entry.source,
                    polled_expires_in: entry.expires_in,
                    expires_in,
                    band: ExpiryBand::for_expires_in(expires_in),
                    refreshing: self.pending_refresh.is_pending(&entry.query),
                }
            })
            .collect()
    }

    /// Predictions paired with whether they clear the displayed threshold.
    pub fn prediction_rows(&self) -> Vec<(&Prediction, bool)> {
        match &self.snapshot {
            Some(snapshot) => snapshot
                .predictions
                .iter()
                .map(|p| (p, p.is_eligible(self.confidence.value)))
                .collect(),
            None => Vec::new(),
        }
    }

    /// Whether a refresh spinner is showing for `query`.
    pub fn is_refreshing(&self, query: &str) -> bool {
        self.pending_refresh.is_pending(query)
    }

    /// Current miss rate as a percentage, if a snapshot arrived.
    pub fn miss_rate_percent(&self) -> Option<f64> {
        self.snapshot
            .as_ref()
            .map(|s| s.clamped_miss_rate() * 100.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::CacheEntry;

    fn view_with(snapshot: Snapshot) -> DashboardView {
        let mut view = DashboardView::new(Identity::new("guest"), vec![], 0.6);
        view.snapshot = Some(Arc::new(snapshot));
        view.snapshot_received_at = Some(view.now);
        view
    }

    #[test]
    fn test_cache_rows_empty_without_snapshot() {
        let view = DashboardView::new(Identity::new("guest"), vec![], 0.6);
        assert!(view.cache_rows().is_empty());
        assert!(view.miss_rate_percent().is_none());
    }

    #[test]
    fn test_cache_row_critical_band() {
        let view = view_with(Snapshot {
            cache: vec![CacheEntry {
                query: "weather in delhi".into(),
                source: Source::Cache,
                expires_in: 10,
            }],
            miss_rate: 0.3,
            ..Snapshot::default()
        });
        let rows = view.cache_rows();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].band, ExpiryBand::Critical);
        assert_eq!(rows[0].expires_in, 10);
        assert!(!rows[0].refreshing);
    }

    #[test]
    fn test_cache_row_counts_down_with_clock() {
        let mut view = view_with(Snapshot {
            cache: vec![CacheEntry {
                query: "q".into(),
                source: Source::Backend,
                expires_in: 62,
            }],
            ..Snapshot::default()
        });
        assert_eq!(view.cache_rows()[0].band, ExpiryBand::Fresh);
        view.now += Duration::from_secs(3);
        let row = &view.cache_rows()[0];
        assert_eq!(row.expires_in, 59);
        assert_eq!(row.polled_expires_in, 62);
        assert_eq!(row.band, ExpiryBand::Expiring);
    }

    #[test]
    fn test_prediction_rows_mark_eligibility() {
        let view = view_with(Snapshot {
            predictions: vec![
                Prediction {
                    query: "a".into(),
                    confidence: 0.9,
                },
                Prediction {
                    query: "b".into(),
                    confidence: 0.4,
                },
            ],
            ..Snapshot::default()
        });
        let rows = view.prediction_rows();
        assert!(rows[0].1);
        assert!(!rows[1].1);
    }
}
