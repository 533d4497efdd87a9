//! Client-accumulated series derived from polled snapshots.
//!
//! [`MissRateHistory`] is a bounded ring buffer appended once per successful
//! poll. [`SourceDistribution`] is recomputed from scratch for every snapshot
//! and never accumulates across polls.

use std::collections::VecDeque;

use crate::model::{HitRecord, Source};

/// Maximum number of miss-rate points retained.
pub const MISS_RATE_HISTORY_CAP: usize = 20;

/// One miss-rate sample, stamped with the poll completion time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MissRatePoint {
    /// Epoch milliseconds at which the poll completed.
    pub timestamp_ms: i64,
    /// Miss rate in [0, 1].
    pub value: f64,
}

/// Bounded miss-rate history, oldest first.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MissRateHistory {
    points: VecDeque<MissRatePoint>,
}

impl MissRateHistory {
    /// Creates an empty history.
    pub fn new() -> Self {
        Self {
            points: VecDeque::with_capacity(MISS_RATE_HISTORY_CAP),
        }
    }

    /// Appends a point, evicting the oldest if at capacity.
    pub fn push(&mut self, point: MissRatePoint) {
        if self.points.len() >= MISS_RATE_HISTORY_CAP {
            self.points.pop_front();
        }
        self.points.push_back(point);
    }

    /// Removes every point.
    pub fn clear(&mut self) {
        self.points.clear();
    }

    /// Number of retained points.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Whether no point has been recorded.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Points, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &MissRatePoint> {
        self.points.iter()
    }

    /// Most recent point.
    pub fn latest(&self) -> Option<&MissRatePoint> {
        self.points.back()
    }
}

/// Hit counts per source bucket for the latest snapshot.
///
/// `fuzzy_cache` hits are counted as `cache`; unknown sources are not
/// counted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SourceDistribution {
    /// Hits served by the backend.
    pub backend: u64,
    /// Exact and fuzzy cache hits.
    pub cache: u64,
    /// Hits on prefetched entries.
    pub predicted: u64,
}

impl SourceDistribution {
    /// Counts the given hit records (reset-then-count).
    pub fn from_hits(hits: &[HitRecord]) -> Self {
        let mut dist = Self::default();
        for hit in hits {
            match hit.source {
                Source::Backend => dist.backend += 1,
                Source::Cache | Source::FuzzyCache => dist.cache += 1,
                Source::Predicted => dist.predicted += 1,
                Source::Unknown => {}
            }
        }
        dist
    }

    /// Sum of all buckets.
    pub fn total(&self) -> u64 {
        self.backend + self.cache + self.predicted
    }

    /// Counts in fixed order `[backend, cache, predicted]`.
    pub fn as_array(&self) -> [u64; 3] {
        [self.backend, self.cache, self.predicted]
    }
}
