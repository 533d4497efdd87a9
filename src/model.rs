//! # Module: Wire Model
//!
//! ## Responsibility
//! Typed shapes of everything the caching service sends back: dashboard
//! snapshots, search results, and the source tags attached to served results.
//!
//! ## Guarantees
//! - Unknown source tags decode to [`Source::Unknown`] instead of failing the
//!   whole snapshot
//! - Optional analytics counters default to zero when absent
//! - Snapshots are plain values: once decoded they are never mutated
//!
//! ## NOT Responsible For
//! - Deriving chart series (that belongs to `sync::reducer`)
//! - Fetching (that belongs to `client`)

use serde::{Deserialize, Serialize};

/// Origin tag of a served result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Source {
    /// Fetched from the slow backend (a cache miss).
    Backend,
    /// Exact cache hit.
    Cache,
    /// Hit on an entry that was prefetched from a prediction.
    Predicted,
    /// Hit on a near-identical cached query.
    FuzzyCache,
    /// Any tag this client does not know about.
    #[serde(other)]
    Unknown,
}

impl Source {
    /// Returns the wire label of this source.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Backend => "backend",
            Self::Cache => "cache",
            Self::Predicted => "predicted",
            Self::FuzzyCache => "fuzzy_cache",
            Self::Unknown => "unknown",
        }
    }

    /// Whether this source counts as a cache hit (anything but a backend fetch).
    pub fn is_hit(&self) -> bool {
        matches!(self, Self::Cache | Self::Predicted | Self::FuzzyCache)
    }
}

/// One live entry in the per-user cache.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry {
    /// Normalized query text; unique within a snapshot.
    pub query: String,
    /// How the entry got into the cache.
    pub source: Source,
    /// Seconds until the entry expires, as of the poll instant.
    pub expires_in: i64,
}

/// One record of the server's bounded hit log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HitRecord {
    /// Query as the user typed it.
    pub query: String,
    /// Where the answer came from.
    pub source: Source,
    /// Epoch seconds at which the hit was served, when reported.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<i64>,
}

/// A predicted next query with the model's confidence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    /// Predicted query text.
    pub query: String,
    /// Confidence in [0, 1].
    #[serde(default = "default_confidence")]
    pub confidence: f64,
}

fn default_confidence() -> f64 {
    1.0
}

impl Prediction {
    /// Whether this prediction clears the given prefetch threshold.
    pub fn is_eligible(&self, threshold: f64) -> bool {
        self.confidence >= threshold
    }
}

/// Server-reported state at one poll instant.
///
/// Each successful poll produces a new snapshot that fully replaces the
/// previous one.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Live cache entries.
    #[serde(default)]
    pub cache: Vec<CacheEntry>,
    /// The ten most recent hits, oldest first.
    #[serde(default)]
    pub last_10_hits: Vec<HitRecord>,
    /// Share of recent hits served by the backend, in [0, 1].
    #[serde(default)]
    pub miss_rate: f64,
    /// Current predictions.
    #[serde(default)]
    pub predictions: Vec<Prediction>,
    /// Backend calls avoided thanks to the cache.
    #[serde(default)]
    pub api_calls_saved: u64,
    /// Backend calls made.
    #[serde(default)]
    pub total_backend_calls: u64,
    /// Cache hits served.
    #[serde(default)]
    pub total_cache_hits: u64,
    /// Average latency saved per call, in milliseconds.
    #[serde(default)]
    pub avg_latency_saved: f64,
}

impl Snapshot {
    /// Returns the miss rate clamped to [0, 1].
    pub fn clamped_miss_rate(&self) -> f64 {
        if self.miss_rate.is_nan() {
            return 0.0;
        }
        self.miss_rate.clamp(0.0, 1.0)
    }
}

/// Answer of the `/search` endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    /// Result text.
    pub result: String,
    /// Where the result came from.
    pub source: Source,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_decodes_minimal_payload() {
        let body = r#"{
            "cache": [{"query": "weather in delhi", "source": "cache", "expires_in": 10}],
            "last_10_hits": [{"query": "weather in delhi", "source": "cache"}],
            "miss_rate": 0.3,
            "predictions": []
        }"#;
        let snap: Snapshot = serde_json::from_str(body).unwrap();
        assert_eq!(snap.cache.len(), 1);
        assert_eq!(snap.cache[0].expires_in, 10);
        assert_eq!(snap.last_10_hits[0].source, Source::Cache);
        assert_eq!(snap.api_calls_saved, 0);
        assert!((snap.miss_rate - 0.3).abs() < f64::EPSILON);
    }

    #[test]
    fn test_unknown_source_does_not_fail_snapshot() {
        let body = r#"{"last_10_hits": [{"query": "q", "source": "edge"}], "miss_rate": 0}"#;
        let snap: Snapshot = serde_json::from_str(body).unwrap();
        assert_eq!(snap.last_10_hits[0].source, Source::Unknown);
    }

    #[test]
    fn test_search_result_fuzzy_source() {
        let r: SearchResult =
            serde_json::from_str(r#"{"result": "x", "source": "fuzzy_cache"}"#).unwrap();
        assert_eq!(r.source, Source::FuzzyCache);
    }

    #[test]
    fn test_source_is_hit() {
        assert!(!Source::Backend.is_hit());
        assert!(Source::Cache.is_hit());
        assert!(Source::Predicted.is_hit());
        assert!(Source::FuzzyCache.is_hit());
        assert!(!Source::Unknown.is_hit());
    }

    #[test]
    fn test_clamped_miss_rate() {
        let snap = Snapshot {
            miss_rate: 1.7,
            ..Snapshot::default()
        };
        assert_eq!(snap.clamped_miss_rate(), 1.0);
        let snap = Snapshot {
            miss_rate: f64::NAN,
            ..Snapshot::default()
        };
        assert_eq!(snap.clamped_miss_rate(), 0.0);
    }

    #[test]
    fn test_prediction_eligibility_is_inclusive() {
        let p = Prediction {
            query: "q".into(),
            confidence: 0.6,
        };
        assert!(p.is_eligible(0.6));
        assert!(!p.is_eligible(0.61));
    }
}
