//! In-memory stand-in for the CacheCraft service.
//!
//! [`MockBackend`] implements [`DashboardApi`] without a network. It keeps a
//! per-user cache with a fixed lifetime, a bounded hit log, analytics counters
//! and a deterministic predictor, so the dashboard behaves the same way it
//! does against the real service.
//!
//! ## Usage
//!
//! ```no_run
//! use std::sync::Arc;
//! use cachecraft_dashboard::{Coordinator, DashboardConfig, MockBackend};
//! # #[tokio::main]
//! # async fn main() {
//! let api = Arc::new(MockBackend::new());
//! let (coordinator, handle) = Coordinator::new(DashboardConfig::default(), api);
//! tokio::spawn(coordinator.run());
//! # drop(handle);
//! # }
//! ```

use std::time::Duration;

use async_trait::async_trait;
use dashmap::DashMap;
use serde_json::json;
use tokio::time::Instant;
use tracing::debug;

use crate::client::{DashboardApi, ExportFormat, ExportPayload};
use crate::model::{CacheEntry, HitRecord, Prediction, SearchResult, Snapshot, Source};
use crate::{DashboardError, Identity};

/// Lifetime of a cache entry.
pub const ENTRY_LIFETIME_SECS: i64 = 300;

/// Number of hits kept in the log.
pub const HIT_LOG_CAP: usize = 10;

/// Minimum similarity for a fuzzy cache hit.
pub const FUZZY_CUTOFF: f64 = 0.85;

/// Prefetch threshold before a user moves the slider.
pub const DEFAULT_THRESHOLD: f64 = 0.6;

const BACKEND_LATENCY_MS: f64 = 500.0;
const CACHE_LATENCY_MS: f64 = 30.0;

/// Suffixes and confidences the predictor derives from the last query.
const PREDICTION_TEMPLATES: [(&str, f64); 3] =
    [("tomorrow", 0.83), ("forecast", 0.71), ("news", 0.42)];

#[derive(Debug, Clone)]
struct StoredEntry {
    key: String,
    result: String,
    source: Source,
    stored_at: Instant,
    stored_at_epoch: i64,
}

impl StoredEntry {
    fn remaining_secs(&self, now: Instant) -> i64 {
        let age = now.saturating_duration_since(self.stored_at).as_secs();
        ENTRY_LIFETIME_SECS - i64::try_from(age).unwrap_or(i64::MAX)
    }

    fn is_live(&self, now: Instant) -> bool {
        self.remaining_secs(now) > 0
    }
}

#[derive(Debug, Clone)]
struct UserState {
    // Insertion-ordered; a replaced key keeps its position.
    cache: Vec<StoredEntry>,
    hits: Vec<HitRecord>,
    predictions: Vec<Prediction>,
    threshold: f64,
    api_calls_saved: u64,
    total_backend_calls: u64,
    total_cache_hits: u64,
}

impl Default for UserState {
    fn default() -> Self {
        Self {
            cache: Vec::new(),
            hits: Vec::new(),
            predictions: Vec::new(),
            threshold: DEFAULT_THRESHOLD,
            api_calls_saved: 0,
            total_backend_calls: 0,
            total_cache_hits: 0,
        }
    }
}

impl UserState {
    fn find(&self, key: &str) -> Option<&StoredEntry> {
        self.cache.iter().find(|e| e.key == key)
    }

    fn store(&mut self, key: String, result: String, source: Source) {
        let entry = StoredEntry {
            key,
            result,
            source,
            stored_at: Instant::now(),
            stored_at_epoch: chrono::Utc::now().timestamp(),
        };
        match self.cache.iter_mut().find(|e| e.key == entry.key) {
            Some(slot) => *slot = entry,
            None => self.cache.push(entry),
        }
    }

    fn record_hit(&mut self, query: &str, source: Source) {
        self.hits.push(HitRecord {
            query: query.to_string(),
            source,
            time: Some(chrono::Utc::now().timestamp()),
        });
        if self.hits.len() > HIT_LOG_CAP {
            self.hits.remove(0);
        }
    }

    fn served_from_cache(&mut self) {
        self.api_calls_saved += 1;
        self.total_cache_hits += 1;
    }

    fn predict_and_prefetch(&mut self, last_query: &str) {
        let now = Instant::now();
        self.predictions = PREDICTION_TEMPLATES
            .iter()
            .map(|(suffix, confidence)| Prediction {
                query: format!("{last_query} {suffix}"),
                confidence: *confidence,
            })
            .collect();

        let eligible: Vec<Prediction> = self
            .predictions
            .iter()
            .filter(|p| p.confidence >= self.threshold)
            .cloned()
            .collect();
        for prediction in eligible {
            let key = normalize(&prediction.query);
            if self.find(&key).is_some_and(|e| e.is_live(now)) {
                continue;
            }
            debug!(query = %key, confidence = prediction.confidence, "prefetching prediction");
            self.store(
                key,
                format!("Predicted backend result for {}", prediction.query),
                Source::Predicted,
            );
        }
    }

    fn snapshot(&self) -> Snapshot {
        let now = Instant::now();
        let cache = self
            .cache
            .iter()
            .filter(|e| e.is_live(now))
            .map(|e| CacheEntry {
                query: e.key.clone(),
                source: e.source,
                expires_in: e.remaining_secs(now),
            })
            .collect();

        let misses = self.hits.iter().filter(|h| h.source == Source::Backend).count();
        let hits = self.hits.iter().filter(|h| h.source.is_hit()).count();
        let miss_rate = if misses + hits > 0 {
            misses as f64 / (misses + hits) as f64
        } else {
            0.0
        };

        let total_calls = self.total_backend_calls + self.total_cache_hits;
        let avg_latency_saved = if total_calls > 0 {
            self.api_calls_saved as f64 * (BACKEND_LATENCY_MS - CACHE_LATENCY_MS)
                / total_calls as f64
        } else {
            0.0
        };

        Snapshot {
            cache,
            last_10_hits: self.hits.clone(),
            miss_rate,
            predictions: self.predictions.clone(),
            api_calls_saved: self.api_calls_saved,
            total_backend_calls: self.total_backend_calls,
            total_cache_hits: self.total_cache_hits,
            avg_latency_saved,
        }
    }
}

fn normalize(query: &str) -> String {
    query.trim().to_lowercase()
}

/// Similarity of two strings in [0, 1]: twice the longest common subsequence
/// over the combined length.
pub fn similarity(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let total = a.len() + b.len();
    if total == 0 {
        return 1.0;
    }
    let mut prev = vec![0usize; b.len() + 1];
    let mut row = vec![0usize; b.len() + 1];
    for ca in &a {
        for (j, cb) in b.iter().enumerate() {
            row[j + 1] = if ca == cb {
                prev[j] + 1
            } else {
                row[j].max(prev[j + 1])
            };
        }
        std::mem::swap(&mut prev, &mut row);
    }
    2.0 * prev[b.len()] as f64 / total as f64
}

/// In-memory [`DashboardApi`].
#[derive(Debug, Default)]
pub struct MockBackend {
    users: DashMap<String, UserState>,
    latency: Option<Duration>,
}

impl MockBackend {
    /// Creates an empty backend that answers immediately.
    pub fn new() -> Self {
        Self::default()
    }

    /// Delays every answer by `latency`.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Prefetch threshold currently stored for `user`.
    pub fn threshold(&self, user: &Identity) -> f64 {
        self.users
            .get(user.as_str())
            .map_or(DEFAULT_THRESHOLD, |state| state.threshold)
    }

    async fn simulate_latency(&self) {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
    }

    fn search_now(&self, query: &str, user: &Identity) -> SearchResult {
        let now = Instant::now();
        let key = normalize(query);
        let mut state = self.users.entry(user.as_str().to_string()).or_default();

        let exact = state.find(&key).cloned();
        let (entry, fuzzy) = match exact {
            Some(entry) => (Some(entry), false),
            None => {
                let closest = state
                    .cache
                    .iter()
                    .map(|e| (similarity(&key, &e.key), e))
                    .filter(|(score, _)| *score >= FUZZY_CUTOFF)
                    .max_by(|a, b| a.0.total_cmp(&b.0))
                    .map(|(_, e)| e.clone());
                let found = closest.is_some();
                (closest, found)
            }
        };

        let answer = match entry.filter(|e| e.is_live(now)) {
            Some(entry) => {
                state.served_from_cache();
                let source = if fuzzy {
                    Source::FuzzyCache
                } else if entry.source == Source::Backend {
                    Source::Cache
                } else {
                    entry.source
                };
                SearchResult {
                    result: entry.result,
                    source,
                }
            }
            None => {
                let result = format!("Backend result for {query}");
                state.store(key, result.clone(), Source::Backend);
                state.total_backend_calls += 1;
                SearchResult {
                    result,
                    source: Source::Backend,
                }
            }
        };

        state.record_hit(query, answer.source);
        state.predict_and_prefetch(query.trim());
        debug!(user = %user, query, source = answer.source.label(), "mock search");
        answer
    }

    fn export_now(
        &self,
        format: ExportFormat,
        user: &Identity,
    ) -> Result<ExportPayload, DashboardError> {
        let state = self
            .users
            .get(user.as_str())
            .map(|s| s.value().clone())
            .unwrap_or_default();
        let body = match format {
            ExportFormat::Json => {
                let cache: serde_json::Map<String, serde_json::Value> = state
                    .cache
                    .iter()
                    .map(|e| {
                        (
                            e.key.clone(),
                            json!({
                                "result": e.result,
                                "timestamp": e.stored_at_epoch,
                                "expiry": ENTRY_LIFETIME_SECS,
                                "source": e.source,
                            }),
                        )
                    })
                    .collect();
                let value = json!({
                    "cache": cache,
                    "last_10_hits": state.hits,
                    "predictions": state.predictions,
                });
                serde_json::to_vec_pretty(&value)
                    .map_err(|e| DashboardError::Decode(e.to_string()))?
            }
            ExportFormat::Csv => {
                let mut out = String::from("query,source,timestamp,expiry\r\n");
                for e in &state.cache {
                    out.push_str(&format!(
                        "{},{},{},{}\r\n",
                        csv_field(&e.key),
                        e.source.label(),
                        e.stored_at_epoch,
                        ENTRY_LIFETIME_SECS
                    ));
                }
                out.into_bytes()
            }
        };
        Ok(ExportPayload { format, body })
    }
}

fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

#[async_trait]
impl DashboardApi for MockBackend {
    async fn fetch_dashboard(&self, user: &Identity) -> Result<Snapshot, DashboardError> {
        self.simulate_latency().await;
        let state = self.users.entry(user.as_str().to_string()).or_default();
        Ok(state.snapshot())
    }

    async fn search(&self, query: &str, user: &Identity) -> Result<SearchResult, DashboardError> {
        self.simulate_latency().await;
        Ok(self.search_now(query, user))
    }

    async fn set_confidence(&self, confidence: f64, user: &Identity) -> Result<(), DashboardError> {
        self.simulate_latency().await;
        if !(0.0..=1.0).contains(&confidence) {
            return Err(DashboardError::Status {
                endpoint: "/set_confidence".to_string(),
                status: 400,
            });
        }
        self.users
            .entry(user.as_str().to_string())
            .or_default()
            .threshold = confidence;
        Ok(())
    }

    async fn refresh(&self, query: &str, user: &Identity) -> Result<(), DashboardError> {
        self.simulate_latency().await;
        let mut state = self.users.entry(user.as_str().to_string()).or_default();
        state.store(
            normalize(query),
            format!("Backend result for {query} (refreshed)"),
            Source::Backend,
        );
        Ok(())
    }

    async fn export(
        &self,
        format: ExportFormat,
        user: &Identity,
    ) -> Result<ExportPayload, DashboardError> {
        self.simulate_latency().await;
        self.export_now(format, user)
    }
}
