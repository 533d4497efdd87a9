//! # Module: Dashboard Configuration
//!
//! ## Responsibility
//! Parse and validate the TOML file that points the dashboard at a caching
//! service and tunes its timers:
//! ```text
//! cachecraft-tui --config dashboard.toml
//! ```
//!
//! ## Guarantees
//! - Deterministic: same TOML input always produces the same `DashboardConfig`
//! - Validated: all semantic constraints are checked before a config is accepted
//! - Total: every field has a default, so an empty file is a valid config
//! - Schema-exportable: JSON Schema output enables editor autocomplete
//!
//! ## NOT Responsible For
//! - Running timers (that belongs to `sync`)
//! - Issuing requests (that belongs to `client`)

pub mod loader;
pub mod validation;

use std::path::PathBuf;
use std::time::Duration;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::Identity;

/// Lowest confidence threshold the slider allows.
pub const CONFIDENCE_MIN: f64 = 0.5;

/// Highest confidence threshold the slider allows.
pub const CONFIDENCE_MAX: f64 = 0.95;

/// Slider step for the confidence threshold.
pub const CONFIDENCE_STEP: f64 = 0.01;

// ── Default value functions ──────────────────────────────────────────────

fn default_base_url() -> String {
    "http://localhost:8000".to_string()
}

fn default_request_timeout_ms() -> u64 {
    10_000
}

fn default_identity() -> String {
    "guest".to_string()
}

fn default_identities() -> Vec<String> {
    vec!["guest".to_string()]
}

fn default_confidence() -> f64 {
    0.6
}

fn default_poll_interval_ms() -> u64 {
    2000
}

fn default_clock_tick_ms() -> u64 {
    1000
}

fn default_toast_ttl_ms() -> u64 {
    3000
}

fn default_refresh_min_visible_ms() -> u64 {
    1000
}

fn default_export_directory() -> PathBuf {
    PathBuf::from(".")
}

// ── Top-level config ─────────────────────────────────────────────────────

/// Root configuration for a dashboard instance.
///
/// # Example
///
/// ```toml
/// [server]
/// base_url = "http://localhost:8000"
///
/// [session]
/// default_identity = "alice"
/// identities = ["alice", "bob"]
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct DashboardConfig {
    /// Where the caching service lives.
    #[serde(default)]
    pub server: ServerConfig,
    /// Identity selection and slider start value.
    #[serde(default)]
    pub session: SessionConfig,
    /// Timer periods.
    #[serde(default)]
    pub timing: TimingConfig,
    /// Export destination.
    #[serde(default)]
    pub export: ExportConfig,
}

/// Service location and transport settings.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct ServerConfig {
    /// Base URL every endpoint path is appended to.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Per-request timeout in milliseconds.
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            request_timeout_ms: default_request_timeout_ms(),
        }
    }
}

/// Identity selection.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct SessionConfig {
    /// Identity selected at startup.
    #[serde(default = "default_identity")]
    pub default_identity: String,
    /// Known identities offered for switching. Arbitrary identities are
    /// still accepted programmatically.
    #[serde(default = "default_identities")]
    pub identities: Vec<String>,
    /// Initial displayed confidence threshold.
    #[serde(default = "default_confidence")]
    pub confidence: f64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            default_identity: default_identity(),
            identities: default_identities(),
            confidence: default_confidence(),
        }
    }
}

/// Timer periods, all in milliseconds.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct TimingConfig {
    /// Dashboard poll period.
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
    /// Wall-clock tick period.
    #[serde(default = "default_clock_tick_ms")]
    pub clock_tick_ms: u64,
    /// Toast lifetime.
    #[serde(default = "default_toast_ttl_ms")]
    pub toast_ttl_ms: u64,
    /// Minimum time a refresh spinner stays visible.
    #[serde(default = "default_refresh_min_visible_ms")]
    pub refresh_min_visible_ms: u64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: default_poll_interval_ms(),
            clock_tick_ms: default_clock_tick_ms(),
            toast_ttl_ms: default_toast_ttl_ms(),
            refresh_min_visible_ms: default_refresh_min_visible_ms(),
        }
    }
}

impl TimingConfig {
    /// Poll period as a [`Duration`].
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    /// Clock tick period as a [`Duration`].
    pub fn clock_tick(&self) -> Duration {
        Duration::from_millis(self.clock_tick_ms)
    }

    /// Toast lifetime as a [`Duration`].
    pub fn toast_ttl(&self) -> Duration {
        Duration::from_millis(self.toast_ttl_ms)
    }

    /// Minimum refresh spinner duration as a [`Duration`].
    pub fn refresh_min_visible(&self) -> Duration {
        Duration::from_millis(self.refresh_min_visible_ms)
    }
}

/// Where exported files are written.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct ExportConfig {
    /// Target directory for `cachecraft_export.*` files.
    #[serde(default = "default_export_directory")]
    pub directory: PathBuf,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            directory: default_export_directory(),
        }
    }
}

impl DashboardConfig {
    /// Identity selected at startup.
    pub fn initial_identity(&self) -> Identity {
        Identity::new(self.session.default_identity.clone())
    }

    /// Known identities, with the default identity guaranteed to be present.
    pub fn known_identities(&self) -> Vec<Identity> {
        let mut ids: Vec<Identity> = self
            .session
            .identities
            .iter()
            .map(|s| Identity::new(s.clone()))
            .collect();
        let initial = self.initial_identity();
        if !ids.contains(&initial) {
            ids.insert(0, initial);
        }
        ids
    }

    /// Request timeout as a [`Duration`].
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.server.request_timeout_ms)
    }
}

/// Clamps a confidence value to the slider range and snaps it to the step.
pub fn clamp_confidence(value: f64) -> f64 {
    if value.is_nan() {
        return CONFIDENCE_MIN;
    }
    let clamped = value.clamp(CONFIDENCE_MIN, CONFIDENCE_MAX);
    let snapped = (clamped / CONFIDENCE_STEP).round() * CONFIDENCE_STEP;
    // Re-round to two decimals to shed float noise from the multiplication.
    ((snapped * 100.0).round() / 100.0).clamp(CONFIDENCE_MIN, CONFIDENCE_MAX)
}

/// Export the JSON Schema of [`DashboardConfig`] as pretty-printed JSON.
///
/// # Errors
///
/// Returns `serde_json::Error` if serialization fails.
pub fn schema_json() -> Result<String, serde_json::Error> {
    let schema = schemars::schema_for!(DashboardConfig);
    serde_json::to_string_pretty(&schema)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_matches_service_defaults() {
        let cfg = DashboardConfig::default();
        assert_eq!(cfg.timing.poll_interval_ms, 2000);
        assert_eq!(cfg.timing.clock_tick_ms, 1000);
        assert_eq!(cfg.timing.toast_ttl_ms, 3000);
        assert_eq!(cfg.timing.refresh_min_visible_ms, 1000);
        assert_eq!(cfg.session.default_identity, "guest");
    }

    #[test]
    fn test_known_identities_includes_default() {
        let mut cfg = DashboardConfig::default();
        cfg.session.default_identity = "carol".into();
        cfg.session.identities = vec!["alice".into(), "bob".into()];
        let ids = cfg.known_identities();
        assert_eq!(ids[0], Identity::new("carol"));
        assert_eq!(ids.len(), 3);
    }

    #[test]
    fn test_clamp_confidence_bounds() {
        assert_eq!(clamp_confidence(0.1), 0.5);
        assert_eq!(clamp_confidence(1.0), 0.95);
        assert_eq!(clamp_confidence(f64::NAN), 0.5);
    }

    #[test]
    fn test_clamp_confidence_snaps_to_step() {
        assert_eq!(clamp_confidence(0.734), 0.73);
        assert_eq!(clamp_confidence(0.736), 0.74);
        assert_eq!(clamp_confidence(0.6), 0.6);
    }

    #[test]
    fn test_schema_json_mentions_sections() {
        let schema = schema_json().unwrap();
        assert!(schema.contains("server"));
        assert!(schema.contains("timing"));
    }
}
