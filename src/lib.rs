//! # cachecraft-dashboard
//!
//! Live operational dashboard for the CacheCraft caching service.
//!
//! ## Architecture
//!
//! One coordinator owns every piece of dashboard state. Independently-timed
//! sources feed it through a single event channel and it publishes an
//! immutable view after each applied event:
//! ```text
//! PollScheduler (2s) ──┐
//! ClockTicker (1s) ────┤
//! Command tasks ───────┼──► Coordinator ──watch──► DashboardView ──► TUI / logs
//! Toast timers ────────┤
//! DashboardHandle ─────┘
//! ```

// ── Lint policy ───────────────────────────────────────────────────────────
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::todo)]
#![deny(missing_docs)]

use thiserror::Error;
use tracing_subscriber::EnvFilter;

pub mod cli;
pub mod client;
pub mod config;
pub mod mock;
pub mod model;
pub mod sync;

#[cfg(feature = "tui")]
pub mod tui;

// Re-exports for convenience
pub use client::{DashboardApi, ExportFormat, ExportPayload, HttpDashboardApi};
pub use config::DashboardConfig;
pub use mock::MockBackend;
pub use model::{CacheEntry, HitRecord, Prediction, SearchResult, Snapshot, Source};
pub use sync::{Action, Coordinator, DashboardHandle, DashboardView};

/// Initialise the global tracing subscriber.
///
/// Reads the `LOG_FORMAT` environment variable to choose output format:
/// - `"json"`: structured JSON output for log aggregators
/// - anything else (including unset): human-readable pretty output
///
/// Filter level is controlled by `RUST_LOG` (e.g. `RUST_LOG=info`).
///
/// # Errors
///
/// Returns [`DashboardError::Other`] if the global subscriber has already
/// been set (e.g. by a previous call or a test harness).
///
/// # Panics
///
/// This function never panics.
pub fn init_tracing() -> Result<(), DashboardError> {
    let format = std::env::var("LOG_FORMAT").unwrap_or_else(|_| "pretty".to_string());

    let result = match format.as_str() {
        "json" => tracing_subscriber::fmt()
            .json()
            .with_env_filter(EnvFilter::from_default_env())
            .with_current_span(true)
            .try_init(),
        _ => tracing_subscriber::fmt()
            .pretty()
            .with_env_filter(EnvFilter::from_default_env())
            .try_init(),
    };

    result.map_err(|e| DashboardError::Other(format!("tracing init failed: {e}")))
}

/// Initialise tracing into a file instead of stdout.
///
/// Used by the terminal dashboard, where stdout belongs to the alternate
/// screen. Output is plain text without ANSI colours.
///
/// # Errors
///
/// Returns [`DashboardError::Io`] if the file cannot be created and
/// [`DashboardError::Other`] if a subscriber is already installed.
pub fn init_file_tracing(path: &std::path::Path) -> Result<(), DashboardError> {
    let file = std::fs::File::create(path)?;
    tracing_subscriber::fmt()
        .with_ansi(false)
        .with_writer(std::sync::Mutex::new(file))
        .with_env_filter(EnvFilter::from_default_env())
        .try_init()
        .map_err(|e| DashboardError::Other(format!("tracing init failed: {e}")))
}

/// Top-level dashboard errors.
///
/// Every failure surfaced by the API client or the engine maps to a variant
/// here. How a failure is presented (silently skipped, toast, inline error)
/// is decided by the coordinator, not by the error itself.
#[derive(Error, Debug)]
pub enum DashboardError {
    /// Transport-level failure (connect, timeout, body read).
    #[error("request failed: {0}")]
    Http(String),

    /// The service answered with a non-success status code.
    #[error("{endpoint} returned {status}")]
    Status {
        /// Endpoint path, e.g. `/dashboard`.
        endpoint: String,
        /// HTTP status code.
        status: u16,
    },

    /// A response body could not be decoded.
    #[error("decode error: {0}")]
    Decode(String),

    /// Local file I/O failed (export, log file).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// The coordinator's event channel is closed.
    #[error("dashboard coordinator is not running")]
    ChannelClosed,

    /// A background command task ended without producing a result.
    #[error("background task failed: {0}")]
    TaskFailed(String),

    /// Catch-all for errors that do not fit a specific variant.
    #[error("{0}")]
    Other(String),
}

impl From<reqwest::Error> for DashboardError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            Self::Decode(e.to_string())
        } else {
            Self::Http(e.to_string())
        }
    }
}

/// The selected user context that scopes every request and all polled state.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Identity(
    /// Raw identity string as sent in the `user` query parameter.
    pub String,
);

impl Identity {
    /// Create a new [`Identity`] from any string-like value.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Return the identity as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Identity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_as_str_round_trips() {
        let id = Identity::new("alice");
        assert_eq!(id.as_str(), "alice");
        assert_eq!(id.to_string(), "alice");
    }

    #[test]
    fn test_status_error_display_includes_endpoint_and_code() {
        let err = DashboardError::Status {
            endpoint: "/dashboard".into(),
            status: 503,
        };
        let msg = err.to_string();
        assert!(msg.contains("/dashboard"));
        assert!(msg.contains("503"));
    }

    #[test]
    fn test_io_error_converts() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: DashboardError = io.into();
        assert!(matches!(err, DashboardError::Io(_)));
    }

    #[test]
    fn test_init_tracing_second_call_returns_err() {
        let _ = init_tracing();
        let result = init_tracing();
        assert!(result.is_err(), "double init must return Err, not panic");
    }
}
