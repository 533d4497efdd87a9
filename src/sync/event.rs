//! Messages flowing into the coordinator.
//!
//! [`Action`]s are user intents sent through a [`super::DashboardHandle`].
//! [`Event`]s are reports from the engine's own background tasks.

use std::path::PathBuf;

use crate::client::ExportFormat;
use crate::model::{SearchResult, Snapshot};
use crate::{DashboardError, Identity};

use super::pending::RefreshToken;
use super::toast::{Severity, ToastId};

/// A user intent.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Switch the active identity; restarts polling for the new one.
    SelectIdentity(Identity),
    /// Submit a search.
    Search(String),
    /// Move the confidence slider to an absolute value (clamped and snapped).
    SetConfidence(f64),
    /// Move the confidence slider by a number of steps.
    NudgeConfidence(i32),
    /// Force a backend refetch of one cache entry.
    RefreshEntry(String),
    /// Download an export of the active identity's cache.
    Export(ExportFormat),
    /// Show a toast.
    Notify {
        /// Toast text.
        message: String,
        /// Toast severity.
        severity: Severity,
    },
    /// Stop polling and end the coordinator loop.
    Shutdown,
}

impl Action {
    /// Convenience constructor for an info-level [`Action::Notify`].
    pub fn notify(message: impl Into<String>) -> Self {
        Self::Notify {
            message: message.into(),
            severity: Severity::Info,
        }
    }
}

/// Report from a background task.
#[derive(Debug)]
pub(crate) enum Event {
    /// A dashboard fetch finished.
    Polled {
        epoch: u64,
        seq: u64,
        completed_at_ms: i64,
        result: Result<Snapshot, DashboardError>,
    },
    /// The wall clock advanced.
    Tick,
    /// A toast reached the end of its lifetime.
    ToastExpired(ToastId),
    /// A search request settled.
    SearchSettled {
        seq: u64,
        result: Result<SearchResult, DashboardError>,
    },
    /// A confidence persist call settled.
    ConfidencePersisted {
        value: f64,
        result: Result<(), DashboardError>,
    },
    /// A refresh request settled.
    RefreshSettled {
        query: String,
        result: Result<(), DashboardError>,
    },
    /// The minimum spinner window of a refresh is over.
    RefreshCleared { query: String, token: RefreshToken },
    /// An export was saved (or failed).
    ExportSettled {
        format: ExportFormat,
        result: Result<PathBuf, DashboardError>,
    },
}
