//! # Module: Command Dispatcher
//!
//! ## Responsibility
//! Issue user-triggered requests (search, set-confidence, refresh, export)
//! as detached tasks and report their outcome to the coordinator.
//!
//! ## Guarantees
//! - Fire-and-forget: no command blocks or resets the poll cadence
//! - Every spawned command reports exactly one settle event, even if the
//!   request future panics (the panic becomes [`DashboardError::TaskFailed`])
//! - A refresh reports its clear no sooner than the minimum spinner window
//!   after invocation
//!
//! ## NOT Responsible For
//! - Mutating state: the coordinator sets loading/pending flags before
//!   calling in here and applies the settle events afterwards

use std::future::Future;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::Instant;
use tracing::debug;

use crate::client::{DashboardApi, ExportFormat};
use crate::model::{SearchResult, Source};
use crate::{DashboardError, Identity};

use super::event::Event;
use super::pending::RefreshToken;
use super::toast::{Severity, ToastId};

/// Runs `fut` on its own task so a panic inside it still yields a result.
async fn settle<T, F>(fut: F) -> Result<T, DashboardError>
where
    F: Future<Output = Result<T, DashboardError>> + Send + 'static,
    T: Send + 'static,
{
    match tokio::spawn(fut).await {
        Ok(result) => result,
        Err(join_err) => Err(DashboardError::TaskFailed(join_err.to_string())),
    }
}

/// Toast for a search answer, selected by its source tag.
///
/// Unknown sources produce no toast.
pub fn search_toast(result: &SearchResult) -> Option<(String, Severity)> {
    match result.source {
        Source::Cache => Some(("Served from cache".to_string(), Severity::Success)),
        Source::Predicted => Some((
            "Served from a predicted prefetch".to_string(),
            Severity::Info,
        )),
        Source::FuzzyCache => Some((
            "Served from a similar cached query".to_string(),
            Severity::Info,
        )),
        Source::Backend => Some((
            "Cache miss, fetched from backend".to_string(),
            Severity::Warn,
        )),
        Source::Unknown => None,
    }
}

pub(crate) fn spawn_search(
    api: Arc<dyn DashboardApi>,
    tx: mpsc::Sender<Event>,
    seq: u64,
    query: String,
    identity: Identity,
) {
    tokio::spawn(async move {
        let result = settle(async move { api.search(&query, &identity).await }).await;
        let _ = tx.send(Event::SearchSettled { seq, result }).await;
    });
}

pub(crate) fn spawn_set_confidence(
    api: Arc<dyn DashboardApi>,
    tx: mpsc::Sender<Event>,
    value: f64,
    identity: Identity,
) {
    tokio::spawn(async move {
        let result = settle(async move { api.set_confidence(value, &identity).await }).await;
        let _ = tx.send(Event::ConfidencePersisted { value, result }).await;
    });
}

/// Issues a refresh and schedules the spinner clear at
/// `started + min_visible`, or right after the settle if that is later.
pub(crate) fn spawn_refresh(
    api: Arc<dyn DashboardApi>,
    tx: mpsc::Sender<Event>,
    query: String,
    token: RefreshToken,
    identity: Identity,
    started: Instant,
    min_visible: Duration,
) {
    tokio::spawn(async move {
        let request_query = query.clone();
        let result = settle(async move { api.refresh(&request_query, &identity).await }).await;
        let _ = tx
            .send(Event::RefreshSettled {
                query: query.clone(),
                result,
            })
            .await;
        tokio::time::sleep_until(started + min_visible).await;
        debug!(query = %query, token, "refresh spinner window over");
        let _ = tx.send(Event::RefreshCleared { query, token }).await;
    });
}

pub(crate) fn spawn_export(
    api: Arc<dyn DashboardApi>,
    tx: mpsc::Sender<Event>,
    format: ExportFormat,
    identity: Identity,
    directory: PathBuf,
) {
    tokio::spawn(async move {
        let result = settle(async move {
            let payload = api.export(format, &identity).await?;
            payload.save_into(&directory).await
        })
        .await;
        let _ = tx.send(Event::ExportSettled { format, result }).await;
    });
}

/// Arms the removal timer of one toast.
pub(crate) fn spawn_toast_expiry(tx: mpsc::Sender<Event>, id: ToastId, ttl: Duration) {
    tokio::spawn(async move {
        tokio::time::sleep(ttl).await;
        let _ = tx.send(Event::ToastExpired(id)).await;
    });
}
