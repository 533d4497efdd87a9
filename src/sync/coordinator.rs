//! # Module: Root Coordinator
//!
//! ## Responsibility
//! Owns every piece of dashboard state. Starts the clock ticker and the poll
//! scheduler, turns user [`Action`]s into state changes and command tasks,
//! applies the events those tasks report back, and publishes the resulting
//! [`DashboardView`] after each step.
//!
//! ## Guarantees
//! - One event at a time: no state is ever mutated from two places
//! - Identity switches bump the epoch before the new scheduler starts, so a
//!   late or already-queued response from the previous identity is dropped
//!   on arrival
//! - Poll failures are logged and otherwise ignored; command failures become
//!   toasts
//! - `run` returns after [`Action::Shutdown`] or once every handle is dropped
//!
//! ## NOT Responsible For
//! - Transport (that belongs to `client`)
//! - Drawing (that belongs to `tui`)

use std::sync::Arc;

use tokio::sync::{mpsc, watch};
use tokio::time::Instant;
use tracing::{debug, error, info, warn};

use crate::client::DashboardApi;
use crate::config::{clamp_confidence, DashboardConfig, CONFIDENCE_STEP};
use crate::model::Snapshot;
use crate::{DashboardError, Identity};

use super::commands::{self, search_toast};
use super::event::{Action, Event};
use super::history::{MissRateHistory, MissRatePoint, SourceDistribution};
use super::poller::PollScheduler;
use super::reducer::{self, ViewModel};
use super::state::{DashboardView, SearchState};
use super::ticker::ClockTicker;
use super::toast::Severity;

/// Capacity of the internal event channel.
const EVENT_CHANNEL_CAPACITY: usize = 1024;

/// Capacity of the user action channel.
const ACTION_CHANNEL_CAPACITY: usize = 64;

/// Client side of a running [`Coordinator`]: dispatch actions, read views.
#[derive(Debug, Clone)]
pub struct DashboardHandle {
    actions: mpsc::Sender<Action>,
    view: watch::Receiver<Arc<DashboardView>>,
}

impl DashboardHandle {
    /// Sends an action, waiting for channel capacity.
    ///
    /// # Errors
    ///
    /// Returns [`DashboardError::ChannelClosed`] if the coordinator has stopped.
    pub async fn dispatch(&self, action: Action) -> Result<(), DashboardError> {
        self.actions
            .send(action)
            .await
            .map_err(|_| DashboardError::ChannelClosed)
    }

    /// Sends an action without waiting. For synchronous callers such as the
    /// terminal input loop.
    ///
    /// # Errors
    ///
    /// Returns [`DashboardError::ChannelClosed`] if the coordinator has stopped
    /// and [`DashboardError::Other`] if the action queue is full.
    pub fn try_dispatch(&self, action: Action) -> Result<(), DashboardError> {
        self.actions.try_send(action).map_err(|e| match e {
            mpsc::error::TrySendError::Closed(_) => DashboardError::ChannelClosed,
            mpsc::error::TrySendError::Full(_) => {
                DashboardError::Other("action queue full".to_string())
            }
        })
    }

    /// The most recently published view.
    pub fn view(&self) -> Arc<DashboardView> {
        Arc::clone(&self.view.borrow())
    }

    /// A fresh receiver for published views.
    pub fn subscribe(&self) -> watch::Receiver<Arc<DashboardView>> {
        self.view.clone()
    }

    /// Waits for the next published view.
    ///
    /// # Errors
    ///
    /// Returns [`DashboardError::ChannelClosed`] once the coordinator is gone.
    pub async fn changed(&mut self) -> Result<Arc<DashboardView>, DashboardError> {
        self.view
            .changed()
            .await
            .map_err(|_| DashboardError::ChannelClosed)?;
        Ok(Arc::clone(&self.view.borrow_and_update()))
    }
}

/// Owner of all dashboard state.
pub struct Coordinator {
    config: DashboardConfig,
    api: Arc<dyn DashboardApi>,
    actions: mpsc::Receiver<Action>,
    events_tx: mpsc::Sender<Event>,
    events: mpsc::Receiver<Event>,
    view_tx: watch::Sender<Arc<DashboardView>>,
    view: DashboardView,
    poller: Option<PollScheduler>,
    ticker: Option<ClockTicker>,
    epoch: u64,
    last_applied_seq: u64,
    search_seq: u64,
    persists_in_flight: usize,
}

impl Coordinator {
    /// Creates a coordinator and the handle used to drive it.
    ///
    /// Nothing runs until [`Coordinator::run`] is awaited.
    pub fn new(config: DashboardConfig, api: Arc<dyn DashboardApi>) -> (Self, DashboardHandle) {
        let view = DashboardView::new(
            config.initial_identity(),
            config.known_identities(),
            clamp_confidence(config.session.confidence),
        );
        let (actions_tx, actions) = mpsc::channel(ACTION_CHANNEL_CAPACITY);
        let (events_tx, events) = mpsc::channel(EVENT_CHANNEL_CAPACITY);
        let (view_tx, view_rx) = watch::channel(Arc::new(view.clone()));

        let coordinator = Self {
            config,
            api,
            actions,
            events_tx,
            events,
            view_tx,
            view,
            poller: None,
            ticker: None,
            epoch: 0,
            last_applied_seq: 0,
            search_seq: 0,
            persists_in_flight: 0,
        };
        let handle = DashboardHandle {
            actions: actions_tx,
            view: view_rx,
        };
        (coordinator, handle)
    }

    /// Runs the event loop until shutdown.
    pub async fn run(mut self) {
        info!(
            identity = %self.view.identity,
            base_url = %self.config.server.base_url,
            "dashboard coordinator started"
        );
        self.ticker = Some(ClockTicker::start(
            self.config.timing.clock_tick(),
            self.events_tx.clone(),
        ));
        self.start_poller();
        self.publish();

        loop {
            tokio::select! {
                // Actions first: a switch lands ahead of polls already queued.
                biased;
                action = self.actions.recv() => match action {
                    Some(Action::Shutdown) | None => break,
                    Some(action) => self.handle_action(action),
                },
                Some(event) = self.events.recv() => self.handle_event(event),
            }
            self.publish();
        }

        self.poller = None;
        self.ticker = None;
        info!("dashboard coordinator stopped");
    }

    fn publish(&self) {
        self.view_tx.send_replace(Arc::new(self.view.clone()));
    }

    fn start_poller(&mut self) {
        self.epoch += 1;
        self.last_applied_seq = 0;
        // Replacing the option drops (and aborts) the previous instance.
        self.poller = Some(PollScheduler::start(
            self.epoch,
            self.view.identity.clone(),
            Arc::clone(&self.api),
            self.config.timing.poll_interval(),
            self.events_tx.clone(),
        ));
    }

    fn push_toast(&mut self, message: impl Into<String>, severity: Severity) {
        let toast = self.view.toasts.push(message, severity);
        debug!(
            id = %toast.id,
            severity = toast.severity.label(),
            message = %toast.message,
            "toast"
        );
        commands::spawn_toast_expiry(
            self.events_tx.clone(),
            toast.id,
            self.config.timing.toast_ttl(),
        );
    }

    // ── Actions ──────────────────────────────────────────────────────

    fn handle_action(&mut self, action: Action) {
        match action {
            Action::SelectIdentity(identity) => self.select_identity(identity),
            Action::Search(query) => self.search(query),
            Action::SetConfidence(value) => self.set_confidence(value),
            Action::NudgeConfidence(steps) => {
                let target = self.view.confidence.value + f64::from(steps) * CONFIDENCE_STEP;
                self.set_confidence(target);
            }
            Action::RefreshEntry(query) => self.refresh_entry(query),
            Action::Export(format) => {
                info!(
                    format = format.as_query(),
                    identity = %self.view.identity,
                    "export requested"
                );
                commands::spawn_export(
                    Arc::clone(&self.api),
                    self.events_tx.clone(),
                    format,
                    self.view.identity.clone(),
                    self.config.export.directory.clone(),
                );
            }
            Action::Notify { message, severity } => self.push_toast(message, severity),
            // Handled by the run loop.
            Action::Shutdown => {}
        }
    }

    fn select_identity(&mut self, identity: Identity) {
        if identity == self.view.identity {
            debug!(identity = %identity, "identity already active");
            return;
        }
        info!(from = %self.view.identity, to = %identity, "switching identity");
        if let Some(poller) = self.poller.take() {
            poller.stop();
        }
        self.view.identity = identity;
        self.view.snapshot = None;
        self.view.snapshot_received_at = None;
        self.view.history = MissRateHistory::new();
        self.view.distribution = SourceDistribution::default();
        self.view.view_model = ViewModel::default();
        self.view.poll_count = 0;
        self.start_poller();
    }

    fn search(&mut self, query: String) {
        let query = query.trim().to_string();
        if query.is_empty() {
            return;
        }
        self.search_seq += 1;
        self.view.search = SearchState {
            query: query.clone(),
            loading: true,
            result: None,
            error: None,
        };
        commands::spawn_search(
            Arc::clone(&self.api),
            self.events_tx.clone(),
            self.search_seq,
            query,
            self.view.identity.clone(),
        );
    }

    fn set_confidence(&mut self, value: f64) {
        let value = clamp_confidence(value);
        self.view.confidence.value = value;
        self.persists_in_flight += 1;
        self.view.confidence.busy = true;
        commands::spawn_set_confidence(
            Arc::clone(&self.api),
            self.events_tx.clone(),
            value,
            self.view.identity.clone(),
        );
    }

    fn refresh_entry(&mut self, query: String) {
        let started = Instant::now();
        let token = self.view.pending_refresh.begin(&query);
        commands::spawn_refresh(
            Arc::clone(&self.api),
            self.events_tx.clone(),
            query,
            token,
            self.view.identity.clone(),
            started,
            self.config.timing.refresh_min_visible(),
        );
    }

    // ── Events ───────────────────────────────────────────────────────

    fn handle_event(&mut self, event: Event) {
        match event {
            Event::Polled {
                epoch,
                seq,
                completed_at_ms,
                result,
            } => self.apply_poll(epoch, seq, completed_at_ms, result),
            Event::Tick => {
                self.view.now = Instant::now();
                self.view.now_ms = chrono::Utc::now().timestamp_millis();
            }
            Event::ToastExpired(id) => {
                self.view.toasts.remove(id);
            }
            Event::SearchSettled { seq, result } => self.apply_search(seq, result),
            Event::ConfidencePersisted { value, result } => {
                self.persists_in_flight = self.persists_in_flight.saturating_sub(1);
                self.view.confidence.busy = self.persists_in_flight > 0;
                if let Err(e) = result {
                    debug!(value, error = %e, "confidence persist failed");
                }
            }
            Event::RefreshSettled { query, result } => match result {
                Ok(()) => self.push_toast(format!("Refreshed '{query}'"), Severity::Success),
                Err(e) => {
                    warn!(query = %query, error = %e, "refresh failed");
                    self.push_toast(format!("Refresh failed for '{query}': {e}"), Severity::Error);
                }
            },
            Event::RefreshCleared { query, token } => {
                self.view.pending_refresh.finish(&query, token);
            }
            Event::ExportSettled { format, result } => match result {
                Ok(path) => {
                    info!(path = %path.display(), mime = format.mime(), "export saved");
                    self.push_toast(format!("Exported {}", path.display()), Severity::Info);
                }
                Err(e) => {
                    error!(format = format.as_query(), error = %e, "export failed");
                    self.push_toast(format!("Export failed: {e}"), Severity::Error);
                }
            },
        }
    }

    fn apply_poll(
        &mut self,
        epoch: u64,
        seq: u64,
        completed_at_ms: i64,
        result: Result<Snapshot, DashboardError>,
    ) {
        if epoch != self.epoch {
            debug!(epoch, current = self.epoch, "discarding poll from superseded scheduler");
            return;
        }
        if seq <= self.last_applied_seq {
            debug!(seq, last = self.last_applied_seq, "discarding out-of-order poll");
            return;
        }
        let snapshot = match result {
            Ok(snapshot) => snapshot,
            Err(e) => {
                debug!(epoch, seq, error = %e, "poll failed, keeping previous snapshot");
                return;
            }
        };

        self.last_applied_seq = seq;
        self.view.distribution = SourceDistribution::from_hits(&snapshot.last_10_hits);
        self.view.history.push(MissRatePoint {
            timestamp_ms: completed_at_ms,
            value: snapshot.clamped_miss_rate(),
        });
        self.view.view_model = reducer::reduce(&self.view.distribution, &self.view.history);
        self.view.snapshot = Some(Arc::new(snapshot));
        self.view.snapshot_received_at = Some(Instant::now());
        self.view.poll_count += 1;
    }

    fn apply_search(
        &mut self,
        seq: u64,
        result: Result<crate::model::SearchResult, DashboardError>,
    ) {
        if seq != self.search_seq {
            debug!(seq, current = self.search_seq, "discarding superseded search");
            return;
        }
        self.view.search.loading = false;
        match result {
            Ok(found) => {
                if let Some((message, severity)) = search_toast(&found) {
                    self.push_toast(message, severity);
                }
                self.view.search.error = None;
                self.view.search.result = Some(found);
            }
            Err(e) => {
                warn!(query = %self.view.search.query, error = %e, "search failed");
                self.view.search.error = Some(format!("Search failed: {e}"));
                self.push_toast("Search failed", Severity::Error);
            }
        }
    }
}

impl std::fmt::Debug for Coordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Coordinator")
            .field("identity", &self.view.identity)
            .field("epoch", &self.epoch)
            .field("poller_epoch", &self.poller.as_ref().map(PollScheduler::epoch))
            .field("poller_identity", &self.poller.as_ref().map(PollScheduler::identity))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockBackend;
    use crate::model::{CacheEntry, Source};

    fn coordinator() -> (Coordinator, DashboardHandle) {
        Coordinator::new(DashboardConfig::default(), Arc::new(MockBackend::new()))
    }

    #[test]
    fn test_new_publishes_initial_view() {
        let (_c, handle) = coordinator();
        let view = handle.view();
        assert_eq!(view.identity.as_str(), "guest");
        assert!(view.snapshot.is_none());
        assert!((view.confidence.value - 0.6).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_stale_epoch_poll_is_discarded() {
        let (mut c, _handle) = coordinator();
        c.epoch = 2;
        c.apply_poll(1, 1, 0, Ok(Snapshot::default()));
        assert!(c.view.snapshot.is_none());
        assert_eq!(c.view.history.len(), 0);
    }

    #[tokio::test]
    async fn test_out_of_order_poll_is_discarded() {
        let (mut c, _handle) = coordinator();
        c.epoch = 1;
        let newer = Snapshot {
            miss_rate: 0.5,
            ..Snapshot::default()
        };
        c.apply_poll(1, 2, 0, Ok(newer));
        c.apply_poll(1, 1, 0, Ok(Snapshot::default()));
        assert_eq!(c.view.history.len(), 1);
        let snap = c.view.snapshot.as_ref().map(|s| s.miss_rate);
        assert_eq!(snap, Some(0.5));
    }

    #[tokio::test]
    async fn test_failed_poll_keeps_snapshot() {
        let (mut c, _handle) = coordinator();
        c.epoch = 1;
        c.apply_poll(1, 1, 0, Ok(Snapshot::default()));
        c.apply_poll(1, 2, 0, Err(DashboardError::Http("down".into())));
        assert!(c.view.snapshot.is_some());
        assert_eq!(c.view.poll_count, 1);
        // A later success still applies after the failed cycle.
        c.apply_poll(1, 3, 0, Ok(Snapshot::default()));
        assert_eq!(c.view.poll_count, 2);
    }

    #[tokio::test]
    async fn test_superseded_search_is_ignored() {
        let (mut c, _handle) = coordinator();
        c.search_seq = 2;
        c.view.search.loading = true;
        c.apply_search(1, Err(DashboardError::Http("late".into())));
        assert!(c.view.search.loading);
        assert!(c.view.search.error.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_queued_poll_from_previous_identity_is_discarded() {
        let (c, mut handle) = coordinator();
        let stale = Snapshot {
            cache: vec![CacheEntry {
                query: "guest query".into(),
                source: Source::Backend,
                expires_in: 200,
            }],
            miss_rate: 0.9,
            ..Snapshot::default()
        };
        // Epoch 1 is the guest scheduler `run` starts first.
        c.events_tx
            .send(Event::Polled {
                epoch: 1,
                seq: 1,
                completed_at_ms: 0,
                result: Ok(stale),
            })
            .await
            .unwrap();
        handle
            .dispatch(Action::SelectIdentity(Identity::new("alice")))
            .await
            .unwrap();
        let task = tokio::spawn(c.run());

        let view = loop {
            let view = handle.changed().await.unwrap();
            if view.poll_count >= 1 {
                break view;
            }
        };
        assert_eq!(view.identity.as_str(), "alice");
        assert_eq!(view.poll_count, 1);
        assert_eq!(view.history.len(), 1);
        let latest = view.history.latest().unwrap().value;
        assert!((latest - 0.9).abs() > 1e-9);
        let snapshot = view.snapshot.as_ref().unwrap();
        assert!(snapshot.cache.iter().all(|e| e.query != "guest query"));

        handle.dispatch(Action::Shutdown).await.unwrap();
        task.await.unwrap();
    }
}
