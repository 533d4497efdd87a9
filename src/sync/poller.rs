//! # Module: Poll Scheduler
//!
//! ## Responsibility
//! Fetch the dashboard snapshot for one identity immediately on start and
//! then at a fixed period, reporting each result to the coordinator.
//!
//! ## Guarantees
//! - Fetches run beside the cadence: a slow fetch never delays the next tick
//! - Every report carries this instance's `epoch` and a per-cycle `seq`
//! - Stopping (or dropping) the scheduler aborts the loop and every fetch
//!   still in flight
//!
//! ## NOT Responsible For
//! - Deciding whether a report is stale (the coordinator compares epochs)
//! - Surfacing failures (poll failures are silent by policy)

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::{JoinHandle, JoinSet};
use tokio::time::MissedTickBehavior;
use tracing::{debug, info};

use crate::client::DashboardApi;
use crate::Identity;

use super::event::Event;

/// One running poll loop, scoped to an identity.
#[derive(Debug)]
pub(crate) struct PollScheduler {
    epoch: u64,
    identity: Identity,
    task: JoinHandle<()>,
}

impl PollScheduler {
    /// Spawns the poll loop.
    pub(crate) fn start(
        epoch: u64,
        identity: Identity,
        api: Arc<dyn DashboardApi>,
        period: Duration,
        tx: mpsc::Sender<Event>,
    ) -> Self {
        info!(
            epoch,
            identity = %identity,
            period_ms = period.as_millis() as u64,
            "poll scheduler started"
        );
        let task = tokio::spawn(poll_loop(epoch, identity.clone(), api, period, tx));
        Self {
            epoch,
            identity,
            task,
        }
    }

    /// Epoch this instance reports under.
    pub(crate) fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Identity this instance polls for.
    pub(crate) fn identity(&self) -> &Identity {
        &self.identity
    }

    /// Aborts the loop and its in-flight fetches.
    pub(crate) fn stop(&self) {
        if !self.task.is_finished() {
            debug!(epoch = self.epoch, identity = %self.identity, "poll scheduler stopped");
        }
        self.task.abort();
    }
}

impl Drop for PollScheduler {
    fn drop(&mut self) {
        self.stop();
    }
}

async fn poll_loop(
    epoch: u64,
    identity: Identity,
    api: Arc<dyn DashboardApi>,
    period: Duration,
    tx: mpsc::Sender<Event>,
) {
    let mut interval = tokio::time::interval(period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // Dropped together with this task, which aborts every fetch it holds.
    let mut in_flight = JoinSet::new();
    let mut seq: u64 = 0;

    loop {
        tokio::select! {
            _ = interval.tick() => {
                if tx.is_closed() {
                    break;
                }
                seq += 1;
                let api = Arc::clone(&api);
                let identity = identity.clone();
                let tx = tx.clone();
                in_flight.spawn(async move {
                    let result = api.fetch_dashboard(&identity).await;
                    let completed_at_ms = chrono::Utc::now().timestamp_millis();
                    let _ = tx
                        .send(Event::Polled {
                            epoch,
                            seq,
                            completed_at_ms,
                            result,
                        })
                        .await;
                });
            }
            Some(_) = in_flight.join_next(), if !in_flight.is_empty() => {}
        }
    }
}
