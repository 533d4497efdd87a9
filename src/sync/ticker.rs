//! # Module: Clock Ticker
//!
//! ## Responsibility
//! Advance the coordinator's clock reference at a fixed period so countdowns
//! and colour bands stay live between polls.
//!
//! ## Guarantees
//! - Independent of the poll cadence and of the active identity
//! - Never touches snapshot data; it only emits [`Event::Tick`]

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::debug;

use super::event::Event;

/// The running clock task.
#[derive(Debug)]
pub(crate) struct ClockTicker {
    task: JoinHandle<()>,
}

impl ClockTicker {
    /// Spawns the ticker.
    pub(crate) fn start(period: Duration, tx: mpsc::Sender<Event>) -> Self {
        let task = tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                interval.tick().await;
                if tx.send(Event::Tick).await.is_err() {
                    debug!("clock ticker exiting, coordinator gone");
                    break;
                }
            }
        });
        Self { task }
    }

    /// Aborts the ticker.
    pub(crate) fn stop(&self) {
        self.task.abort();
    }
}

impl Drop for ClockTicker {
    fn drop(&mut self) {
        self.stop();
    }
}
