//! # Module: Live-State Synchronization Engine
//!
//! ## Responsibility
//! Reconciles independently-timed sources (dashboard polling, the wall-clock
//! tick, user commands, toast timers) into one consistent dashboard view.
//!
//! ## Guarantees
//! - Single mutator: only the [`Coordinator`] touches state, one event at a time
//! - Atomic publication: a snapshot and its derived series appear together
//! - Stale-proof: poll results carry an `(epoch, seq)` pair and are discarded
//!   once superseded
//! - Every transient flag (search loading, refresh spinner, confidence busy)
//!   has a guaranteed terminal event that clears it
//!
//! ## NOT Responsible For
//! - HTTP details (that belongs to `client`)
//! - Drawing (that belongs to `tui`)

pub mod commands;
pub mod coordinator;
pub mod event;
pub mod history;
pub mod pending;
pub mod poller;
pub mod reducer;
pub mod state;
pub mod ticker;
pub mod toast;

pub use coordinator::{Coordinator, DashboardHandle};
pub use event::Action;
pub use history::{MissRateHistory, MissRatePoint, SourceDistribution, MISS_RATE_HISTORY_CAP};
pub use pending::PendingRefresh;
pub use reducer::{reduce, ExpiryBand, LinePoint, ViewModel};
pub use state::{CacheRow, ConfidenceState, DashboardView, SearchState};
pub use toast::{Severity, Toast, ToastId, ToastQueue};
