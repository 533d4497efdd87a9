//! # Module: TUI Dashboard
//!
//! ## Responsibility
//! Terminal presentation of the live dashboard using Ratatui: maps keys to
//! [`crate::sync::Action`]s and draws the latest published
//! [`crate::sync::DashboardView`].
//!
//! ## Guarantees
//! - No panics in any rendering or input path
//! - Clean terminal restore on exit, including on panic (see the binary)
//! - Read-only with respect to dashboard state
//!
//! ## NOT Responsible For
//! - Polling, timers or requests (owned by the coordinator)

pub mod app;
pub mod events;
pub mod ui;
pub mod widgets;
