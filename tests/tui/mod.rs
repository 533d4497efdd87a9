//! Integration tests for the terminal dashboard.
//!
//! These tests verify cross-module interactions: key input driving a live
//! coordinator, and full-frame rendering of populated and empty views.

#[cfg(feature = "tui")]
mod app_state;
#[cfg(feature = "tui")]
mod widget_tests;
