//! # Module: TUI App State
//!
//! ## Responsibility
//! Terminal-local state layered over the published [`DashboardView`]: input
//! mode, the search buffer being typed, the selected cache row, the help
//! overlay, and the spinner frame. Dashboard data itself is never mutated
//! here; it is replaced wholesale by [`App::set_view`].
//!
//! ## Guarantees
//! - `selected` always indexes a visible cache row (or is 0 when empty)
//! - No method panics on an empty or missing snapshot

use std::sync::Arc;

use crate::sync::DashboardView;
use crate::Identity;

/// Minimum terminal width for the dashboard to render.
pub const MIN_COLS: u16 = 100;

/// Minimum terminal height for the dashboard to render.
pub const MIN_ROWS: u16 = 32;

/// Longest search query accepted from the keyboard.
pub const SEARCH_INPUT_CAP: usize = 200;

/// Spinner frames for rows with a refresh in flight.
pub const SPINNER_FRAMES: [&str; 4] = ["|", "/", "-", "\\"];

/// What keystrokes currently mean.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum InputMode {
    /// Single-key commands.
    #[default]
    Normal,
    /// Typing into the search bar.
    Search,
}

/// Primary application state for the TUI dashboard.
#[derive(Debug)]
pub struct App {
    /// Whether the application should exit.
    pub should_quit: bool,
    /// Whether the help overlay is visible.
    pub show_help: bool,
    /// Current input mode.
    pub mode: InputMode,
    /// Text typed into the search bar, not yet submitted.
    pub search_input: String,
    /// Index of the highlighted cache row.
    pub selected: usize,
    /// Monotonic render tick counter, drives the spinner.
    pub frame_count: u64,
    /// Latest view published by the coordinator.
    pub view: Arc<DashboardView>,
}

impl App {
    /// Creates the app around an initial view.
    pub fn new(view: Arc<DashboardView>) -> Self {
        Self {
            should_quit: false,
            show_help: false,
            mode: InputMode::Normal,
            search_input: String::new(),
            selected: 0,
            frame_count: 0,
            view,
        }
    }

    /// Replaces the displayed view and keeps the selection in range.
    pub fn set_view(&mut self, view: Arc<DashboardView>) {
        self.view = view;
        self.clamp_selection();
    }

    /// Advances the render tick.
    pub fn on_frame(&mut self) {
        self.frame_count = self.frame_count.wrapping_add(1);
    }

    /// Spinner glyph for the current frame.
    pub fn spinner(&self) -> &'static str {
        SPINNER_FRAMES[(self.frame_count % SPINNER_FRAMES.len() as u64) as usize]
    }

    fn row_count(&self) -> usize {
        self.view.snapshot.as_ref().map_or(0, |s| s.cache.len())
    }

    fn clamp_selection(&mut self) {
        let rows = self.row_count();
        if rows == 0 {
            self.selected = 0;
        } else if self.selected >= rows {
            self.selected = rows - 1;
        }
    }

    /// Moves the selection up one row.
    pub fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    /// Moves the selection down one row.
    pub fn select_next(&mut self) {
        let rows = self.row_count();
        if rows > 0 && self.selected + 1 < rows {
            self.selected += 1;
        }
    }

    /// Query of the highlighted cache row.
    pub fn selected_query(&self) -> Option<String> {
        self.view
            .snapshot
            .as_ref()
            .and_then(|s| s.cache.get(self.selected))
            .map(|entry| entry.query.clone())
    }

    /// The identity after the active one, wrapping around.
    pub fn next_identity(&self) -> Option<Identity> {
        let identities = &self.view.identities;
        if identities.len() < 2 {
            return None;
        }
        let next = identities
            .iter()
            .position(|id| *id == self.view.identity)
            .map_or(0, |i| (i + 1) % identities.len());
        identities.get(next).cloned()
    }

    /// Appends a character to the search buffer.
    pub fn push_search_char(&mut self, c: char) {
        if self.search_input.chars().count() < SEARCH_INPUT_CAP {
            self.search_input.push(c);
        }
    }

    /// Removes the last character of the search buffer.
    pub fn pop_search_char(&mut self) {
        self.search_input.pop();
    }

    /// Takes the search buffer and returns to normal mode.
    pub fn take_search(&mut self) -> String {
        self.mode = InputMode::Normal;
        std::mem::take(&mut self.search_input)
    }
}
