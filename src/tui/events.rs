//! # Module: TUI Event Handling
//!
//! ## Responsibility
//! Polls crossterm events and translates keyboard input into app state
//! mutations and, where the key is a dashboard command, an [`Action`] for the
//! coordinator.
//!
//! ## Guarantees
//! - Non-blocking event polling with configurable timeout
//! - No panics on any key combination
//! - Ctrl+C always triggers quit, in every input mode

use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use super::app::{App, InputMode};
use crate::client::ExportFormat;
use crate::sync::Action;

/// Result of polling for a terminal event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    /// Quit (q, Esc or Ctrl+C).
    Quit,
    /// Toggle the help overlay.
    Help,
    /// Focus the search bar.
    StartSearch,
    /// A character typed into the search bar.
    SearchChar(char),
    /// Backspace in the search bar.
    SearchBackspace,
    /// Enter in the search bar.
    SubmitSearch,
    /// Esc in the search bar.
    CancelSearch,
    /// Switch to the next identity.
    CycleIdentity,
    /// Raise the confidence threshold one step.
    ConfidenceUp,
    /// Lower the confidence threshold one step.
    ConfidenceDown,
    /// Refresh the selected cache entry.
    RefreshSelected,
    /// Move the selection up.
    SelectUp,
    /// Move the selection down.
    SelectDown,
    /// Export as JSON.
    ExportJson,
    /// Export as CSV.
    ExportCsv,
    /// A terminal resize occurred.
    Resize(u16, u16),
    /// No actionable event within the poll window.
    None,
}

/// Polls for a single input event with the given timeout.
///
/// Returns `InputEvent::None` on any crossterm polling error (never panics).
pub fn poll_event(timeout: Duration, mode: InputMode) -> InputEvent {
    let available = match event::poll(timeout) {
        Ok(v) => v,
        Err(_) => return InputEvent::None,
    };
    if !available {
        return InputEvent::None;
    }

    match event::read() {
        Ok(Event::Key(key)) if key.kind != KeyEventKind::Release => translate_key(key, mode),
        Ok(Event::Resize(w, h)) => InputEvent::Resize(w, h),
        _ => InputEvent::None,
    }
}

/// Applies an input event to the app state.
///
/// Returns the [`Action`] to dispatch, if the event is a dashboard command.
pub fn apply_event(app: &mut App, event: InputEvent) -> Option<Action> {
    // Any key closes the help overlay.
    if app.show_help && !matches!(event, InputEvent::None | InputEvent::Resize(_, _)) {
        app.show_help = false;
        return match event {
            InputEvent::Quit => {
                app.should_quit = true;
                Some(Action::Shutdown)
            }
            _ => None,
        };
    }

    match event {
        InputEvent::Quit => {
            app.should_quit = true;
            Some(Action::Shutdown)
        }
        InputEvent::Help => {
            app.show_help = true;
            None
        }
        InputEvent::StartSearch => {
            app.mode = InputMode::Search;
            None
        }
        InputEvent::SearchChar(c) => {
            app.push_search_char(c);
            None
        }
        InputEvent::SearchBackspace => {
            app.pop_search_char();
            None
        }
        InputEvent::SubmitSearch => {
            let query = app.take_search();
            if query.trim().is_empty() {
                None
            } else {
                Some(Action::Search(query))
            }
        }
        InputEvent::CancelSearch => {
            app.take_search();
            None
        }
        InputEvent::CycleIdentity => app.next_identity().map(|id| {
            app.selected = 0;
            Action::SelectIdentity(id)
        }),
        InputEvent::ConfidenceUp => Some(Action::NudgeConfidence(1)),
        InputEvent::ConfidenceDown => Some(Action::NudgeConfidence(-1)),
        InputEvent::RefreshSelected => app.selected_query().map(Action::RefreshEntry),
        InputEvent::SelectUp => {
            app.select_prev();
            None
        }
        InputEvent::SelectDown => {
            app.select_next();
            None
        }
        InputEvent::ExportJson => Some(Action::Export(ExportFormat::Json)),
        InputEvent::ExportCsv => Some(Action::Export(ExportFormat::Csv)),
        InputEvent::Resize(_, _) | InputEvent::None => None,
    }
}

/// Translates a crossterm key event to an `InputEvent`.
pub fn translate_key(key: KeyEvent, mode: InputMode) -> InputEvent {
    // Ctrl+C always quits
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return InputEvent::Quit;
    }

    match mode {
        InputMode::Search => match key.code {
            KeyCode::Enter => InputEvent::SubmitSearch,
            KeyCode::Esc => InputEvent::CancelSearch,
            KeyCode::Backspace => InputEvent::SearchBackspace,
            KeyCode::Char(c) => InputEvent::SearchChar(c),
            _ => InputEvent::None,
        },
        InputMode::Normal => match key.code {
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => InputEvent::Quit,
            KeyCode::Char('h') | KeyCode::Char('H') | KeyCode::Char('?') => InputEvent::Help,
            KeyCode::Char('/') => InputEvent::StartSearch,
            KeyCode::Tab => InputEvent::CycleIdentity,
            KeyCode::Char('+') | KeyCode::Char('=') => InputEvent::ConfidenceUp,
            KeyCode::Char('-') | KeyCode::Char('_') => InputEvent::ConfidenceDown,
            KeyCode::Char('r') | KeyCode::Char('R') => InputEvent::RefreshSelected,
            KeyCode::Char('e') => InputEvent::ExportJson,
            KeyCode::Char('E') => InputEvent::ExportCsv,
            KeyCode::Up | KeyCode::Char('k') => InputEvent::SelectUp,
            KeyCode::Down | KeyCode::Char('j') => InputEvent::SelectDown,
            _ => InputEvent::None,
        },
    }
}
