//! # Module: Toast Queue
//!
//! ## Responsibility
//! Ephemeral notifications shown on top of the dashboard. The queue itself is
//! plain data; the coordinator arms one timer per toast that reports back
//! when the toast's lifetime is over.
//!
//! ## Guarantees
//! - Toasts keep insertion order and are never deduplicated
//! - Every id is fresh (UUID v4)
//! - Removing an id that is no longer present is a no-op

use std::fmt;

use tokio::time::Instant;
use uuid::Uuid;

/// Opaque unique token of one toast.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ToastId(Uuid);

impl ToastId {
    fn fresh() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for ToastId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Toast severity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Severity {
    /// Neutral information.
    #[default]
    Info,
    /// Something went well.
    Success,
    /// Worth the user's attention.
    Warn,
    /// A command failed.
    Error,
}

impl Severity {
    /// Returns the display label for this severity.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Info => "INFO",
            Self::Success => "OK",
            Self::Warn => "WARN",
            Self::Error => "ERROR",
        }
    }
}

/// One notification.
#[derive(Debug, Clone, PartialEq)]
pub struct Toast {
    /// Unique token used to remove the toast.
    pub id: ToastId,
    /// Text shown to the user.
    pub message: String,
    /// Severity, drives the colour.
    pub severity: Severity,
    /// Creation instant.
    pub created_at: Instant,
}

/// Ordered list of live toasts.
#[derive(Debug, Clone, Default)]
pub struct ToastQueue {
    toasts: Vec<Toast>,
}

impl ToastQueue {
    /// Creates an empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a toast and returns it so the caller can arm its expiry.
    pub fn push(&mut self, message: impl Into<String>, severity: Severity) -> Toast {
        let toast = Toast {
            id: ToastId::fresh(),
            message: message.into(),
            severity,
            created_at: Instant::now(),
        };
        self.toasts.push(toast.clone());
        toast
    }

    /// Removes the toast with `id`. Returns whether something was removed.
    pub fn remove(&mut self, id: ToastId) -> bool {
        let before = self.toasts.len();
        self.toasts.retain(|t| t.id != id);
        self.toasts.len() != before
    }

    /// Live toasts, oldest first.
    pub fn toasts(&self) -> &[Toast] {
        &self.toasts
    }

    /// Number of live toasts.
    pub fn len(&self) -> usize {
        self.toasts.len()
    }

    /// Whether no toast is live.
    pub fn is_empty(&self) -> bool {
        self.toasts.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_keeps_insertion_order() {
        let mut q = ToastQueue::new();
        q.push("first", Severity::Info);
        q.push("second", Severity::Error);
        let messages: Vec<&str> = q.toasts().iter().map(|t| t.message.as_str()).collect();
        assert_eq!(messages, vec!["first", "second"]);
    }

    #[test]
    fn test_push_does_not_deduplicate() {
        let mut q = ToastQueue::new();
        let a = q.push("same", Severity::Info);
        let b = q.push("same", Severity::Info);
        assert_eq!(q.len(), 2);
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_remove_is_idempotent() {
        let mut q = ToastQueue::new();
        let t = q.push("bye", Severity::Success);
        assert!(q.remove(t.id));
        assert!(!q.remove(t.id));
        assert!(q.is_empty());
    }

    #[test]
    fn test_remove_only_targets_id() {
        let mut q = ToastQueue::new();
        let a = q.push("a", Severity::Info);
        q.push("b", Severity::Warn);
        q.remove(a.id);
        assert_eq!(q.toasts()[0].message, "b");
    }

    #[test]
    fn test_default_severity_is_info() {
        assert_eq!(Severity::default(), Severity::Info);
    }
}
