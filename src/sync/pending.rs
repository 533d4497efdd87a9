//! Per-query refresh spinners.
//!
//! Each refresh takes a token. Clearing only succeeds with the token that is
//! still current for that query, so an older refresh finishing late cannot
//! hide the spinner of a newer one.

use std::collections::HashMap;

/// Token identifying one refresh invocation.
pub type RefreshToken = u64;

/// Mapping from query to the token of its latest in-flight refresh.
#[derive(Debug, Clone, Default)]
pub struct PendingRefresh {
    entries: HashMap<String, RefreshToken>,
    next_token: RefreshToken,
}

impl PendingRefresh {
    /// Creates an empty mapping.
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks `query` as pending and returns the token that can clear it.
    pub fn begin(&mut self, query: &str) -> RefreshToken {
        self.next_token += 1;
        self.entries.insert(query.to_string(), self.next_token);
        self.next_token
    }

    /// Clears `query` if `token` is still its current token.
    pub fn finish(&mut self, query: &str, token: RefreshToken) -> bool {
        match self.entries.get(query) {
            Some(current) if *current == token => {
                self.entries.remove(query);
                true
            }
            _ => false,
        }
    }

    /// Whether a spinner is showing for `query`.
    pub fn is_pending(&self, query: &str) -> bool {
        self.entries.contains_key(query)
    }

    /// Number of queries with a visible spinner.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no spinner is visible.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
