//! # Undo/Redo History
//!
//! Linear version stack over full snapshots of the root sequence.
//!
//! ## Design
//!
//! - Entries `[S0, S1, ..., Sn]` plus a cursor `k`; `S_k` is the current tree
//! - Commit truncates everything after `S_k`, appends, and advances the cursor
//! - Undo/redo only move the cursor; snapshots are never mutated in place
//! - Documents are small, so whole snapshots are stored instead of diffs
//!
//! ## Example
//!
//! ```rust,ignore
//! let mut history = History::new(vec![]);
//! history.commit(next_tree, Some("Add heading".into()));
//!
//! history.undo();   // back to the empty tree
//! history.redo();   // forward again
//! ```

use crate::node::Node;

/// Default number of undo levels kept
pub const DEFAULT_MAX_LEVELS: usize = 100;

/// One committed version of the root sequence
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryEntry {
    /// Snapshot of the root sequence
    pub nodes: Vec<Node>,

    /// Optional description of the change that produced this entry
    pub label: Option<String>,
}

/// Snapshot history for one document
#[derive(Debug, Clone)]
pub struct History {
    entries: Vec<HistoryEntry>,

    /// Index of the current entry
    cursor: usize,

    /// Maximum number of undo levels (0 = unlimited)
    max_levels: usize,
}

impl History {
    /// Create a history whose first entry is `initial`
    pub fn new(initial: Vec<Node>) -> Self {
        Self::with_max_levels(initial, DEFAULT_MAX_LEVELS)
    }

    pub fn with_max_levels(initial: Vec<Node>, max_levels: usize) -> Self {
        Self {
            entries: vec![HistoryEntry {
                nodes: initial,
                label: None,
            }],
            cursor: 0,
            max_levels,
        }
    }

    /// The current tree
    pub fn current(&self) -> &[Node] {
        &self.entries[self.cursor].nodes
    }

    /// Record a new version; any redo tail is discarded
    pub fn commit(&mut self, nodes: Vec<Node>, label: Option<String>) {
        self.entries.truncate(self.cursor + 1);
        self.entries.push(HistoryEntry { nodes, label });
        self.cursor += 1;

        // Trim if exceeded max levels
        if self.max_levels > 0 && self.entries.len() > self.max_levels + 1 {
            self.entries.remove(0);
            self.cursor -= 1;
        }
    }

    /// Step back one version; `None` when already at the oldest entry
    pub fn undo(&mut self) -> Option<&[Node]> {
        if self.cursor == 0 {
            return None;
        }
        self.cursor -= 1;
        Some(self.current())
    }

    /// Step forward one version; `None` when there is nothing to redo
    pub fn redo(&mut self) -> Option<&[Node]> {
        if self.cursor + 1 >= self.entries.len() {
            return None;
        }
        self.cursor += 1;
        Some(self.current())
    }

    /// Drop all history and start over from `nodes`
    pub fn reset(&mut self, nodes: Vec<Node>) {
        self.entries = vec![HistoryEntry { nodes, label: None }];
        self.cursor = 0;
    }

    pub fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    pub fn can_redo(&self) -> bool {
        self.cursor + 1 < self.entries.len()
    }

    pub fn undo_levels(&self) -> usize {
        self.cursor
    }

    pub fn redo_levels(&self) -> usize {
        self.entries.len() - self.cursor - 1
    }

    pub fn max_levels(&self) -> usize {
        self.max_levels
    }

    /// Get description of the next undo operation
    pub fn undo_description(&self) -> Option<&str> {
        if !self.can_undo() {
            return None;
        }
        self.entries[self.cursor].label.as_deref()
    }

    /// Get description of the next redo operation
    pub fn redo_description(&self) -> Option<&str> {
        self.entries
            .get(self.cursor + 1)
            .and_then(|entry| entry.label.as_deref())
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }
}

impl Default for History {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}
