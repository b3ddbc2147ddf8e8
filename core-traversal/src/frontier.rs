//! # Frontier
//!
//! Work queue of folders that still have pages to list.
//!
//! Each entry pairs a folder with the cursor of its next page. A round takes a
//! prefix of the queue as its dispatch set; once every call of the round has
//! completed, the results are applied one at a time in completion order:
//!
//! - a page with a cursor updates its entry in place,
//! - a page without a cursor removes its entry,
//! - every folder found on the page is appended with no cursor.
//!
//! Folders are never deduplicated. A folder reachable from two parents is
//! appended (and listed) twice.

use std::fmt;

use crate::error::{Result, TraversalError};

/// Identifier of a remote folder
///
/// Opaque to the traversal; the only requirement is that it is not blank.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FolderId(String);

impl FolderId {
    /// Parse a folder ID, rejecting empty and whitespace-only input
    pub fn parse(id: impl Into<String>) -> Result<Self> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(TraversalError::InvalidFolderId(id));
        }
        Ok(Self(id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FolderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for FolderId {
    type Err = TraversalError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

/// A folder still being drained
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrontierEntry {
    pub folder_id: FolderId,
    /// Continuation token for the next page; `None` requests the first page
    pub cursor: Option<String>,
}

impl FrontierEntry {
    /// Entry for a folder that has not been listed yet
    pub fn new(folder_id: FolderId) -> Self {
        Self {
            folder_id,
            cursor: None,
        }
    }
}

/// Queue mutation produced by one completed listing call
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntryUpdate {
    /// Cursor for the entry's next page; `None` drains the entry
    pub next_cursor: Option<String>,
    /// Folders discovered on the page, in listing order
    pub discovered: Vec<FolderId>,
}

impl EntryUpdate {
    /// Update that removes the entry and appends nothing
    pub fn exhausted() -> Self {
        Self::default()
    }
}

/// Position of an entry within a round's dispatch set
pub type Slot = usize;

/// Ordered collection of pending folders
#[derive(Debug, Default)]
pub struct Frontier {
    entries: Vec<FrontierEntry>,
}

impl Frontier {
    /// A frontier holding only the root folder
    pub fn seed(root: FolderId) -> Self {
        Self {
            entries: vec![FrontierEntry::new(root)],
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[FrontierEntry] {
        &self.entries
    }

    /// Snapshot of the first `min(limit, len)` entries, tagged with their slot
    pub fn dispatch_set(&self, limit: usize) -> Vec<(Slot, FrontierEntry)> {
        self.entries
            .iter()
            .take(limit)
            .cloned()
            .enumerate()
            .collect()
    }

    /// Apply the updates of a finished round, in the order given
    ///
    /// Slots refer to the dispatch set taken at the start of the round. Unknown
    /// slots are ignored.
    pub fn apply_round(&mut self, updates: Vec<(Slot, EntryUpdate)>) {
        let mut drained = vec![false; self.entries.len()];

        for (slot, update) in updates {
            let Some(entry) = self.entries.get_mut(slot) else {
                continue;
            };

            match update.next_cursor {
                Some(cursor) => entry.cursor = Some(cursor),
                None => drained[slot] = true,
            }

            self.entries
                .extend(update.discovered.into_iter().map(FrontierEntry::new));
        }

        let mut index = 0;
        self.entries.retain(|_| {
            let keep = !drained.get(index).copied().unwrap_or(false);
            index += 1;
            keep
        });
    }
}
