//! Listing client used by the traversal.
//!
//! Wraps a [`StorageProvider`] so that every call produces a [`PageOutcome`].
//! Provider errors never reach the traversal: they become
//! [`PageOutcome::Failed`], which the frontier treats exactly like a final,
//! empty page.

use std::sync::Arc;

use bridge_traits::storage::{ChildPage, StorageProvider};
use tracing::{debug, warn};

use crate::frontier::{EntryUpdate, FolderId};

/// Result of listing one page of a folder
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageOutcome {
    /// The service answered with a page
    Listed(ChildPage),
    /// The request failed or the service answered with a non-success status
    Failed,
}

impl PageOutcome {
    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed)
    }

    /// Split into the file IDs to emit and the update to apply to the frontier
    ///
    /// `Failed` collapses to no files and [`EntryUpdate::exhausted`], the same
    /// update a last page with no children would produce. An empty cursor also
    /// ends the folder.
    pub fn split(self) -> (Vec<String>, EntryUpdate) {
        match self {
            Self::Listed(page) => {
                let files = page.files.into_iter().map(|f| f.id).collect();
                let discovered = page
                    .folders
                    .into_iter()
                    .filter_map(|folder| match FolderId::parse(folder.id) {
                        Ok(id) => Some(id),
                        Err(e) => {
                            warn!(error = %e, "Skipping folder with blank id");
                            None
                        }
                    })
                    .collect();
                let update = EntryUpdate {
                    next_cursor: page.next_cursor.filter(|cursor| !cursor.is_empty()),
                    discovered,
                };
                (files, update)
            }
            Self::Failed => (Vec::new(), EntryUpdate::exhausted()),
        }
    }
}

/// Cheap-to-clone handle issuing one listing request per call
#[derive(Clone)]
pub struct ListingClient {
    provider: Arc<dyn StorageProvider>,
}

impl ListingClient {
    pub fn new(provider: Arc<dyn StorageProvider>) -> Self {
        Self { provider }
    }

    /// List one page of `folder_id`'s children, starting at `cursor`
    pub async fn list_page(&self, folder_id: &FolderId, cursor: Option<String>) -> PageOutcome {
        match self.provider.list_children(folder_id.as_str(), cursor).await {
            Ok(page) => PageOutcome::Listed(page),
            Err(e) => {
                debug!(folder_id = %folder_id, error = %e, "Listing failed, treating page as exhausted");
                PageOutcome::Failed
            }
        }
    }
}
