//! Remote Listing and Export Sink Abstractions
//!
//! Provides the provider-agnostic contract for listing the children of a remote
//! folder one page at a time, and the sink that receives exported file IDs.

use async_trait::async_trait;

use crate::error::Result;

/// A child record returned by a remote listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteEntry {
    /// Provider-specific opaque identifier
    pub id: String,
    /// Display name, when the provider returns one
    pub name: Option<String>,
    /// MIME-type-like kind discriminator
    pub mime_type: String,
}

impl RemoteEntry {
    pub fn new(id: impl Into<String>, mime_type: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: None,
            mime_type: mime_type.into(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

/// One page of a folder listing, already split by kind.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChildPage {
    /// Leaf children (anything that is not a folder)
    pub files: Vec<RemoteEntry>,
    /// Children that may have children of their own
    pub folders: Vec<RemoteEntry>,
    /// Continuation token; `None` means the folder is fully listed
    pub next_cursor: Option<String>,
}

impl ChildPage {
    /// An empty, exhausted page.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Split `entries` into files and folders using `is_folder`.
    pub fn classify<F>(entries: Vec<RemoteEntry>, next_cursor: Option<String>, is_folder: F) -> Self
    where
        F: Fn(&RemoteEntry) -> bool,
    {
        let (folders, files) = entries.into_iter().partition(|entry| is_folder(entry));
        Self {
            files,
            folders,
            next_cursor,
        }
    }

    /// IDs of the leaf children on this page, in listing order.
    pub fn file_ids(&self) -> Vec<String> {
        self.files.iter().map(|f| f.id.clone()).collect()
    }

    /// True when no further pages exist for the folder.
    pub fn is_last(&self) -> bool {
        self.next_cursor.is_none()
    }
}

/// Cloud storage provider trait
///
/// Lists the direct children of a folder, one page per call.
///
/// # Example
///
/// ```ignore
/// use bridge_traits::storage::StorageProvider;
///
/// async fn first_page(provider: &dyn StorageProvider, root: &str) -> Result<usize> {
///     let page = provider.list_children(root, None).await?;
///     Ok(page.files.len())
/// }
/// ```
#[async_trait]
pub trait StorageProvider: Send + Sync {
    /// List one page of children of `folder_id`, continuing from `cursor` if given.
    ///
    /// # Errors
    ///
    /// Returns error when the request fails or the service answers with a
    /// non-success status.
    async fn list_children(&self, folder_id: &str, cursor: Option<String>) -> Result<ChildPage>;
}

/// Destination for exported file IDs
///
/// Each call receives one non-empty batch. Implementations must make the batch
/// durable (flushed) before returning.
#[async_trait]
pub trait ExportSink: Send + Sync {
    /// Append one batch of file IDs
    async fn write_batch(&self, ids: &[String]) -> Result<()>;

    /// Flush and release any underlying resources
    async fn finish(&self) -> Result<()> {
        Ok(())
    }
}
