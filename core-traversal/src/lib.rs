//! # Folder Tree Traversal
//!
//! Walks a remote folder tree whose children are discovered lazily, one page
//! at a time, with a bounded number of listing calls in flight.
//!
//! ## Components
//!
//! - **Frontier** (`frontier`): queue of folders still being drained, each with its cursor
//! - **Listing Client** (`listing`): one page per call, failures collapsed to an exhausted page
//! - **Frontier Traverser** (`traverser`): round-based driver yielding batches of file IDs

pub mod error;
pub mod frontier;
pub mod listing;
pub mod traverser;

pub use error::{Result, TraversalError};
pub use frontier::{EntryUpdate, FolderId, Frontier, FrontierEntry};
pub use listing::{ListingClient, PageOutcome};
pub use traverser::{FrontierTraverser, Traversal, TraversalStats, DEFAULT_CONCURRENCY};
