//! # Frontier Traverser
//!
//! Enumerates every file below a root folder as a lazy stream of ID batches.
//!
//! ## Rounds
//!
//! Each round snapshots at most `concurrency` entries from the front of the
//! [`Frontier`] and lists one page for each of them concurrently. A batch is
//! yielded as soon as its call completes, so consumers see output before the
//! round is over. The frontier itself is only touched once every call of the
//! round has returned; the updates are then applied in completion order.
//!
//! Batch order follows completion order and differs between runs.
//!
//! ## Usage
//!
//! ```ignore
//! use core_traversal::{FolderId, FrontierTraverser};
//! use futures::StreamExt;
//!
//! let traverser = FrontierTraverser::new(provider).with_concurrency(10);
//! let mut traversal = traverser.traverse(FolderId::parse("0AbC")?);
//! while let Some(batch) = traversal.next().await {
//!     sink.write_batch(&batch).await?;
//! }
//! println!("{:?}", traversal.stats());
//! ```

use std::pin::Pin;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::task::{Context, Poll};

use async_stream::stream;
use bridge_traits::storage::StorageProvider;
use futures::stream::FuturesUnordered;
use futures::{Stream, StreamExt};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::frontier::{FolderId, Frontier};
use crate::listing::ListingClient;

/// Listing calls dispatched per round unless configured otherwise
pub const DEFAULT_CONCURRENCY: usize = 10;

/// Counters describing a traversal
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraversalStats {
    pub rounds: u64,
    /// Listing calls that returned a page
    pub pages_listed: u64,
    /// Listing calls collapsed to an exhausted page
    pub pages_failed: u64,
    pub folders_discovered: u64,
    pub files_emitted: u64,
    pub batches_emitted: u64,
}

impl TraversalStats {
    /// Total listing calls issued
    pub fn calls(&self) -> u64 {
        self.pages_listed + self.pages_failed
    }
}

#[derive(Debug, Default)]
struct StatsRecorder {
    rounds: AtomicU64,
    pages_listed: AtomicU64,
    pages_failed: AtomicU64,
    folders_discovered: AtomicU64,
    files_emitted: AtomicU64,
    batches_emitted: AtomicU64,
}

impl StatsRecorder {
    fn add(counter: &AtomicU64, n: usize) {
        counter.fetch_add(n as u64, Ordering::Relaxed);
    }

    fn snapshot(&self) -> TraversalStats {
        TraversalStats {
            rounds: self.rounds.load(Ordering::Relaxed),
            pages_listed: self.pages_listed.load(Ordering::Relaxed),
            pages_failed: self.pages_failed.load(Ordering::Relaxed),
            folders_discovered: self.folders_discovered.load(Ordering::Relaxed),
            files_emitted: self.files_emitted.load(Ordering::Relaxed),
            batches_emitted: self.batches_emitted.load(Ordering::Relaxed),
        }
    }
}

/// Drives round-based traversal of a folder tree
#[derive(Clone)]
pub struct FrontierTraverser {
    listing: ListingClient,
    concurrency: usize,
}

impl FrontierTraverser {
    pub fn new(provider: Arc<dyn StorageProvider>) -> Self {
        Self {
            listing: ListingClient::new(provider),
            concurrency: DEFAULT_CONCURRENCY,
        }
    }

    /// Bound the number of listing calls per round; values below 1 become 1
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    /// Start a traversal of `root` with a fresh frontier
    ///
    /// Nothing is requested until the returned stream is polled.
    pub fn traverse(&self, root: FolderId) -> Traversal {
        let recorder = Arc::new(StatsRecorder::default());
        let batches = drain(
            self.listing.clone(),
            root,
            self.concurrency,
            Arc::clone(&recorder),
        );

        Traversal {
            batches: Box::pin(batches),
            recorder,
        }
    }
}

/// Stream of file-ID batches produced by [`FrontierTraverser::traverse`]
///
/// Every yielded batch is non-empty. The stream ends once the frontier is
/// empty.
pub struct Traversal {
    batches: Pin<Box<dyn Stream<Item = Vec<String>> + Send>>,
    recorder: Arc<StatsRecorder>,
}

impl Traversal {
    /// Counters so far; final once the stream has ended
    pub fn stats(&self) -> TraversalStats {
        self.recorder.snapshot()
    }
}

impl Stream for Traversal {
    type Item = Vec<String>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.batches.as_mut().poll_next(cx)
    }
}

fn drain(
    listing: ListingClient,
    root: FolderId,
    concurrency: usize,
    stats: Arc<StatsRecorder>,
) -> impl Stream<Item = Vec<String>> + Send {
    stream! {
        info!(root = %root, concurrency, "Starting traversal");
        let mut frontier = Frontier::seed(root);

        while !frontier.is_empty() {
            let dispatch = frontier.dispatch_set(concurrency);
            let round = stats.rounds.fetch_add(1, Ordering::Relaxed) + 1;
            debug!(round, dispatched = dispatch.len(), pending = frontier.len(), "Dispatching round");

            let mut in_flight: FuturesUnordered<_> = dispatch
                .into_iter()
                .map(|(slot, entry)| {
                    let listing = listing.clone();
                    async move {
                        let outcome = listing.list_page(&entry.folder_id, entry.cursor).await;
                        (slot, outcome)
                    }
                })
                .collect();

            let mut updates = Vec::with_capacity(in_flight.len());
            while let Some((slot, outcome)) = in_flight.next().await {
                if outcome.is_failed() {
                    StatsRecorder::add(&stats.pages_failed, 1);
                } else {
                    StatsRecorder::add(&stats.pages_listed, 1);
                }

                let (files, update) = outcome.split();
                StatsRecorder::add(&stats.folders_discovered, update.discovered.len());
                updates.push((slot, update));

                if !files.is_empty() {
                    StatsRecorder::add(&stats.files_emitted, files.len());
                    StatsRecorder::add(&stats.batches_emitted, 1);
                    yield files;
                }
            }

            frontier.apply_round(updates);
        }

        let summary = stats.snapshot();
        info!(
            rounds = summary.rounds,
            calls = summary.calls(),
            failed = summary.pages_failed,
            files = summary.files_emitted,
            "Traversal finished"
        );
    }
}
