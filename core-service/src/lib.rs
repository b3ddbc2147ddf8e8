//! Core service façade.
//!
//! Wires the Google Drive connector, the frontier traverser and an export sink
//! into a single `export` call. Desktop builds enable the `desktop-shims`
//! feature (which depends on `bridge-desktop`) to get the reqwest HTTP client
//! and the CSV file sink.

pub mod error;
pub mod stats;

pub use error::{CoreError, Result};
pub use stats::ExportStats;

use std::path::PathBuf;
use std::sync::Arc;

use bridge_traits::storage::{ExportSink, StorageProvider};
use core_runtime::config::ExportConfig;
use core_traversal::{FolderId, FrontierTraverser};
use futures::StreamExt;
use provider_google_drive::GoogleDriveConnector;
use tracing::{info, instrument};

/// Primary façade exposed to the binary.
#[derive(Clone)]
pub struct ExportService {
    traverser: FrontierTraverser,
    output_dir: PathBuf,
}

impl ExportService {
    /// Build a service listing Google Drive with the settings in `config`.
    pub fn new(config: &ExportConfig) -> Result<Self> {
        config.validate()?;

        let provider: Arc<dyn StorageProvider> = Arc::new(GoogleDriveConnector::from_config(config));
        Ok(Self {
            traverser: FrontierTraverser::new(provider).with_concurrency(config.concurrency),
            output_dir: config.output_dir.clone(),
        })
    }

    /// Build a service over any provider; output goes to the current directory.
    pub fn with_provider(provider: Arc<dyn StorageProvider>) -> Self {
        Self {
            traverser: FrontierTraverser::new(provider),
            output_dir: PathBuf::from("."),
        }
    }

    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.traverser = self.traverser.with_concurrency(concurrency);
        self
    }

    pub fn with_output_dir(mut self, output_dir: impl Into<PathBuf>) -> Self {
        self.output_dir = output_dir.into();
        self
    }

    pub fn output_dir(&self) -> &std::path::Path {
        &self.output_dir
    }

    /// Export every file below `root` into `<output_dir>/<root>.csv`.
    ///
    /// The root is validated before the output file is created.
    #[cfg(feature = "desktop-shims")]
    pub async fn export(&self, root: &str) -> Result<ExportStats> {
        let root_id = FolderId::parse(root)?;
        let sink = bridge_desktop::CsvFileSink::create(&self.output_dir, root_id.as_str()).await?;
        info!(path = %sink.path().display(), "Writing export file");

        self.run(root_id, &sink).await
    }

    /// Export every file below `root` into `sink`.
    pub async fn export_to(&self, root: &str, sink: &dyn ExportSink) -> Result<ExportStats> {
        let root_id = FolderId::parse(root)?;
        self.run(root_id, sink).await
    }

    #[instrument(skip(self, sink), fields(root = %root))]
    async fn run(&self, root: FolderId, sink: &dyn ExportSink) -> Result<ExportStats> {
        let mut stats = ExportStats::start(root.as_str());
        let mut traversal = self.traverser.traverse(root);

        while let Some(batch) = traversal.next().await {
            sink.write_batch(&batch).await?;
            stats.record_batch(batch.len());
            info!(total = stats.files_written, "exported {} files", stats.files_written);
        }

        sink.finish().await?;
        stats.finish(traversal.stats());

        info!(
            files = stats.files_written,
            batches = stats.batches_written,
            rounds = stats.traversal.rounds,
            failed_pages = stats.traversal.pages_failed,
            elapsed_ms = stats.duration().map(|d| d.num_milliseconds()).unwrap_or_default(),
            "Export complete"
        );

        Ok(stats)
    }
}
