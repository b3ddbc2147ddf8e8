//! CLI argument definitions for drive-export.

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use core_runtime::config::{
    ExportConfig, DEFAULT_API_BASE, DEFAULT_CONCURRENCY, DEFAULT_PAGE_SIZE,
};
use core_runtime::logging::{LogFormat, LogLevel, LoggingConfig};
use core_traversal::FolderId;

/// Export the IDs of every file inside a Google Drive folder.
///
/// Files are listed recursively and written, one ID per line, to
/// `<OUTPUT_DIR>/<DRIVE_ID>.csv` as they are discovered.
///
/// ## Examples
///
///   API_KEY=... drive-export 0AbCdEfGhIjK
///
///   drive-export 0AbCdEfGhIjK --output-dir exports --concurrency 20
#[derive(Parser, Debug)]
#[command(name = "drive-export")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// ID of the folder to export
    #[arg(value_name = "DRIVE_ID")]
    pub drive_id: Option<String>,

    // === Drive API ===
    /// API key sent with every listing request
    #[arg(long, env = "API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Listing endpoint base URL
    #[arg(long, env = "DRIVE_API_BASE", default_value = DEFAULT_API_BASE)]
    pub api_base: String,

    /// Children requested per page (1-1000)
    #[arg(long, default_value_t = DEFAULT_PAGE_SIZE)]
    pub page_size: u32,

    /// Listing calls dispatched per round (1-100)
    #[arg(long, default_value_t = DEFAULT_CONCURRENCY)]
    pub concurrency: usize,

    /// Abort a listing request after this many seconds (default: wait indefinitely)
    #[arg(long)]
    pub request_timeout_secs: Option<u64>,

    // === Output ===
    /// Directory receiving the export file
    #[arg(short, long, default_value = ".")]
    pub output_dir: PathBuf,

    // === Logging ===
    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    pub log_level: LogLevel,

    /// Log format (compact, pretty, json)
    #[arg(long, default_value = "compact")]
    pub log_format: LogFormat,
}

impl Cli {
    /// The root folder, or `None` when missing or blank
    pub fn root(&self) -> Option<FolderId> {
        self.drive_id
            .as_deref()
            .and_then(|id| FolderId::parse(id).ok())
    }

    pub fn logging_config(&self) -> LoggingConfig {
        LoggingConfig::default()
            .with_level(self.log_level)
            .with_format(self.log_format)
    }

    pub fn export_config(&self) -> core_runtime::Result<ExportConfig> {
        let mut builder = ExportConfig::builder()
            .api_base(self.api_base.as_str())
            .page_size(self.page_size)
            .concurrency(self.concurrency)
            .output_dir(&self.output_dir);

        if let Some(key) = &self.api_key {
            builder = builder.api_key(key.as_str());
        }
        if let Some(secs) = self.request_timeout_secs {
            builder = builder.request_timeout(Duration::from_secs(secs));
        }

        builder.build()
    }
}
