//! drive-export CLI
//!
//! Recursively exports the file IDs of a Google Drive folder.

use anyhow::Context;
use clap::Parser;
use core_runtime::logging::init_logging;
use core_service::ExportService;
use tracing::info;

mod args;

use args::Cli;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr
    init_logging(cli.logging_config()).context("failed to initialize logging")?;

    run(cli).await
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    // A missing or blank root is reported and ends the run normally
    let Some(root) = cli.root() else {
        info!("input drive is not valid");
        return Ok(());
    };

    let config = cli.export_config().context("invalid configuration")?;
    let service = ExportService::new(&config)?;

    service
        .export(root.as_str())
        .await
        .with_context(|| format!("export of {} failed", root))?;

    Ok(())
}
