//! CSV export sink using Tokio file I/O

use async_trait::async_trait;
use bridge_traits::{
    error::{BridgeError, Result},
    storage::ExportSink,
};
use bytes::{BufMut, BytesMut};
use std::path::{Path, PathBuf};
use tokio::fs::{self, File, OpenOptions};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;
use tracing::debug;

/// File-backed export sink
///
/// Writes each batch as newline-separated IDs (with a trailing newline) to
/// `<output_dir>/<root_id>.csv`. The file is truncated on creation and flushed
/// after every batch. No header row is written.
pub struct CsvFileSink {
    path: PathBuf,
    file: Mutex<Option<File>>,
}

impl CsvFileSink {
    /// Create (or truncate) the export file for `root_id` inside `output_dir`
    ///
    /// Fails without touching the filesystem when `root_id` contains a path
    /// separator, so the file always lands directly inside `output_dir`.
    pub async fn create(output_dir: &Path, root_id: &str) -> Result<Self> {
        if root_id.contains(['/', '\\']) {
            return Err(BridgeError::OperationFailed(format!(
                "root id {:?} cannot be used as a file name",
                root_id
            )));
        }

        if !output_dir.as_os_str().is_empty() {
            fs::create_dir_all(output_dir)
                .await
                .map_err(Self::map_io_error)?;
        }

        let path = output_dir.join(Self::file_name_for(root_id));
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(&path)
            .await
            .map_err(Self::map_io_error)?;

        debug!(path = ?path, "Opened export file");

        Ok(Self {
            path,
            file: Mutex::new(Some(file)),
        })
    }

    /// File name used for a given root folder
    pub fn file_name_for(root_id: &str) -> String {
        format!("{}.csv", root_id)
    }

    /// Location of the export file
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn encode_batch(ids: &[String]) -> BytesMut {
        let capacity = ids.iter().map(|id| id.len() + 1).sum();
        let mut buf = BytesMut::with_capacity(capacity);
        for id in ids {
            buf.put_slice(id.as_bytes());
            buf.put_u8(b'\n');
        }
        buf
    }

    /// Convert std::io::Error to BridgeError
    fn map_io_error(e: std::io::Error) -> BridgeError {
        BridgeError::Io(e)
    }
}

#[async_trait]
impl ExportSink for CsvFileSink {
    async fn write_batch(&self, ids: &[String]) -> Result<()> {
        if ids.is_empty() {
            return Ok(());
        }

        let mut guard = self.file.lock().await;
        let file = guard.as_mut().ok_or_else(|| {
            BridgeError::NotAvailable(format!("export file {:?} already closed", self.path))
        })?;

        let buf = Self::encode_batch(ids);
        file.write_all(&buf).await.map_err(Self::map_io_error)?;
        file.flush().await.map_err(Self::map_io_error)?;

        debug!(count = ids.len(), bytes = buf.len(), "Wrote batch");
        Ok(())
    }

    async fn finish(&self) -> Result<()> {
        let mut guard = self.file.lock().await;
        if let Some(mut file) = guard.take() {
            file.flush().await.map_err(Self::map_io_error)?;
            file.sync_all().await.map_err(Self::map_io_error)?;
            debug!(path = ?self.path, "Closed export file");
        }
        Ok(())
    }
}
