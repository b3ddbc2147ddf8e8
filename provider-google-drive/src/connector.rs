//! Google Drive API connector implementation
//!
//! Implements the `StorageProvider` trait for Google Drive API v3.

use async_trait::async_trait;
use bridge_traits::error::Result;
use bridge_traits::http::{HttpClient, HttpRequest};
use bridge_traits::storage::{ChildPage, RemoteEntry, StorageProvider};
use core_runtime::config::{ExportConfig, DEFAULT_API_BASE, DEFAULT_PAGE_SIZE};
use core_runtime::logging::redact_url;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, instrument};

use crate::error::GoogleDriveError;
use crate::types::FilesListResponse;

/// MIME type Google Drive uses for folders
pub const FOLDER_MIME_TYPE: &str = "application/vnd.google-apps.folder";

/// Sort folders after files so a page front-loads leaf items
const ORDER_BY: &str = "folder desc";

/// Google Drive API connector
///
/// Lists the direct children of a folder with `files.list`, one page per call.
/// A single request is made per call; non-success statuses are reported as
/// [`GoogleDriveError::ApiError`] and are never retried here.
///
/// # Example
///
/// ```ignore
/// use provider_google_drive::GoogleDriveConnector;
/// use bridge_traits::storage::StorageProvider;
///
/// let connector = GoogleDriveConnector::new(http_client, api_key);
/// let page = connector.list_children("0AbCdEf", None).await?;
/// ```
pub struct GoogleDriveConnector {
    /// HTTP client for API requests
    http_client: Arc<dyn HttpClient>,

    /// Static API key sent as the `key` query parameter
    api_key: String,

    api_base: String,
    page_size: u32,
    request_timeout: Option<Duration>,
}

impl GoogleDriveConnector {
    /// Create a new Google Drive connector against the public endpoint
    ///
    /// # Arguments
    ///
    /// * `http_client` - HTTP client implementation
    /// * `api_key` - API key with access to the drive
    pub fn new(http_client: Arc<dyn HttpClient>, api_key: impl Into<String>) -> Self {
        Self {
            http_client,
            api_key: api_key.into(),
            api_base: DEFAULT_API_BASE.to_string(),
            page_size: DEFAULT_PAGE_SIZE,
            request_timeout: None,
        }
    }

    /// Create a connector from a validated export configuration
    pub fn from_config(config: &ExportConfig) -> Self {
        let mut connector = Self::new(Arc::clone(&config.http_client), config.api_key.clone())
            .with_api_base(config.api_base.clone())
            .with_page_size(config.page_size);
        connector.request_timeout = config.request_timeout;
        connector
    }

    /// Point the connector at a different endpoint base (e.g. a local stub)
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into().trim_end_matches('/').to_string();
        self
    }

    /// Override the number of children requested per page
    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }

    /// Bound each request by `timeout`
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    /// True when `mime_type` denotes a folder; every other kind is a file
    pub fn is_folder(mime_type: &str) -> bool {
        mime_type == FOLDER_MIME_TYPE
    }

    /// Build the `files.list` URL for one page of `folder_id`'s children
    fn list_url(&self, folder_id: &str, cursor: Option<&str>) -> String {
        let query = format!("\"{}\" in parents", folder_id);

        let mut url = format!(
            "{}/files?orderBy={}&pageSize={}&key={}&q={}",
            self.api_base,
            urlencoding::encode(ORDER_BY),
            self.page_size,
            urlencoding::encode(&self.api_key),
            urlencoding::encode(&query),
        );

        if let Some(page_token) = cursor {
            url.push_str(&format!("&pageToken={}", urlencoding::encode(page_token)));
        }

        url
    }
}

#[async_trait]
impl StorageProvider for GoogleDriveConnector {
    #[instrument(skip(self, cursor), fields(folder_id = %folder_id, has_cursor = cursor.is_some()))]
    async fn list_children(&self, folder_id: &str, cursor: Option<String>) -> Result<ChildPage> {
        let url = self.list_url(folder_id, cursor.as_deref());
        debug!(url = %redact_url(&url), "Listing folder page");

        let request = HttpRequest::get(url)
            .header("Accept", "application/json")
            .timeout(self.request_timeout);

        let response = self.http_client.execute(request).await?;

        if !response.is_success() {
            debug!(status = response.status, "Listing request was not successful");
            return Err(GoogleDriveError::ApiError {
                status_code: response.status,
                message: String::from_utf8_lossy(&response.body).to_string(),
            }
            .into());
        }

        let list_response: FilesListResponse = response.json().map_err(|e| {
            GoogleDriveError::ParseError(format!("Failed to parse files list response: {}", e))
        })?;

        let entries: Vec<RemoteEntry> = list_response
            .files
            .into_iter()
            .map(RemoteEntry::from)
            .collect();

        // An empty token means there is no next page
        let next_cursor = list_response.next_page_token.filter(|token| !token.is_empty());
        let page = ChildPage::classify(entries, next_cursor, |entry| {
            Self::is_folder(&entry.mime_type)
        });

        debug!(
            files = page.files.len(),
            folders = page.folders.len(),
            more = !page.is_last(),
            "Listed folder page"
        );

        Ok(page)
    }
}
