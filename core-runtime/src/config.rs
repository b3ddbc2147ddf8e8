//! # Export Configuration Module
//!
//! Provides configuration management for a drive export run.
//!
//! ## Overview
//!
//! The configuration system uses a builder pattern to construct an `ExportConfig`
//! holding every dependency and setting the export service needs. It enforces
//! fail-fast validation so that a misconfigured run stops before the first
//! request is sent.
//!
//! ## Required Settings
//!
//! - `api_key` - Static key injected into every listing request
//!
//! ## Optional Settings (with defaults)
//!
//! - `api_base` - Listing endpoint base (default: Google Drive v3)
//! - `page_size` - Children requested per page (default: 1000)
//! - `concurrency` - Listing calls dispatched per round (default: 10)
//! - `output_dir` - Where `<root>.csv` is written (default: current directory)
//! - `request_timeout` - Per-request bound (default: none)
//! - `HttpClient` - HTTP transport (desktop default: reqwest)
//!
//! When the `desktop-shims` feature is enabled, a `ReqwestHttpClient` is
//! injected automatically if no client is provided.
//!
//! ## Usage
//!
//! ```ignore
//! use core_runtime::config::ExportConfig;
//!
//! let config = ExportConfig::builder()
//!     .api_key(std::env::var("API_KEY")?)
//!     .output_dir("/tmp/exports")
//!     .build()?;
//! ```

use crate::error::{Error, Result};
use bridge_traits::HttpClient;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

/// Google Drive v3 API base URL
pub const DEFAULT_API_BASE: &str = "https://www.googleapis.com/drive/v3";

/// Children requested per listing page (service maximum)
pub const DEFAULT_PAGE_SIZE: u32 = 1000;

/// Listing calls dispatched per traversal round
pub const DEFAULT_CONCURRENCY: usize = 10;

/// Upper bound accepted for `concurrency`
pub const MAX_CONCURRENCY: usize = 100;

/// Configuration for one export run.
///
/// Use [`ExportConfigBuilder`] to construct instances.
#[derive(Clone)]
pub struct ExportConfig {
    /// API key appended to each listing request
    pub api_key: String,

    /// Listing endpoint base URL, without trailing slash
    pub api_base: String,

    /// Children requested per page
    pub page_size: u32,

    /// Maximum listing calls in flight per round
    pub concurrency: usize,

    /// Directory receiving the export file
    pub output_dir: PathBuf,

    /// Optional per-request timeout; `None` waits indefinitely
    pub request_timeout: Option<Duration>,

    /// HTTP client for making API requests
    pub http_client: Arc<dyn HttpClient>,
}

impl std::fmt::Debug for ExportConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExportConfig")
            .field("api_key", &"[REDACTED]")
            .field("api_base", &self.api_base)
            .field("page_size", &self.page_size)
            .field("concurrency", &self.concurrency)
            .field("output_dir", &self.output_dir)
            .field("request_timeout", &self.request_timeout)
            .field("http_client", &"HttpClient { ... }")
            .finish()
    }
}

impl ExportConfig {
    /// Creates a new builder for constructing an `ExportConfig`.
    pub fn builder() -> ExportConfigBuilder {
        ExportConfigBuilder::default()
    }

    /// Validates the configuration and returns an error if invalid.
    ///
    /// This checks:
    /// - API key is not blank
    /// - API base is an http(s) URL
    /// - Page size is within 1..=1000
    /// - Concurrency is within 1..=100
    /// - Request timeout, when set, is non-zero
    pub fn validate(&self) -> Result<()> {
        if self.api_key.trim().is_empty() {
            return Err(Error::Config("API key cannot be empty".to_string()));
        }

        if !(self.api_base.starts_with("https://") || self.api_base.starts_with("http://")) {
            return Err(Error::Config(format!(
                "API base must be an http(s) URL, got '{}'",
                self.api_base
            )));
        }

        if self.page_size == 0 || self.page_size > DEFAULT_PAGE_SIZE {
            return Err(Error::Config(format!(
                "Page size must be between 1 and {}",
                DEFAULT_PAGE_SIZE
            )));
        }

        if self.concurrency == 0 {
            return Err(Error::Config(
                "Concurrency must be at least 1".to_string(),
            ));
        }

        if self.concurrency > MAX_CONCURRENCY {
            return Err(Error::Config(format!(
                "Concurrency exceeds maximum of {}",
                MAX_CONCURRENCY
            )));
        }

        if self.request_timeout == Some(Duration::ZERO) {
            return Err(Error::Config(
                "Request timeout must be greater than zero. Omit it to wait indefinitely."
                    .to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(not(feature = "desktop-shims"))]
fn http_client_missing_error() -> Error {
    Error::CapabilityMissing {
        capability: "HttpClient".to_string(),
        message: "HttpClient implementation is required to reach the listing API. \
                 Desktop: ensure the 'desktop-shims' feature is enabled to use the default ReqwestHttpClient. \
                 Tests: inject a fake via .http_client()."
            .to_string(),
    }
}

#[cfg(feature = "desktop-shims")]
fn provide_default_http_client(timeout: Option<Duration>) -> Result<Arc<dyn HttpClient>> {
    use bridge_desktop::ReqwestHttpClient;

    let client = ReqwestHttpClient::try_with_timeout(timeout)
        .map_err(|e| Error::Internal(format!("Failed to initialize default HttpClient: {}", e)))?;
    let client: Arc<dyn HttpClient> = Arc::new(client);
    Ok(client)
}

#[cfg(not(feature = "desktop-shims"))]
fn provide_default_http_client(_timeout: Option<Duration>) -> Result<Arc<dyn HttpClient>> {
    Err(http_client_missing_error())
}

/// Builder for constructing [`ExportConfig`] instances.
#[derive(Default)]
pub struct ExportConfigBuilder {
    api_key: Option<String>,
    api_base: Option<String>,
    page_size: Option<u32>,
    concurrency: Option<usize>,
    output_dir: Option<PathBuf>,
    request_timeout: Option<Duration>,
    http_client: Option<Arc<dyn HttpClient>>,
}

impl ExportConfigBuilder {
    /// Sets the API key (required).
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Overrides the listing endpoint base URL.
    pub fn api_base(mut self, base: impl Into<String>) -> Self {
        self.api_base = Some(base.into());
        self
    }

    /// Sets the number of children requested per page.
    pub fn page_size(mut self, size: u32) -> Self {
        self.page_size = Some(size);
        self
    }

    /// Sets the number of listing calls dispatched per round.
    pub fn concurrency(mut self, limit: usize) -> Self {
        self.concurrency = Some(limit);
        self
    }

    /// Sets the directory receiving the export file.
    pub fn output_dir<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.output_dir = Some(path.into());
        self
    }

    /// Bounds every listing request by `timeout`.
    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    /// Injects an HTTP client implementation.
    pub fn http_client(mut self, client: Arc<dyn HttpClient>) -> Self {
        self.http_client = Some(client);
        self
    }

    /// Builds the final `ExportConfig` instance.
    ///
    /// # Returns
    ///
    /// Returns `Ok(ExportConfig)` on success, or an error if:
    /// - The API key is missing
    /// - No HTTP client is available
    /// - Configuration values are invalid
    pub fn build(self) -> Result<ExportConfig> {
        let api_key = self.api_key.ok_or_else(|| Error::CapabilityMissing {
            capability: "API key".to_string(),
            message: "Set the API_KEY environment variable or use .api_key() to set it."
                .to_string(),
        })?;

        let api_base = self
            .api_base
            .unwrap_or_else(|| DEFAULT_API_BASE.to_string())
            .trim_end_matches('/')
            .to_string();

        let http_client = match self.http_client {
            Some(client) => client,
            None => provide_default_http_client(self.request_timeout)?,
        };

        let config = ExportConfig {
            api_key,
            api_base,
            page_size: self.page_size.unwrap_or(DEFAULT_PAGE_SIZE),
            concurrency: self.concurrency.unwrap_or(DEFAULT_CONCURRENCY),
            output_dir: self.output_dir.unwrap_or_else(|| PathBuf::from(".")),
            request_timeout: self.request_timeout,
            http_client,
        };

        config.validate()?;

        Ok(config)
    }
}
