//! # Host Bridge Traits
//!
//! Capability traits the export core depends on, implemented per host.
//!
//! ## Overview
//!
//! This crate defines the contract between the traversal core and the concrete
//! adapters. Each trait represents a capability that the core requires but that
//! can be swapped out (real network vs. in-memory fakes in tests).
//!
//! ## Traits
//!
//! - [`HttpClient`](http::HttpClient) - Single-shot async HTTP requests
//! - [`StorageProvider`](storage::StorageProvider) - Paged listing of a remote folder's children
//! - [`ExportSink`](storage::ExportSink) - Destination for discovered file IDs
//!
//! ## Implementations
//!
//! | Capability      | Implementation                           |
//! |-----------------|------------------------------------------|
//! | `HttpClient`    | `bridge_desktop::ReqwestHttpClient`      |
//! | `StorageProvider` | `provider_google_drive::GoogleDriveConnector` |
//! | `ExportSink`    | `bridge_desktop::CsvFileSink`            |
//!
//! ## Error Handling
//!
//! All bridge traits use the [`BridgeError`](error::BridgeError) type. Adapters
//! should convert their own errors into it with an actionable message.
//!
//! ## Thread Safety
//!
//! All bridge traits require `Send + Sync` so that listing calls can be driven
//! concurrently from one coordinating task.

pub mod error;
pub mod http;
pub mod storage;

pub use error::BridgeError;

// Re-export commonly used types
pub use http::{HttpClient, HttpMethod, HttpRequest, HttpResponse};
pub use storage::{ChildPage, ExportSink, RemoteEntry, StorageProvider};
