//! # Google Drive Provider
//!
//! Implements `StorageProvider` trait for Google Drive API v3.
//!
//! ## Overview
//!
//! This module provides:
//! - Paged listing of a folder's direct children (`files.list`)
//! - API key authentication via the `key` query parameter
//! - Folder/file classification by MIME type

pub mod connector;
pub mod error;
pub mod types;

pub use connector::{GoogleDriveConnector, FOLDER_MIME_TYPE};
pub use error::{GoogleDriveError, Result};
