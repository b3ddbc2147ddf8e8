//! # Desktop Bridge Implementations
//!
//! Default implementations of bridge traits for desktop platforms
//! (macOS, Windows, Linux).
//!
//! ## Overview
//!
//! - `HttpClient` using `reqwest`
//! - `ExportSink` writing a flat CSV file with `tokio::fs`
//!
//! ## Usage
//!
//! ```ignore
//! use bridge_desktop::{CsvFileSink, ReqwestHttpClient};
//! use std::path::Path;
//!
//! #[tokio::main]
//! async fn main() -> bridge_traits::error::Result<()> {
//!     let http_client = ReqwestHttpClient::try_new()?;
//!     let sink = CsvFileSink::create(Path::new("."), "0AbCdEf").await?;
//!     Ok(())
//! }
//! ```

mod filesystem;
mod http;

pub use filesystem::CsvFileSink;
pub use http::ReqwestHttpClient;
