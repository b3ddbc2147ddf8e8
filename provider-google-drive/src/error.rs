//! Error types for Google Drive provider

use thiserror::Error;

/// Google Drive provider errors
#[derive(Error, Debug)]
pub enum GoogleDriveError {
    /// API request returned a non-success status
    #[error("Google Drive API error (status {status_code}): {message}")]
    ApiError { status_code: u16, message: String },

    /// Failed to parse API response
    #[error("Failed to parse API response: {0}")]
    ParseError(String),

    /// Bridge error
    #[error(transparent)]
    BridgeError(#[from] bridge_traits::error::BridgeError),
}

/// Result type for Google Drive operations
pub type Result<T> = std::result::Result<T, GoogleDriveError>;

impl From<GoogleDriveError> for bridge_traits::error::BridgeError {
    fn from(error: GoogleDriveError) -> Self {
        match error {
            GoogleDriveError::ApiError {
                status_code,
                message,
            } => bridge_traits::error::BridgeError::OperationFailed(format!(
                "API error (status {}): {}",
                status_code, message
            )),
            GoogleDriveError::ParseError(msg) => {
                bridge_traits::error::BridgeError::OperationFailed(format!("Parse error: {}", msg))
            }
            GoogleDriveError::BridgeError(e) => e,
        }
    }
}
