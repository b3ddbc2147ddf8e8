//! Google Drive API response types
//!
//! Data structures for deserializing Google Drive API v3 responses.

use bridge_traits::storage::RemoteEntry;
use serde::{Deserialize, Serialize};

/// Google Drive API file resource
///
/// Only the fields the listing needs are modelled; unknown fields are ignored.
///
/// See: https://developers.google.com/drive/api/v3/reference/files#resource
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DriveFile {
    /// File ID
    pub id: String,

    /// File name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// MIME type
    pub mime_type: String,
}

impl From<DriveFile> for RemoteEntry {
    fn from(file: DriveFile) -> Self {
        RemoteEntry {
            id: file.id,
            name: file.name,
            mime_type: file.mime_type,
        }
    }
}

/// Google Drive API files.list response
///
/// See: https://developers.google.com/drive/api/v3/reference/files/list
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilesListResponse {
    /// List of files
    #[serde(default)]
    pub files: Vec<DriveFile>,

    /// Token for next page
    #[serde(default)]
    pub next_page_token: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_drive_file() {
        let json = r#"{
            "kind": "drive#file",
            "id": "abc123",
            "name": "report.pdf",
            "mimeType": "application/pdf"
        }"#;

        let file: DriveFile = serde_json::from_str(json).unwrap();
        assert_eq!(file.id, "abc123");
        assert_eq!(file.name.as_deref(), Some("report.pdf"));
        assert_eq!(file.mime_type, "application/pdf");
    }

    #[test]
    fn test_deserialize_files_list_response() {
        let json = r#"{
            "kind": "drive#fileList",
            "files": [
                { "id": "file1", "mimeType": "image/png" },
                { "id": "dir1", "name": "Sub", "mimeType": "application/vnd.google-apps.folder" }
            ],
            "nextPageToken": "token123",
            "incompleteSearch": false
        }"#;

        let response: FilesListResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.files.len(), 2);
        assert!(response.files[0].name.is_none());
        assert_eq!(response.next_page_token, Some("token123".to_string()));
    }

    #[test]
    fn test_deserialize_last_page_without_files_field() {
        let response: FilesListResponse = serde_json::from_str("{}").unwrap();
        assert!(response.files.is_empty());
        assert!(response.next_page_token.is_none());
    }

    #[test]
    fn test_drive_file_into_remote_entry() {
        let entry: RemoteEntry = DriveFile {
            id: "x".to_string(),
            name: Some("notes".to_string()),
            mime_type: "text/plain".to_string(),
        }
        .into();

        assert_eq!(entry, RemoteEntry::new("x", "text/plain").with_name("notes"));
    }
}
