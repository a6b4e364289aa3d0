//! Uploaded file metadata

use serde::Serialize;
use utoipa::ToSchema;

/// Result of a stored upload
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct UploadResult {
    /// Generated storage name, relative to the media root
    pub name: String,
    /// Name the client sent
    pub original_name: String,
    pub content_type: String,
    pub size: i64,
    /// Hex SHA-256 of the content
    pub sha256: String,
    /// Public link to the file
    pub url: String,
}
