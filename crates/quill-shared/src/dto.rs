//! Data Transfer Objects - request/response types for the API.

use serde::{Deserialize, Serialize};

/// Multipart field of `POST /api/upload` that carries the image.
pub const UPLOAD_FILE_FIELD: &str = "file";

/// Response of a successful image upload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadResponse {
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub id: String,
}

/// Query of `DELETE /api/upload`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeleteImageQuery {
    #[serde(default)]
    pub id: Option<String>,
}

/// Response of an image deletion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteImageResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Query of `GET /api/posts`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListPostsQuery {
    /// Restrict the listing to posts owned by this email.
    #[serde(default)]
    pub owner: Option<String>,
}
