//! Upload relay port - abstraction over the image hosting path.

use async_trait::async_trait;

use crate::domain::{DeleteOutcome, ImageFile, UploadedImage};
use crate::error::RelayError;

/// Forwards images to a remote host.
///
/// Callers keep at most one outstanding call per file. A successful upload
/// always carries both the public URL and a stable id usable for deletion.
#[async_trait]
pub trait UploadRelay: Send + Sync {
    /// Upload a single file. `locale` selects the localized relay route
    /// where the deployment has one.
    async fn upload_one(
        &self,
        file: &ImageFile,
        locale: Option<&str>,
    ) -> Result<UploadedImage, RelayError>;

    /// Delete a hosted image by id. Deleting an unknown id succeeds.
    async fn delete_one(&self, id: &str) -> Result<DeleteOutcome, RelayError>;
}
