//! In-memory upload relay - used in tests and when no image host is
//! configured. Images are kept in process memory.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use tokio::sync::RwLock;

use quill_core::domain::{DeleteOutcome, ImageFile, UploadedImage};
use quill_core::error::RelayError;
use quill_core::ports::UploadRelay;

pub struct InMemoryUploadRelay {
    base_url: String,
    images: RwLock<HashMap<String, ImageFile>>,
    next_id: AtomicU64,
}

impl InMemoryUploadRelay {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            images: RwLock::new(HashMap::new()),
            next_id: AtomicU64::new(1),
        }
    }

    /// The stored image, if it is still hosted.
    pub async fn get(&self, id: &str) -> Option<ImageFile> {
        self.images.read().await.get(id).cloned()
    }

    pub async fn len(&self) -> usize {
        self.images.read().await.len()
    }
}

impl Default for InMemoryUploadRelay {
    fn default() -> Self {
        Self::new("memory://images")
    }
}

#[async_trait]
impl UploadRelay for InMemoryUploadRelay {
    async fn upload_one(
        &self,
        file: &ImageFile,
        _locale: Option<&str>,
    ) -> Result<UploadedImage, RelayError> {
        if file.is_empty() {
            return Err(RelayError::EmptyFile);
        }

        let id = self.next_id.fetch_add(1, Ordering::Relaxed).to_string();
        let url = format!("{}/{}/{}", self.base_url, id, file.name);
        self.images.write().await.insert(id.clone(), file.clone());

        tracing::debug!(image_id = %id, file = %file.name, "Image stored in memory");
        Ok(UploadedImage {
            url,
            id,
            name: Some(file.name.clone()),
        })
    }

    async fn delete_one(&self, id: &str) -> Result<DeleteOutcome, RelayError> {
        if self.images.write().await.remove(id).is_none() {
            tracing::debug!(image_id = %id, "Delete of missing image ignored");
        }
        Ok(DeleteOutcome::ok())
    }
}
