//! In-memory post store - used when no database is configured.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use quill_core::domain::{Post, PostField, PostId, PostPatch};
use quill_core::error::RepoError;
use quill_core::ports::PostStore;

/// In-memory document store using a HashMap with async RwLock.
///
/// Note: Data is lost on process restart.
pub struct InMemoryPostStore {
    records: RwLock<HashMap<PostId, Post>>,
}

impl InMemoryPostStore {
    pub fn new() -> Self {
        Self {
            records: RwLock::new(HashMap::new()),
        }
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

impl Default for InMemoryPostStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PostStore for InMemoryPostStore {
    async fn insert(&self, patch: PostPatch) -> Result<PostId, RepoError> {
        let id = PostId::generate();
        let mut records = self.records.write().await;
        records.insert(id.clone(), Post::from_patch(id.clone(), patch));
        tracing::debug!(post_id = %id, "Post inserted");
        Ok(id)
    }

    async fn update(&self, id: &PostId, patch: PostPatch, merge: bool) -> Result<(), RepoError> {
        let mut records = self.records.write().await;

        if merge {
            let post = records.get_mut(id).ok_or(RepoError::NotFound)?;
            patch.apply_to(post);
        } else {
            records.insert(id.clone(), Post::from_patch(id.clone(), patch));
        }

        tracing::debug!(post_id = %id, merge, "Post updated");
        Ok(())
    }

    async fn get_by_id(&self, id: &PostId) -> Result<Option<Post>, RepoError> {
        let records = self.records.read().await;
        Ok(records.get(id).cloned())
    }

    async fn query_by_field(&self, field: PostField) -> Result<Vec<Post>, RepoError> {
        let records = self.records.read().await;
        Ok(records
            .values()
            .filter(|post| field.matches(post))
            .cloned()
            .collect())
    }

    async fn list_all(&self) -> Result<Vec<Post>, RepoError> {
        let records = self.records.read().await;
        Ok(records.values().cloned().collect())
    }

    async fn delete_by_id(&self, id: &PostId) -> Result<(), RepoError> {
        let mut records = self.records.write().await;
        if records.remove(id).is_none() {
            tracing::debug!(post_id = %id, "Delete of missing post ignored");
        }
        Ok(())
    }
}
