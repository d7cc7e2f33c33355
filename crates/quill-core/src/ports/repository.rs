use async_trait::async_trait;

use crate::domain::{Post, PostField, PostId, PostPatch};
use crate::error::RepoError;

/// Document store over the `posts` collection. Drafts and published posts
/// live together and are told apart only by their status.
#[async_trait]
pub trait PostStore: Send + Sync {
    /// Insert a new record built from `patch`, returning its assigned id.
    async fn insert(&self, patch: PostPatch) -> Result<PostId, RepoError>;

    /// Write `patch` to an existing record.
    ///
    /// With `merge` only the fields the patch sets are written and a missing
    /// record is [`RepoError::NotFound`]. Without `merge` the record body is
    /// replaced by the patch, creating the record if needed.
    async fn update(&self, id: &PostId, patch: PostPatch, merge: bool) -> Result<(), RepoError>;

    /// Find a record by id.
    async fn get_by_id(&self, id: &PostId) -> Result<Option<Post>, RepoError>;

    /// All records where the given field equals the given value.
    async fn query_by_field(&self, field: PostField) -> Result<Vec<Post>, RepoError>;

    /// Every record regardless of status or owner.
    async fn list_all(&self) -> Result<Vec<Post>, RepoError>;

    /// Hard delete. Deleting a missing record is not an error.
    async fn delete_by_id(&self, id: &PostId) -> Result<(), RepoError>;
}
