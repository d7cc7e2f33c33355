//! PostgreSQL post store.

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DbConn, DbErr, EntityTrait, QueryFilter, QueryOrder,
};

use quill_core::domain::{Post, PostField, PostId, PostPatch};
use quill_core::error::RepoError;
use quill_core::ports::PostStore;

use super::entity::post::{self, ActiveModel, Entity as PostEntity};

/// PostgreSQL post store. Rows of the `posts` table are whole documents.
pub struct PostgresPostStore {
    pub(crate) db: DbConn,
}

impl PostgresPostStore {
    pub fn new(db: DbConn) -> Self {
        Self { db }
    }

    async fn find(&self, id: &PostId) -> Result<Option<Post>, RepoError> {
        let result = PostEntity::find_by_id(id.as_str().to_string())
            .one(&self.db)
            .await
            .map_err(query_error)?;

        Ok(result.map(Into::into))
    }
}

fn query_error(e: DbErr) -> RepoError {
    RepoError::Query(e.to_string())
}

fn write_error(e: DbErr) -> RepoError {
    let err_str = e.to_string();
    if err_str.contains("duplicate") || err_str.contains("unique") {
        RepoError::Constraint("Post already exists".to_string())
    } else {
        RepoError::Query(err_str)
    }
}

#[async_trait]
impl PostStore for PostgresPostStore {
    async fn insert(&self, patch: PostPatch) -> Result<PostId, RepoError> {
        let id = PostId::generate();
        let active: ActiveModel = Post::from_patch(id.clone(), patch).into();
        active.insert(&self.db).await.map_err(write_error)?;

        tracing::debug!(post_id = %id, "Post inserted");
        Ok(id)
    }

    async fn update(&self, id: &PostId, patch: PostPatch, merge: bool) -> Result<(), RepoError> {
        let existing = self.find(id).await?;

        match (existing, merge) {
            (Some(mut post), true) => {
                patch.apply_to(&mut post);
                ActiveModel::from(post)
                    .update(&self.db)
                    .await
                    .map_err(write_error)?;
            }
            (None, true) => return Err(RepoError::NotFound),
            (Some(_), false) => {
                ActiveModel::from(Post::from_patch(id.clone(), patch))
                    .update(&self.db)
                    .await
                    .map_err(write_error)?;
            }
            (None, false) => {
                ActiveModel::from(Post::from_patch(id.clone(), patch))
                    .insert(&self.db)
                    .await
                    .map_err(write_error)?;
            }
        }

        tracing::debug!(post_id = %id, merge, "Post updated");
        Ok(())
    }

    async fn get_by_id(&self, id: &PostId) -> Result<Option<Post>, RepoError> {
        self.find(id).await
    }

    async fn query_by_field(&self, field: PostField) -> Result<Vec<Post>, RepoError> {
        let condition = match field {
            PostField::Status(status) => post::Column::Status.eq(status.as_str()),
            PostField::UserEmail(email) => post::Column::UserEmail.eq(email),
            PostField::AuthorName(name) => post::Column::AuthorName.eq(name),
        };

        let result = PostEntity::find()
            .filter(condition)
            .order_by_asc(post::Column::Id)
            .all(&self.db)
            .await
            .map_err(query_error)?;

        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn list_all(&self) -> Result<Vec<Post>, RepoError> {
        let result = PostEntity::find()
            .order_by_asc(post::Column::Id)
            .all(&self.db)
            .await
            .map_err(query_error)?;

        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn delete_by_id(&self, id: &PostId) -> Result<(), RepoError> {
        let result = PostEntity::delete_by_id(id.as_str().to_string())
            .exec(&self.db)
            .await
            .map_err(query_error)?;

        if result.rows_affected == 0 {
            tracing::debug!(post_id = %id, "Delete of missing post ignored");
        }

        Ok(())
    }
}
