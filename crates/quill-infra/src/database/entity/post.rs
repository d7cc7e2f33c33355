//! Post entity for SeaORM.

use sea_orm::Set;
use sea_orm::entity::prelude::*;

use quill_core::domain::{Post, PostId, PostStatus};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "posts")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub title: String,
    #[sea_orm(column_type = "Text")]
    pub content: String,
    pub author_name: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub author_image: Option<String>,
    #[sea_orm(nullable)]
    pub user_email: Option<String>,
    pub status: String,
    pub saved_at: Option<DateTimeWithTimeZone>,
    pub created_at: Option<DateTimeWithTimeZone>,
    pub updated_at: Option<DateTimeWithTimeZone>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// Conversion from SeaORM Model to Domain Post.
impl From<Model> for Post {
    fn from(model: Model) -> Self {
        let status = PostStatus::parse(&model.status).unwrap_or_else(|| {
            tracing::warn!(post_id = %model.id, status = %model.status, "Unknown post status, treating as draft");
            PostStatus::Draft
        });

        Self {
            id: PostId::new(model.id),
            title: model.title,
            content: model.content,
            author_name: model.author_name,
            author_image: model.author_image,
            user_email: model.user_email,
            status,
            saved_at: model.saved_at.map(Into::into),
            created_at: model.created_at.map(Into::into),
            updated_at: model.updated_at.map(Into::into),
        }
    }
}

/// Conversion from Domain Post to SeaORM ActiveModel.
impl From<Post> for ActiveModel {
    fn from(post: Post) -> Self {
        Self {
            id: Set(post.id.as_str().to_string()),
            title: Set(post.title),
            content: Set(post.content),
            author_name: Set(post.author_name),
            author_image: Set(post.author_image),
            user_email: Set(post.user_email),
            status: Set(post.status.as_str().to_string()),
            saved_at: Set(post.saved_at.map(Into::into)),
            created_at: Set(post.created_at.map(Into::into)),
            updated_at: Set(post.updated_at.map(Into::into)),
        }
    }
}
