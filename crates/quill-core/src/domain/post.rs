use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Title written for drafts saved without one.
pub const UNTITLED_DRAFT: &str = "Untitled Draft";

/// Author name written for posts published without one.
pub const ANONYMOUS_AUTHOR: &str = "Anonymous";

/// Opaque post identifier assigned by the store on first write.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PostId(String);

impl PostId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generate a fresh random identifier.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Display for PostId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for PostId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for PostId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Lifecycle status of a post. `Draft -> Published` is one-way.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostStatus {
    #[default]
    Draft,
    Published,
}

impl PostStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PostStatus::Draft => "draft",
            PostStatus::Published => "published",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "draft" => Some(PostStatus::Draft),
            "published" => Some(PostStatus::Published),
            _ => None,
        }
    }
}

impl fmt::Display for PostStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Post entity - a blog post or draft as stored in the `posts` collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: PostId,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub author_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author_image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_email: Option<String>,
    #[serde(default)]
    pub status: PostStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub saved_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Post {
    /// An empty draft record with the given id.
    pub fn empty(id: PostId) -> Self {
        Self {
            id,
            title: String::new(),
            content: String::new(),
            author_name: String::new(),
            author_image: None,
            user_email: None,
            status: PostStatus::Draft,
            saved_at: None,
            created_at: None,
            updated_at: None,
        }
    }

    /// Materialize a record from a write patch.
    pub fn from_patch(id: PostId, patch: PostPatch) -> Self {
        let mut post = Self::empty(id);
        patch.apply_to(&mut post);
        post
    }

    pub fn is_published(&self) -> bool {
        self.status == PostStatus::Published
    }

    /// Timestamp used to order the post inside its status group.
    ///
    /// Published posts order by creation time, drafts by their last save
    /// and then creation time.
    pub fn listing_timestamp(&self) -> Option<DateTime<Utc>> {
        match self.status {
            PostStatus::Published => self.created_at,
            PostStatus::Draft => self.saved_at.or(self.created_at),
        }
    }
}

/// A partial record. Only fields that are `Some` are written.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author_image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<PostStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub saved_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl PostPatch {
    /// Build the record body for a draft save at `now`.
    ///
    /// A blank title becomes [`UNTITLED_DRAFT`].
    pub fn draft(
        title: &str,
        content: &str,
        author_name: &str,
        user_email: Option<&str>,
        now: DateTime<Utc>,
    ) -> Self {
        let title = title.trim();
        Self {
            title: Some(if title.is_empty() {
                UNTITLED_DRAFT.to_string()
            } else {
                title.to_string()
            }),
            content: Some(content.to_string()),
            author_name: Some(author_name.trim().to_string()),
            user_email: user_email.map(str::to_string),
            status: Some(PostStatus::Draft),
            saved_at: Some(now),
            ..Self::default()
        }
    }

    /// Build the record body for publishing at `now`.
    ///
    /// A blank author name becomes [`ANONYMOUS_AUTHOR`]. The author image
    /// is never part of a published record.
    pub fn published(
        title: &str,
        content: &str,
        author_name: &str,
        user_email: Option<&str>,
        now: DateTime<Utc>,
    ) -> Self {
        let author_name = author_name.trim();
        Self {
            title: Some(title.trim().to_string()),
            content: Some(content.to_string()),
            author_name: Some(if author_name.is_empty() {
                ANONYMOUS_AUTHOR.to_string()
            } else {
                author_name.to_string()
            }),
            user_email: user_email.map(str::to_string),
            status: Some(PostStatus::Published),
            created_at: Some(now),
            updated_at: Some(now),
            ..Self::default()
        }
    }

    /// Merge the fields this patch sets into `post`.
    pub fn apply_to(self, post: &mut Post) {
        if let Some(title) = self.title {
            post.title = title;
        }
        if let Some(content) = self.content {
            post.content = content;
        }
        if let Some(author_name) = self.author_name {
            post.author_name = author_name;
        }
        if let Some(author_image) = self.author_image {
            post.author_image = Some(author_image);
        }
        if let Some(user_email) = self.user_email {
            post.user_email = Some(user_email);
        }
        if let Some(status) = self.status {
            post.status = status;
        }
        if let Some(saved_at) = self.saved_at {
            post.saved_at = Some(saved_at);
        }
        if let Some(created_at) = self.created_at {
            post.created_at = Some(created_at);
        }
        if let Some(updated_at) = self.updated_at {
            post.updated_at = Some(updated_at);
        }
    }
}

/// Result of a successful draft save.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedPost {
    pub id: PostId,
}

/// A single-field equality filter over the `posts` collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PostField {
    Status(PostStatus),
    UserEmail(String),
    AuthorName(String),
}

impl PostField {
    pub fn matches(&self, post: &Post) -> bool {
        match self {
            PostField::Status(status) => post.status == *status,
            PostField::UserEmail(email) => post.user_email.as_deref() == Some(email.as_str()),
            PostField::AuthorName(name) => post.author_name == *name,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_draft_patch_defaults_blank_title() {
        let now = Utc::now();
        let patch = PostPatch::draft("   ", "<p>x</p>", " Ada ", None, now);

        assert_eq!(patch.title.as_deref(), Some(UNTITLED_DRAFT));
        assert_eq!(patch.author_name.as_deref(), Some("Ada"));
        assert_eq!(patch.status, Some(PostStatus::Draft));
        assert_eq!(patch.saved_at, Some(now));
        assert!(patch.created_at.is_none());
    }

    #[test]
    fn test_published_patch_defaults_author() {
        let now = Utc::now();
        let patch = PostPatch::published(" Hello ", "<p>x</p>", "", Some("a@b.c"), now);

        assert_eq!(patch.title.as_deref(), Some("Hello"));
        assert_eq!(patch.author_name.as_deref(), Some(ANONYMOUS_AUTHOR));
        assert_eq!(patch.status, Some(PostStatus::Published));
        assert!(patch.author_image.is_none());
        assert_eq!(patch.created_at, patch.updated_at);
    }

    #[test]
    fn test_apply_keeps_unset_fields() {
        let mut post = Post::from_patch(
            PostId::new("p1"),
            PostPatch {
                title: Some("First".into()),
                author_name: Some("Ada".into()),
                ..PostPatch::default()
            },
        );

        PostPatch {
            title: Some("Second".into()),
            ..PostPatch::default()
        }
        .apply_to(&mut post);

        assert_eq!(post.title, "Second");
        assert_eq!(post.author_name, "Ada");
    }

    #[test]
    fn test_listing_timestamp_falls_back_for_drafts() {
        let now = Utc::now();
        let mut draft = Post::empty(PostId::new("d"));
        draft.created_at = Some(now);
        assert_eq!(draft.listing_timestamp(), Some(now));

        let mut published = Post::empty(PostId::new("p"));
        published.status = PostStatus::Published;
        published.saved_at = Some(now);
        assert_eq!(published.listing_timestamp(), None);
    }

    #[test]
    fn test_status_serializes_lowercase() {
        let json = serde_json::to_string(&PostStatus::Published).unwrap();
        assert_eq!(json, "\"published\"");
        assert_eq!(PostStatus::parse("draft"), Some(PostStatus::Draft));
        assert_eq!(PostStatus::parse("archived"), None);
    }
}
