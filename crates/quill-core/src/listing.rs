//! Listing read model - every post, drafts and published, in display order.

use std::cmp::Ordering;
use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::domain::{Post, PostField, PostId, PostPatch, PostStatus};
use crate::error::RepoError;
use crate::ports::PostStore;

pub const LOAD_ERROR_MESSAGE: &str = "Failed to load posts";
pub const DELETE_ERROR_MESSAGE: &str = "Failed to delete post";

/// Asks the author to confirm a destructive action.
pub trait DeleteConfirmation: Send + Sync {
    fn confirm(&self, message: &str) -> bool;
}

impl<F> DeleteConfirmation for F
where
    F: Fn(&str) -> bool + Send + Sync,
{
    fn confirm(&self, message: &str) -> bool {
        self(message)
    }
}

/// Confirmation for non-interactive callers such as the HTTP API.
#[derive(Debug, Clone, Copy, Default)]
pub struct AlwaysConfirm;

impl DeleteConfirmation for AlwaysConfirm {
    fn confirm(&self, _message: &str) -> bool {
        true
    }
}

/// Published posts first, then drafts; newest first inside each group.
/// Posts without a usable timestamp sort as the oldest.
pub fn sort_for_display(posts: &mut [Post]) {
    posts.sort_by(compare_for_display);
}

fn compare_for_display(a: &Post, b: &Post) -> Ordering {
    fn group(post: &Post) -> u8 {
        match post.status {
            PostStatus::Published => 0,
            PostStatus::Draft => 1,
        }
    }
    fn timestamp(post: &Post) -> DateTime<Utc> {
        post.listing_timestamp().unwrap_or(DateTime::UNIX_EPOCH)
    }

    group(a)
        .cmp(&group(b))
        .then_with(|| timestamp(b).cmp(&timestamp(a)))
}

/// In-memory listing backed by the post store.
pub struct PostListing {
    store: Arc<dyn PostStore>,
    posts: Vec<Post>,
    is_loading: bool,
    deleting_id: Option<PostId>,
    error: Option<String>,
}

impl PostListing {
    pub fn new(store: Arc<dyn PostStore>) -> Self {
        Self {
            store,
            posts: Vec::new(),
            is_loading: false,
            deleting_id: None,
            error: None,
        }
    }

    /// Load every post regardless of status or owner.
    pub async fn fetch_all(&mut self) -> bool {
        let store = self.store.clone();
        let result = self.load(store.list_all()).await;
        self.finish_load(result)
    }

    /// Load the posts tagged with `email`. A blank email loads nothing.
    pub async fn fetch_for_owner(&mut self, email: &str) -> bool {
        if email.trim().is_empty() {
            self.posts.clear();
            self.error = None;
            return true;
        }
        let field = PostField::UserEmail(email.to_string());
        let store = self.store.clone();
        let result = self.load(store.query_by_field(field)).await;
        self.finish_load(result)
    }

    async fn load<F>(&mut self, fut: F) -> Result<Vec<Post>, RepoError>
    where
        F: std::future::Future<Output = Result<Vec<Post>, RepoError>>,
    {
        self.is_loading = true;
        self.error = None;
        let result = fut.await;
        self.is_loading = false;
        result
    }

    fn finish_load(&mut self, result: Result<Vec<Post>, RepoError>) -> bool {
        match result {
            Ok(posts) => {
                tracing::debug!(count = posts.len(), "Posts loaded");
                self.posts = posts;
                true
            }
            Err(e) => {
                tracing::error!(error = %e, "Error fetching posts");
                self.error = Some(LOAD_ERROR_MESSAGE.to_string());
                false
            }
        }
    }

    pub fn posts(&self) -> &[Post] {
        &self.posts
    }

    /// All loaded posts in display order.
    pub fn sorted(&self) -> Vec<Post> {
        let mut posts = self.posts.clone();
        sort_for_display(&mut posts);
        posts
    }

    pub fn drafts(&self) -> Vec<&Post> {
        self.with_status(PostStatus::Draft)
    }

    pub fn published(&self) -> Vec<&Post> {
        self.with_status(PostStatus::Published)
    }

    fn with_status(&self, status: PostStatus) -> Vec<&Post> {
        self.posts.iter().filter(|p| p.status == status).collect()
    }

    /// Hard-delete a post after confirmation.
    ///
    /// Returns `true` when the post is gone, including when the store no
    /// longer had it.
    pub async fn delete_post(&mut self, id: &PostId, confirm: &dyn DeleteConfirmation) -> bool {
        let kind = match self.posts.iter().find(|p| &p.id == id) {
            Some(post) if post.is_published() => "published post",
            _ => "draft",
        };
        let message =
            format!("Are you sure you want to delete this {kind}? This action cannot be undone.");
        if !confirm.confirm(&message) {
            return false;
        }

        self.deleting_id = Some(id.clone());
        let result = match self.store.delete_by_id(id).await {
            Err(RepoError::NotFound) => {
                tracing::debug!(post_id = %id, "Post already deleted");
                Ok(())
            }
            other => other,
        };
        self.deleting_id = None;

        match result {
            Ok(()) => {
                tracing::info!(post_id = %id, "Post deleted");
                self.posts.retain(|p| &p.id != id);
                true
            }
            Err(e) => {
                tracing::error!(post_id = %id, error = %e, "Error deleting post");
                self.error = Some(DELETE_ERROR_MESSAGE.to_string());
                false
            }
        }
    }

    /// Merge `patch` into a loaded post without touching the store.
    pub fn update_post(&mut self, id: &PostId, patch: PostPatch) -> bool {
        match self.posts.iter_mut().find(|p| &p.id == id) {
            Some(post) => {
                patch.apply_to(post);
                true
            }
            None => false,
        }
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    pub fn deleting_id(&self) -> Option<&PostId> {
        self.deleting_id.as_ref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }
}
