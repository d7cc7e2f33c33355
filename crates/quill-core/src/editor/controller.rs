//! The post lifecycle controller.
//!
//! One `PostEditor` owns the editable state of one post and the rules for
//! moving it from an unsaved buffer to a draft and from a draft to a
//! published post. Store and relay failures never escape an operation: they
//! are logged and reflected in the status channels of [`EditorState`].

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, PoisonError, RwLock, Weak};
use std::time::Duration;

use chrono::Utc;
use tokio::sync::watch;

use super::config::EditorConfig;
use super::notifier::EditorNotifier;
use super::state::{EditorState, PublishStatus, SaveStatus};
use super::timer::TaskSlot;
use crate::domain::{
    DeleteOutcome, ImageFile, Post, PostId, PostPatch, SavedPost, UploadFailure, UploadReport,
    UploadedImage,
};
use crate::error::RelayError;
use crate::ports::{PostStore, UploadRelay};

/// Shown when publishing without a title or content.
pub const PUBLISH_VALIDATION_MESSAGE: &str = "Please add a title and content for your blog post";

/// Shown when saving a post this editor already published.
pub const ALREADY_PUBLISHED_MESSAGE: &str = "This post is already published";

/// Returned when deleting an image without an id.
pub const MISSING_IMAGE_ID_MESSAGE: &str = "No image ID found!";

/// Result of [`PostEditor::publish_post`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PublishOutcome {
    /// The post is published under this id.
    Published(PostId),
    /// Title or content was blank; nothing was written.
    Invalid,
    /// No owner is bound and the editor requires one.
    AuthRequired,
    /// The store write failed.
    Failed,
}

struct EditorInner {
    store: Arc<dyn PostStore>,
    relay: Arc<dyn UploadRelay>,
    notifier: Arc<dyn EditorNotifier>,
    config: EditorConfig,
    owner: RwLock<Option<String>>,
    state: watch::Sender<EditorState>,
    published: AtomicBool,
    save_timer: TaskSlot,
    publish_timer: TaskSlot,
    autosave_timer: TaskSlot,
}

/// Lifecycle controller for a single post.
///
/// Cloning yields another handle to the same editor. Timers are cancelled
/// when the last handle is dropped or on [`PostEditor::dispose`].
#[derive(Clone)]
pub struct PostEditor {
    inner: Arc<EditorInner>,
}

impl PostEditor {
    pub fn new(
        store: Arc<dyn PostStore>,
        relay: Arc<dyn UploadRelay>,
        notifier: Arc<dyn EditorNotifier>,
        config: EditorConfig,
    ) -> Self {
        let (state, _) = watch::channel(EditorState::default());
        Self {
            inner: Arc::new(EditorInner {
                store,
                relay,
                notifier,
                config,
                owner: RwLock::new(None),
                state,
                published: AtomicBool::new(false),
                save_timer: TaskSlot::default(),
                publish_timer: TaskSlot::default(),
                autosave_timer: TaskSlot::default(),
            }),
        }
    }

    /// Current state snapshot.
    pub fn state(&self) -> EditorState {
        self.inner.state.borrow().clone()
    }

    /// Receive a snapshot after every state change.
    pub fn subscribe(&self) -> watch::Receiver<EditorState> {
        self.inner.state.subscribe()
    }

    /// Bind or clear the signed-in owner written with every save.
    pub fn set_owner(&self, email: Option<String>) {
        *self
            .inner
            .owner
            .write()
            .unwrap_or_else(PoisonError::into_inner) = email;
    }

    pub fn set_title(&self, title: impl Into<String>) {
        let title = title.into();
        self.inner.state.send_modify(|s| s.title = title);
    }

    pub fn set_author_name(&self, author_name: impl Into<String>) {
        let author_name = author_name.into();
        self.inner.state.send_modify(|s| s.author_name = author_name);
    }

    pub fn set_author_image(&self, author_image: impl Into<String>) {
        let author_image = author_image.into();
        self.inner
            .state
            .send_modify(|s| s.author_image = author_image);
    }

    pub fn set_content(&self, content: impl Into<String>) {
        let content = content.into();
        self.inner.state.send_modify(|s| s.content = content);
    }

    /// Bind the editor to an existing record, e.g. from a `?postid=` route.
    pub fn set_post_id(&self, id: Option<PostId>) {
        self.inner.state.send_modify(|s| s.post_id = id);
    }

    pub fn validate_for_publish(&self) -> bool {
        self.inner.state.borrow().is_publishable()
    }

    /// Persist the current state as a draft.
    ///
    /// The first successful save inserts a record and binds its id; later
    /// saves merge into that record. Returns `None` when nothing was saved.
    pub async fn save_draft(&self) -> Option<SavedPost> {
        let inner = &self.inner;
        if !inner.owner_allowed() {
            return None;
        }
        if inner.published.load(Ordering::SeqCst) {
            inner.notifier.validation_failed(ALREADY_PUBLISHED_MESSAGE);
            return None;
        }

        let owner = inner.owner();
        let (post_id, patch) = {
            let state = inner.state.borrow();
            let patch = PostPatch::draft(
                &state.title,
                &state.content,
                &state.author_name,
                owner.as_deref(),
                Utc::now(),
            );
            (state.post_id.clone(), patch)
        };

        if let Some(id) = &post_id {
            if inner.stored_as_published(id).await {
                inner.published.store(true, Ordering::SeqCst);
                inner.notifier.validation_failed(ALREADY_PUBLISHED_MESSAGE);
                return None;
            }
        }

        inner.save_timer.cancel();
        inner.state.send_modify(|s| s.save_status = SaveStatus::Saving);

        let result = match &post_id {
            Some(id) => {
                tracing::debug!(post_id = %id, "Updating existing draft");
                inner.store.update(id, patch, true).await.map(|()| id.clone())
            }
            None => {
                tracing::debug!("Creating new draft");
                inner.store.insert(patch).await
            }
        };

        match result {
            Ok(id) => {
                let mut assigned = false;
                inner.state.send_modify(|s| {
                    s.save_status = SaveStatus::Saved;
                    if s.post_id.is_none() {
                        s.post_id = Some(id.clone());
                        assigned = true;
                    }
                });
                if assigned {
                    tracing::info!(post_id = %id, "Draft created");
                    inner.notifier.draft_created(&id);
                }
                inner.schedule_save_clear(inner.config.save_status_ttl);
                Some(SavedPost { id })
            }
            Err(e) => {
                tracing::error!(error = %e, post_id = ?post_id, "Error saving draft");
                inner.state.send_modify(|s| s.save_status = SaveStatus::Error);
                inner.schedule_save_clear(inner.config.error_status_ttl);
                None
            }
        }
    }

    /// Load the record the editor is bound to.
    pub async fn load_draft(&self) -> Option<Post> {
        let id = self.inner.state.borrow().post_id.clone()?;
        self.load_draft_by_id(&id).await
    }

    /// Fetch a record and copy its title, author name and content into the
    /// editor. Never writes to the store.
    pub async fn load_draft_by_id(&self, id: &PostId) -> Option<Post> {
        if id.is_blank() {
            return None;
        }

        match self.inner.store.get_by_id(id).await {
            Ok(Some(post)) => {
                self.inner.state.send_modify(|s| {
                    s.title = post.title.clone();
                    s.author_name = post.author_name.clone();
                    s.content = post.content.clone();
                    s.post_id = Some(post.id.clone());
                });
                self.inner
                    .published
                    .store(post.is_published(), Ordering::SeqCst);
                tracing::debug!(post_id = %id, status = %post.status, "Draft loaded");
                Some(post)
            }
            Ok(None) => {
                tracing::debug!(post_id = %id, "Draft not found");
                None
            }
            Err(e) => {
                tracing::error!(post_id = %id, error = %e, "Error loading draft");
                None
            }
        }
    }

    /// Publish the current state, replacing the bound draft in place.
    pub async fn publish_post(&self) -> PublishOutcome {
        let inner = &self.inner;
        if !inner.owner_allowed() {
            return PublishOutcome::AuthRequired;
        }

        let owner = inner.owner();
        let prepared = {
            let state = inner.state.borrow();
            state.is_publishable().then(|| {
                let patch = PostPatch::published(
                    &state.title,
                    &state.content,
                    &state.author_name,
                    owner.as_deref(),
                    Utc::now(),
                );
                (state.post_id.clone(), patch)
            })
        };
        let Some((post_id, patch)) = prepared else {
            inner.notifier.validation_failed(PUBLISH_VALIDATION_MESSAGE);
            return PublishOutcome::Invalid;
        };

        inner.publish_timer.cancel();
        inner
            .state
            .send_modify(|s| s.publish_status = PublishStatus::Publishing);

        let result = match &post_id {
            Some(id) => {
                tracing::debug!(post_id = %id, "Publishing existing draft");
                inner.store.update(id, patch, true).await.map(|()| id.clone())
            }
            None => {
                tracing::debug!("Publishing new post");
                inner.store.insert(patch).await
            }
        };

        match result {
            Ok(id) => {
                inner.published.store(true, Ordering::SeqCst);
                inner.state.send_modify(|s| {
                    s.publish_status = PublishStatus::Published;
                    if s.post_id.is_none() {
                        s.post_id = Some(id.clone());
                    }
                });
                tracing::info!(post_id = %id, "Post published");
                inner.schedule_publish_redirect();
                PublishOutcome::Published(id)
            }
            Err(e) => {
                tracing::error!(error = %e, post_id = ?post_id, "Error publishing post");
                inner
                    .state
                    .send_modify(|s| s.publish_status = PublishStatus::Error);
                inner.schedule_publish_clear(inner.config.error_status_ttl);
                PublishOutcome::Failed
            }
        }
    }

    /// Upload files one at a time, in order.
    ///
    /// `on_inserted` runs as soon as each file is hosted. A failing file is
    /// reported and skipped; the rest of the batch still uploads.
    pub async fn upload_images<F>(
        &self,
        files: &[ImageFile],
        locale: Option<&str>,
        mut on_inserted: F,
    ) -> UploadReport
    where
        F: FnMut(UploadedImage),
    {
        let mut report = UploadReport::default();
        if files.is_empty() {
            return report;
        }

        let _uploading = UploadingGuard::begin(&self.inner.state);

        for file in files {
            match self.inner.relay.upload_one(file, locale).await {
                Ok(image) => {
                    tracing::debug!(file = %file.name, image_id = %image.id, "Image uploaded");
                    on_inserted(image.clone());
                    report.inserted.push(image);
                }
                Err(e) => {
                    let message = e.to_string();
                    tracing::error!(file = %file.name, error = %message, "Image upload error");
                    self.inner
                        .state
                        .send_modify(|s| s.upload_error = Some(message.clone()));
                    self.inner.notifier.upload_failed(&file.name, &message);
                    report.failures.push(UploadFailure {
                        file_name: file.name.clone(),
                        message,
                    });
                }
            }
        }

        report
    }

    /// Delete a hosted image. An image the host no longer has counts as
    /// deleted.
    pub async fn delete_image(&self, image_id: &str) -> DeleteOutcome {
        if image_id.trim().is_empty() {
            return DeleteOutcome::failed(MISSING_IMAGE_ID_MESSAGE);
        }

        match self.inner.relay.delete_one(image_id).await {
            Ok(outcome) => {
                if !outcome.success {
                    tracing::warn!(image_id, error = ?outcome.error, "Image delete rejected");
                }
                outcome
            }
            Err(RelayError::NotFound) => {
                tracing::debug!(image_id, "Image already gone");
                DeleteOutcome::ok()
            }
            Err(e) => {
                tracing::error!(image_id, error = %e, "Error deleting image");
                DeleteOutcome::failed(e.to_string())
            }
        }
    }

    /// Content-change hook. Schedules a draft save once both title and
    /// content are non-blank; a newer call replaces a pending one.
    pub fn auto_save(&self, content: impl Into<String>) {
        let content = content.into();
        let has_title = !self.inner.state.borrow().title.trim().is_empty();
        if !has_title || content.trim().is_empty() {
            return;
        }
        if !self.inner.owner_allowed() {
            return;
        }

        self.set_content(content);

        let weak = Arc::downgrade(&self.inner);
        let debounce = self.inner.config.autosave_debounce;
        self.inner.autosave_timer.spawn(async move {
            if !debounce.is_zero() {
                tokio::time::sleep(debounce).await;
            }
            // Detached: replacing the debounce must not abort a started save.
            if let Some(inner) = weak.upgrade() {
                let editor = PostEditor { inner };
                tokio::spawn(async move {
                    editor.save_draft().await;
                });
            }
        });
    }

    /// Restore the empty editor and cancel pending timers.
    pub fn reset(&self) {
        self.dispose();
        self.inner.published.store(false, Ordering::SeqCst);
        self.inner.state.send_replace(EditorState::default());
    }

    /// Cancel every pending timer.
    pub fn dispose(&self) {
        self.inner.autosave_timer.cancel();
        self.inner.save_timer.cancel();
        self.inner.publish_timer.cancel();
    }
}

impl EditorInner {
    fn owner(&self) -> Option<String> {
        self.owner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Whether the bound record was already published, possibly by another
    /// editor. A failed lookup leaves the decision to the write.
    async fn stored_as_published(&self, id: &PostId) -> bool {
        match self.store.get_by_id(id).await {
            Ok(Some(post)) => post.is_published(),
            Ok(None) => false,
            Err(e) => {
                tracing::warn!(post_id = %id, error = %e, "Could not check post status before saving");
                false
            }
        }
    }

    fn owner_allowed(&self) -> bool {
        if self.config.require_owner && self.owner().is_none() {
            tracing::info!("Write attempted without a signed-in owner");
            self.notifier.auth_required();
            return false;
        }
        true
    }

    fn schedule_save_clear(self: &Arc<Self>, delay: Duration) {
        let weak = Arc::downgrade(self);
        self.save_timer.spawn(async move {
            tokio::time::sleep(delay).await;
            if let Some(inner) = weak.upgrade() {
                inner.state.send_modify(|s| s.save_status = SaveStatus::Idle);
            }
        });
    }

    fn schedule_publish_clear(self: &Arc<Self>, delay: Duration) {
        let weak = Arc::downgrade(self);
        self.publish_timer.spawn(async move {
            tokio::time::sleep(delay).await;
            if let Some(inner) = weak.upgrade() {
                inner
                    .state
                    .send_modify(|s| s.publish_status = PublishStatus::Idle);
            }
        });
    }

    fn schedule_publish_redirect(self: &Arc<Self>) {
        let weak: Weak<Self> = Arc::downgrade(self);
        let delay = self.config.publish_redirect_delay;
        self.publish_timer.spawn(async move {
            tokio::time::sleep(delay).await;
            if let Some(inner) = weak.upgrade() {
                inner
                    .state
                    .send_modify(|s| s.publish_status = PublishStatus::Idle);
                inner.notifier.navigate_to_listing();
            }
        });
    }
}

/// Keeps `image_uploading` set for the lifetime of a batch, including when
/// the batch future is dropped part way.
struct UploadingGuard<'a> {
    state: &'a watch::Sender<EditorState>,
}

impl<'a> UploadingGuard<'a> {
    fn begin(state: &'a watch::Sender<EditorState>) -> Self {
        state.send_modify(|s| {
            s.image_uploading = true;
            s.upload_error = None;
        });
        Self { state }
    }
}

impl Drop for UploadingGuard<'_> {
    fn drop(&mut self) {
        self.state.send_modify(|s| s.image_uploading = false);
    }
}
