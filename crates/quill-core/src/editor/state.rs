//! Editable state of a single post, as observed by UI bindings.

use serde::{Serialize, Serializer};

use crate::domain::PostId;

/// Save channel status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SaveStatus {
    #[default]
    Idle,
    Saving,
    Saved,
    Error,
}

impl SaveStatus {
    /// The literal value the UI renders. `Idle` is the empty string.
    pub fn as_str(&self) -> &'static str {
        match self {
            SaveStatus::Idle => "",
            SaveStatus::Saving => "saving",
            SaveStatus::Saved => "saved",
            SaveStatus::Error => "error",
        }
    }
}

impl Serialize for SaveStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Publish channel status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PublishStatus {
    #[default]
    Idle,
    Publishing,
    Published,
    Error,
}

impl PublishStatus {
    /// The literal value the UI renders. `Idle` is the empty string.
    pub fn as_str(&self) -> &'static str {
        match self {
            PublishStatus::Idle => "",
            PublishStatus::Publishing => "publishing",
            PublishStatus::Published => "published",
            PublishStatus::Error => "error",
        }
    }
}

impl Serialize for PublishStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Snapshot of the editor. Every mutation publishes a new one to subscribers.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EditorState {
    pub title: String,
    pub author_name: String,
    pub content: String,
    /// Data URL for the author preview. Never written to the store.
    pub author_image: String,
    pub post_id: Option<PostId>,
    pub save_status: SaveStatus,
    pub publish_status: PublishStatus,
    pub image_uploading: bool,
    pub upload_error: Option<String>,
}

impl EditorState {
    /// Whether the post has everything publishing requires.
    pub fn is_publishable(&self) -> bool {
        !self.title.trim().is_empty() && !self.content.trim().is_empty()
    }
}
