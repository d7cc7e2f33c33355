//! Post lifecycle controller - one post's editable state and its
//! draft/publish transitions.

mod config;
mod controller;
mod notifier;
mod state;
mod timer;

pub use config::EditorConfig;
pub use controller::{
    ALREADY_PUBLISHED_MESSAGE, MISSING_IMAGE_ID_MESSAGE, PUBLISH_VALIDATION_MESSAGE, PostEditor,
    PublishOutcome,
};
pub use notifier::{EditorNotifier, NoopNotifier};
pub use state::{EditorState, PublishStatus, SaveStatus};
