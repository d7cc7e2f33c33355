//! Domain entities - the core business objects.

mod image;
mod post;

pub use image::{DeleteOutcome, ImageFile, UploadFailure, UploadReport, UploadedImage};
pub use post::{
    ANONYMOUS_AUTHOR, Post, PostField, PostId, PostPatch, PostStatus, SavedPost, UNTITLED_DRAFT,
};
