//! # Quill Core
//!
//! The domain layer of Quill: posts, the draft/publish lifecycle controller
//! and the listing read model. Storage and image hosting are reached only
//! through the ports in [`ports`].

pub mod domain;
pub mod editor;
pub mod error;
pub mod listing;
pub mod ports;

#[cfg(test)]
mod testing;

pub use editor::{EditorConfig, EditorState, PostEditor};
pub use error::{RelayError, RepoError};
pub use listing::PostListing;
