//! Ports - trait definitions for external dependencies.
//! These are the "interfaces" that infrastructure must implement.

mod repository;
mod upload;

pub use repository::PostStore;
pub use upload::UploadRelay;
