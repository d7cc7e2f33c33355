//! # Quill Infrastructure
//!
//! Concrete implementations of the ports defined in `quill-core`.
//! This crate contains the post stores and the image upload relays.
//!
//! ## Feature Flags
//!
//! - `full` (default) - All features enabled
//! - `minimal` - No external dependencies, in-memory only
//! - `postgres` - PostgreSQL post store via SeaORM
//! - `http` - Remote image host and relay clients via reqwest

pub mod database;
pub mod relay;
pub mod store;

// Re-exports - In-Memory
pub use database::DatabaseConfig;
pub use relay::InMemoryUploadRelay;
pub use store::InMemoryPostStore;

#[cfg(feature = "postgres")]
pub use database::PostgresPostStore;

#[cfg(feature = "http")]
pub use relay::{HttpUploadRelay, ImageHostConfig, RemoteImageHost};
