//! Upload relay implementations.

mod memory;

#[cfg(feature = "http")]
mod http;
#[cfg(feature = "http")]
mod image_host;

pub use memory::InMemoryUploadRelay;

#[cfg(feature = "http")]
pub use http::HttpUploadRelay;
#[cfg(feature = "http")]
pub use image_host::{ImageHostConfig, RemoteImageHost, parse_upload_response};
