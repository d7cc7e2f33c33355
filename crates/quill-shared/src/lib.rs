//! # Quill Shared
//!
//! Wire types shared between the relay server and its HTTP clients.

pub mod dto;
pub mod response;

pub use response::{ApiResponse, ErrorResponse};
