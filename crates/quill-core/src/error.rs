//! Domain-level error types.

use thiserror::Error;

/// Repository-level errors.
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Database connection failed: {0}")]
    Connection(String),

    #[error("Query execution failed: {0}")]
    Query(String),

    #[error("Entity not found")]
    NotFound,

    #[error("Constraint violation: {0}")]
    Constraint(String),
}

/// Upload relay errors. The message is meant to be shown to the author.
#[derive(Debug, Error)]
pub enum RelayError {
    #[error("No file provided.")]
    EmptyFile,

    #[error("Upload failed: {0}")]
    Upload(String),

    #[error("API Error: {message}")]
    Api { status: u16, message: String },

    #[error("Invalid response format from external API.")]
    InvalidResponse,

    #[error("Image not found")]
    NotFound,

    #[error("Connection failed: {0}")]
    Connection(String),
}
