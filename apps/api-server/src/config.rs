//! Application configuration loaded from environment variables.

use std::env;

use quill_infra::DatabaseConfig;

#[cfg(feature = "http")]
use quill_infra::ImageHostConfig;

/// Largest accepted image body, in bytes.
const DEFAULT_UPLOAD_LIMIT: usize = 10 * 1024 * 1024;

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub upload_limit: usize,
    pub database: Option<DatabaseConfig>,
    #[cfg(feature = "http")]
    pub image_host: Option<ImageHostConfig>,
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self {
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),
            upload_limit: env::var("UPLOAD_MAX_BYTES")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_UPLOAD_LIMIT),
            database: DatabaseConfig::from_env(),
            #[cfg(feature = "http")]
            image_host: ImageHostConfig::from_env(),
        }
    }
}
