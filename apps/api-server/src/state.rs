//! Application state - shared across all handlers.

use std::sync::Arc;

use quill_core::ports::{PostStore, UploadRelay};
use quill_infra::{InMemoryPostStore, InMemoryUploadRelay};

use crate::config::AppConfig;

#[cfg(feature = "postgres")]
use quill_infra::PostgresPostStore;
#[cfg(feature = "http")]
use quill_infra::RemoteImageHost;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub posts: Arc<dyn PostStore>,
    pub relay: Arc<dyn UploadRelay>,
    /// Backend names reported by the health check.
    pub store_backend: &'static str,
    pub relay_backend: &'static str,
}

impl AppState {
    /// Build the application state with appropriate implementations.
    pub async fn new(config: &AppConfig) -> Self {
        let (posts, store_backend) = init_store(config).await;
        let (relay, relay_backend) = init_relay(config);

        tracing::info!(
            store = store_backend,
            relay = relay_backend,
            "Application state initialized"
        );

        Self {
            posts,
            relay,
            store_backend,
            relay_backend,
        }
    }

    /// State backed entirely by process memory.
    pub fn in_memory() -> Self {
        Self {
            posts: Arc::new(InMemoryPostStore::new()),
            relay: Arc::new(InMemoryUploadRelay::default()),
            store_backend: "memory",
            relay_backend: "memory",
        }
    }
}

fn memory_store() -> (Arc<dyn PostStore>, &'static str) {
    (Arc::new(InMemoryPostStore::new()), "memory")
}

fn memory_relay() -> (Arc<dyn UploadRelay>, &'static str) {
    (Arc::new(InMemoryUploadRelay::default()), "memory")
}

#[cfg(feature = "postgres")]
async fn init_store(config: &AppConfig) -> (Arc<dyn PostStore>, &'static str) {
    let Some(db_config) = &config.database else {
        tracing::warn!("DATABASE_URL not set. Running without database (in-memory mode).");
        return memory_store();
    };

    match quill_infra::database::connect(db_config).await {
        Ok(conn) => (Arc::new(PostgresPostStore::new(conn)), "postgres"),
        Err(e) => {
            tracing::error!(
                "Failed to connect to database: {}. Using in-memory fallback.",
                e
            );
            memory_store()
        }
    }
}

#[cfg(not(feature = "postgres"))]
async fn init_store(config: &AppConfig) -> (Arc<dyn PostStore>, &'static str) {
    if config.database.is_some() {
        tracing::warn!("DATABASE_URL ignored - built without postgres feature");
    }
    tracing::info!("Running without postgres feature - using in-memory store");
    memory_store()
}

#[cfg(feature = "http")]
fn init_relay(config: &AppConfig) -> (Arc<dyn UploadRelay>, &'static str) {
    let Some(host_config) = config.image_host.clone() else {
        tracing::warn!("IMAGE_HOST_URL not set. Images are kept in memory.");
        return memory_relay();
    };

    match RemoteImageHost::new(host_config) {
        Ok(host) => (Arc::new(host), "image-host"),
        Err(e) => {
            tracing::error!("Failed to build image host client: {}. Using in-memory fallback.", e);
            memory_relay()
        }
    }
}

#[cfg(not(feature = "http"))]
fn init_relay(_config: &AppConfig) -> (Arc<dyn UploadRelay>, &'static str) {
    tracing::info!("Running without http feature - images are kept in memory");
    memory_relay()
}
