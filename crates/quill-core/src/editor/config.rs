//! Editor timing and access configuration.

use std::time::Duration;

/// Lifecycle controller configuration.
#[derive(Debug, Clone)]
pub struct EditorConfig {
    /// How long `saved` stays visible before clearing.
    pub save_status_ttl: Duration,
    /// How long `error` stays visible on either channel.
    pub error_status_ttl: Duration,
    /// Delay between `published` and navigation to the listing.
    pub publish_redirect_delay: Duration,
    /// Quiet window before an autosave fires. Zero saves immediately.
    pub autosave_debounce: Duration,
    /// Refuse writes until an owner email is bound.
    pub require_owner: bool,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            save_status_ttl: Duration::from_secs(3),
            error_status_ttl: Duration::from_secs(3),
            publish_redirect_delay: Duration::from_secs(2),
            autosave_debounce: Duration::from_secs(2),
            require_owner: false,
        }
    }
}

impl EditorConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            autosave_debounce: std::env::var("EDITOR_AUTOSAVE_DEBOUNCE_MS")
                .ok()
                .and_then(|s| s.parse().ok())
                .map(Duration::from_millis)
                .unwrap_or(defaults.autosave_debounce),
            require_owner: std::env::var("EDITOR_REQUIRE_OWNER")
                .map(|v| v == "true" || v == "1")
                .unwrap_or(defaults.require_owner),
            ..defaults
        }
    }
}
