//! Outbound signals from the editor to whatever hosts it.

use crate::domain::PostId;

/// Capabilities the host injects into the editor.
///
/// Every hook has a no-op default so a host only implements what it routes.
pub trait EditorNotifier: Send + Sync {
    /// A first save assigned an id. Hosts usually rewrite the route to it.
    fn draft_created(&self, _id: &PostId) {}

    /// Publishing finished and the redirect delay elapsed.
    fn navigate_to_listing(&self) {}

    /// A user-facing validation message.
    fn validation_failed(&self, _message: &str) {}

    /// One file of an image batch failed.
    fn upload_failed(&self, _file_name: &str, _message: &str) {}

    /// A write was attempted without a signed-in owner.
    fn auth_required(&self) {}
}

/// Notifier that drops every signal.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopNotifier;

impl EditorNotifier for NoopNotifier {}
