//! Notification and navigation collaborators.
//!
//! Both are fire-and-forget: the core never consumes a return value.

/// User-facing notifications raised by the core.
pub trait Notifier: Send + Sync {
    fn notify_error(&self, message: &str);
    fn notify_success(&self, message: &str);
}

/// Client navigation requested after a state change.
pub trait Navigator: Send + Sync {
    /// Navigate to the given application path.
    fn navigate(&self, path: &str);
    /// Ask cached list views to refetch.
    fn refresh(&self);
}

/// Application path of a session's read-only detail view.
pub fn session_detail_path(session_id: crate::types::DbId) -> String {
    format!("/sessions/{session_id}")
}
