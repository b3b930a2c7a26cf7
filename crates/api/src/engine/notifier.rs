//! Adapters from core notification and navigation traits to the API.

use std::sync::{Arc, Mutex};

use forgefit_core::notify::{Navigator, Notifier};
use forgefit_core::types::DbId;
use forgefit_events::{EventBus, NotificationLevel, WorkoutEvent};

/// Publishes user notifications on the [`EventBus`]. The notification
/// persistence service stores them for `GET /notifications`.
#[derive(Clone)]
pub struct BusNotifier {
    bus: Arc<EventBus>,
    user_id: DbId,
    session_id: Option<DbId>,
}

impl BusNotifier {
    pub fn new(bus: Arc<EventBus>, user_id: DbId) -> Self {
        Self {
            bus,
            user_id,
            session_id: None,
        }
    }

    pub fn for_session(mut self, session_id: DbId) -> Self {
        self.session_id = Some(session_id);
        self
    }

    fn publish(&self, level: NotificationLevel, message: &str) {
        let mut event = WorkoutEvent::notification(self.user_id, level, message);
        if let Some(session_id) = self.session_id {
            event = event.with_session(session_id);
        }
        self.bus.publish(event);
    }
}

impl Notifier for BusNotifier {
    fn notify_error(&self, message: &str) {
        tracing::warn!(user_id = self.user_id, session_id = ?self.session_id, text = message, "Notify error");
        self.publish(NotificationLevel::Error, message);
    }

    fn notify_success(&self, message: &str) {
        tracing::debug!(user_id = self.user_id, session_id = ?self.session_id, text = message, "Notify success");
        self.publish(NotificationLevel::Success, message);
    }
}

/// Captures navigation requests so handlers can return them to the client.
#[derive(Debug, Default)]
pub struct ResponseNavigator {
    state: Mutex<NavigationState>,
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct NavigationState {
    pub redirect_to: Option<String>,
    pub refresh: bool,
}

impl ResponseNavigator {
    pub fn take(&self) -> NavigationState {
        match self.state.lock() {
            Ok(mut state) => std::mem::take(&mut *state),
            Err(poisoned) => std::mem::take(&mut *poisoned.into_inner()),
        }
    }

    fn update(&self, f: impl FnOnce(&mut NavigationState)) {
        match self.state.lock() {
            Ok(mut state) => f(&mut state),
            Err(poisoned) => f(&mut poisoned.into_inner()),
        }
    }
}

impl Navigator for ResponseNavigator {
    fn navigate(&self, path: &str) {
        self.update(|s| s.redirect_to = Some(path.to_string()));
    }

    fn refresh(&self) {
        self.update(|s| s.refresh = true);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn bus_notifier_publishes_user_notification() {
        let bus = Arc::new(EventBus::default());
        let mut rx = bus.subscribe();
        let notifier = BusNotifier::new(Arc::clone(&bus), 5).for_session(11);

        notifier.notify_error("Failed to autosave workout progress");

        let event = rx.recv().await.unwrap();
        assert_eq!(event.user_id, 5);
        assert_eq!(event.session_id, Some(11));
        let note = event.notification.unwrap();
        assert_eq!(note.level, NotificationLevel::Error);
        assert_eq!(note.message, "Failed to autosave workout progress");
    }

    #[test]
    fn navigator_captures_last_redirect_and_refresh() {
        let nav = ResponseNavigator::default();
        nav.navigate("/sessions");
        nav.navigate("/sessions/4");
        nav.refresh();

        let state = nav.take();
        assert_eq!(state.redirect_to.as_deref(), Some("/sessions/4"));
        assert!(state.refresh);
        assert_eq!(nav.take(), NavigationState::default());
    }
}
