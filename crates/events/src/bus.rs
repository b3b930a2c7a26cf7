//! In-process event bus backed by a `tokio::sync::broadcast` channel.
//!
//! [`EventBus`] is shared via `Arc<EventBus>` across the application.

use chrono::{DateTime, Utc};
use forgefit_core::types::DbId;
use forgefit_db::models::notification::{LEVEL_ERROR, LEVEL_SUCCESS};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

pub const SESSION_STARTED: &str = "session.started";
pub const SESSION_COMPLETED: &str = "session.completed";
pub const SESSION_DELETED: &str = "session.deleted";
pub const USER_NOTIFICATION: &str = "user.notification";

// ---------------------------------------------------------------------------
// WorkoutEvent
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationLevel {
    Success,
    Error,
}

impl NotificationLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            NotificationLevel::Success => LEVEL_SUCCESS,
            NotificationLevel::Error => LEVEL_ERROR,
        }
    }
}

/// A message meant for the user, persisted until read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserNotification {
    pub level: NotificationLevel,
    pub message: String,
}

/// Something that happened to a user's workouts.
///
/// Built with [`WorkoutEvent::new`] or [`WorkoutEvent::notification`] and
/// the `with_*` builder methods.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkoutEvent {
    /// Dot-separated event name, e.g. `"session.completed"`.
    pub event_type: String,
    pub user_id: DbId,
    pub session_id: Option<DbId>,
    /// Present when the event should surface to the user.
    pub notification: Option<UserNotification>,
    pub timestamp: DateTime<Utc>,
}

impl WorkoutEvent {
    pub fn new(event_type: impl Into<String>, user_id: DbId) -> Self {
        Self {
            event_type: event_type.into(),
            user_id,
            session_id: None,
            notification: None,
            timestamp: Utc::now(),
        }
    }

    /// A bare user notification event.
    pub fn notification(
        user_id: DbId,
        level: NotificationLevel,
        message: impl Into<String>,
    ) -> Self {
        Self::new(USER_NOTIFICATION, user_id).with_notification(level, message)
    }

    pub fn with_session(mut self, session_id: DbId) -> Self {
        self.session_id = Some(session_id);
        self
    }

    pub fn with_notification(mut self, level: NotificationLevel, message: impl Into<String>) -> Self {
        self.notification = Some(UserNotification {
            level,
            message: message.into(),
        });
        self
    }
}

// ---------------------------------------------------------------------------
// EventBus
// ---------------------------------------------------------------------------

const DEFAULT_CAPACITY: usize = 1024;

/// In-process fan-out event bus.
///
/// ```rust
/// use forgefit_events::bus::{EventBus, WorkoutEvent, SESSION_STARTED};
///
/// let bus = EventBus::default();
/// let mut rx = bus.subscribe();
///
/// bus.publish(WorkoutEvent::new(SESSION_STARTED, 1).with_session(7));
/// ```
pub struct EventBus {
    sender: broadcast::Sender<WorkoutEvent>,
}

impl EventBus {
    /// Create a bus with a specific channel capacity.
    ///
    /// Slow receivers observe `RecvError::Lagged` once the buffer wraps.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publish to all current subscribers. Dropped if nobody listens.
    pub fn publish(&self, event: WorkoutEvent) {
        let _ = self.sender.send(event);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<WorkoutEvent> {
        self.sender.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}
