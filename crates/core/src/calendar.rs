//! Projection of workout sessions into calendar events.
//!
//! Pure data transform; ordering and view modes belong to the client.

use chrono::Duration;
use serde::Serialize;

use crate::types::{DbId, Timestamp};
use crate::workout::{SessionStatus, StatusFilter, WorkoutSession};

/// Length given to events that have no meaningful end instant.
pub const DEFAULT_EVENT_DURATION_MINS: i64 = 60;

/// A session as displayed on the calendar.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CalendarEvent {
    pub id: DbId,
    pub title: String,
    pub start: Timestamp,
    pub end: Timestamp,
    /// Drives color-coding on the client.
    pub status: SessionStatus,
}

impl CalendarEvent {
    pub fn from_session(session: &WorkoutSession) -> Self {
        let start = session
            .started_at
            .or(session.scheduled_for)
            .unwrap_or(session.created_at);

        let end = match (session.status, session.completed_at) {
            (SessionStatus::Completed, Some(done)) if done > start => done,
            _ => start + Duration::minutes(DEFAULT_EVENT_DURATION_MINS),
        };

        let title = match session.exercises.len() {
            1 => format!("{} (1 exercise)", session.name),
            n => format!("{} ({n} exercises)", session.name),
        };

        Self {
            id: session.id,
            title,
            start,
            end,
            status: session.status,
        }
    }
}

/// Map the sessions accepted by `filter` to calendar events.
pub fn project(sessions: &[WorkoutSession], filter: StatusFilter) -> Vec<CalendarEvent> {
    sessions
        .iter()
        .filter(|s| filter.matches(s.status))
        .map(CalendarEvent::from_session)
        .collect()
}
