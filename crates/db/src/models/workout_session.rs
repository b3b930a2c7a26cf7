//! Workout session row and DTOs.

use forgefit_core::error::CoreError;
use forgefit_core::types::{DbId, Timestamp};
use forgefit_core::workout::{SessionExercise, SessionStatus, WorkoutSession};
use serde::Deserialize;
use sqlx::types::Json;
use sqlx::FromRow;
use validator::Validate;

/// A row from the `workout_sessions` table.
///
/// `status` is stored as text; [`WorkoutSessionRow::into_domain`] parses it.
#[derive(Debug, Clone, FromRow)]
pub struct WorkoutSessionRow {
    pub id: DbId,
    pub user_id: DbId,
    pub template_id: Option<DbId>,
    pub name: String,
    pub status: String,
    pub exercises: Json<Vec<SessionExercise>>,
    pub scheduled_for: Option<Timestamp>,
    pub started_at: Option<Timestamp>,
    pub completed_at: Option<Timestamp>,
    pub notes: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl WorkoutSessionRow {
    pub fn into_domain(self) -> Result<WorkoutSession, CoreError> {
        let status: SessionStatus = self.status.parse().map_err(|_| {
            CoreError::Internal(format!(
                "Session {} has unknown status '{}'",
                self.id, self.status
            ))
        })?;

        Ok(WorkoutSession {
            id: self.id,
            user_id: self.user_id,
            template_id: self.template_id,
            name: self.name,
            status,
            exercises: self.exercises.0,
            scheduled_for: self.scheduled_for,
            started_at: self.started_at,
            completed_at: self.completed_at,
            notes: self.notes,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// Insert DTO. Built by the API from a template, never deserialized directly.
#[derive(Debug, Clone)]
pub struct CreateWorkoutSession {
    pub user_id: DbId,
    pub template_id: Option<DbId>,
    pub name: String,
    pub status: SessionStatus,
    pub exercises: Vec<SessionExercise>,
    pub scheduled_for: Option<Timestamp>,
}

/// Explicit edit of a session. Applies to any status, including completed.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateWorkoutSession {
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,
    #[validate(length(max = 2000))]
    pub notes: Option<String>,
    pub scheduled_for: Option<Timestamp>,
    pub exercises: Option<Vec<SessionExercise>>,
}
