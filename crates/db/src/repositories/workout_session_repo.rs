//! Repository for the `workout_sessions` table.
//!
//! Every query is scoped by `user_id`; a session owned by someone else
//! behaves exactly like a missing one.

use forgefit_core::types::DbId;
use forgefit_core::workout::{SessionExercise, SessionStatus};
use sqlx::types::Json;
use sqlx::PgPool;

use crate::models::workout_session::{
    CreateWorkoutSession, UpdateWorkoutSession, WorkoutSessionRow,
};

const COLUMNS: &str = "id, user_id, template_id, name, status, exercises, scheduled_for, \
                        started_at, completed_at, notes, created_at, updated_at";

pub struct WorkoutSessionRepo;

impl WorkoutSessionRepo {
    /// Insert a session. In-progress sessions get `started_at = NOW()`.
    pub async fn create(
        pool: &PgPool,
        input: &CreateWorkoutSession,
    ) -> Result<WorkoutSessionRow, sqlx::Error> {
        let query = format!(
            "INSERT INTO workout_sessions
                (user_id, template_id, name, status, exercises, scheduled_for, started_at)
             VALUES ($1, $2, $3, $4, $5, $6,
                     CASE WHEN $4 = 'in-progress' THEN NOW() END)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, WorkoutSessionRow>(&query)
            .bind(input.user_id)
            .bind(input.template_id)
            .bind(&input.name)
            .bind(input.status.as_str())
            .bind(Json(&input.exercises))
            .bind(input.scheduled_for)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(
        pool: &PgPool,
        user_id: DbId,
        id: DbId,
    ) -> Result<Option<WorkoutSessionRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM workout_sessions WHERE id = $1 AND user_id = $2");
        sqlx::query_as::<_, WorkoutSessionRow>(&query)
            .bind(id)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    /// List a user's sessions, optionally restricted to one status.
    ///
    /// Ordered by the instant the session happened (or is planned for).
    pub async fn list(
        pool: &PgPool,
        user_id: DbId,
        status: Option<SessionStatus>,
    ) -> Result<Vec<WorkoutSessionRow>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM workout_sessions
             WHERE user_id = $1 AND ($2::TEXT IS NULL OR status = $2)
             ORDER BY COALESCE(started_at, scheduled_for, created_at) DESC, id DESC"
        );
        sqlx::query_as::<_, WorkoutSessionRow>(&query)
            .bind(user_id)
            .bind(status.map(|s| s.as_str()))
            .fetch_all(pool)
            .await
    }

    /// Explicit edit. Only non-`None` fields in `input` are applied.
    pub async fn update(
        pool: &PgPool,
        user_id: DbId,
        id: DbId,
        input: &UpdateWorkoutSession,
    ) -> Result<Option<WorkoutSessionRow>, sqlx::Error> {
        let query = format!(
            "UPDATE workout_sessions SET
                name = COALESCE($3, name),
                notes = COALESCE($4, notes),
                scheduled_for = COALESCE($5, scheduled_for),
                exercises = COALESCE($6, exercises)
             WHERE id = $1 AND user_id = $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, WorkoutSessionRow>(&query)
            .bind(id)
            .bind(user_id)
            .bind(&input.name)
            .bind(&input.notes)
            .bind(input.scheduled_for)
            .bind(input.exercises.as_ref().map(Json))
            .fetch_optional(pool)
            .await
    }

    /// Overwrite the exercise list. Last write wins.
    ///
    /// Returns `true` if the row was updated.
    pub async fn save_progress(
        pool: &PgPool,
        user_id: DbId,
        id: DbId,
        exercises: &[SessionExercise],
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE workout_sessions SET exercises = $3 WHERE id = $1 AND user_id = $2",
        )
        .bind(id)
        .bind(user_id)
        .bind(Json(exercises))
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Set the status, stamping `started_at` / `completed_at` on first entry.
    ///
    /// Returns `true` if the row was updated.
    pub async fn update_status(
        pool: &PgPool,
        user_id: DbId,
        id: DbId,
        status: SessionStatus,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE workout_sessions SET
                status = $3,
                started_at = CASE
                    WHEN $3 <> 'planned' THEN COALESCE(started_at, NOW())
                    ELSE started_at
                END,
                completed_at = CASE
                    WHEN $3 = 'completed' THEN COALESCE(completed_at, NOW())
                    ELSE NULL
                END
             WHERE id = $1 AND user_id = $2",
        )
        .bind(id)
        .bind(user_id)
        .bind(status.as_str())
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Delete a session. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, user_id: DbId, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM workout_sessions WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
