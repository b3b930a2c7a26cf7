//! Repository for the `exercises` table.
//!
//! Reads always see the built-in library (`user_id IS NULL`) plus the
//! caller's own custom entries. Writes only ever touch custom entries.

use forgefit_core::types::DbId;
use sqlx::PgPool;

use crate::models::exercise::{CreateExercise, Exercise, ExerciseFilter};

const COLUMNS: &str =
    "id, user_id, name, muscle_group, equipment, description, created_at, updated_at";

pub struct ExerciseRepo;

impl ExerciseRepo {
    /// Browse the library visible to `user_id`, ordered by muscle group then name.
    pub async fn list(
        pool: &PgPool,
        user_id: DbId,
        filter: &ExerciseFilter,
    ) -> Result<Vec<Exercise>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM exercises
             WHERE (user_id IS NULL OR user_id = $1)
               AND ($2::TEXT IS NULL OR muscle_group = $2)
               AND ($3::TEXT IS NULL OR name ILIKE '%' || $3 || '%')
             ORDER BY muscle_group, name"
        );
        sqlx::query_as::<_, Exercise>(&query)
            .bind(user_id)
            .bind(&filter.muscle_group)
            .bind(&filter.search)
            .fetch_all(pool)
            .await
    }

    pub async fn find_by_id(
        pool: &PgPool,
        user_id: DbId,
        id: DbId,
    ) -> Result<Option<Exercise>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM exercises
             WHERE id = $1 AND (user_id IS NULL OR user_id = $2)"
        );
        sqlx::query_as::<_, Exercise>(&query)
            .bind(id)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    /// Add a custom exercise owned by `user_id`.
    pub async fn create(
        pool: &PgPool,
        user_id: DbId,
        input: &CreateExercise,
    ) -> Result<Exercise, sqlx::Error> {
        let query = format!(
            "INSERT INTO exercises (user_id, name, muscle_group, equipment, description)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Exercise>(&query)
            .bind(user_id)
            .bind(&input.name)
            .bind(&input.muscle_group)
            .bind(&input.equipment)
            .bind(&input.description)
            .fetch_one(pool)
            .await
    }

    /// Delete a custom exercise. Built-in entries are never deleted.
    ///
    /// Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, user_id: DbId, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM exercises WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
