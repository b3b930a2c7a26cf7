//! Repository for the `workout_templates` table.

use forgefit_core::types::DbId;
use sqlx::types::Json;
use sqlx::PgPool;

use crate::models::template::{CreateTemplate, UpdateTemplate, WorkoutTemplate};

const COLUMNS: &str = "id, user_id, name, description, exercises, created_at, updated_at";

pub struct TemplateRepo;

impl TemplateRepo {
    pub async fn create(
        pool: &PgPool,
        user_id: DbId,
        input: &CreateTemplate,
    ) -> Result<WorkoutTemplate, sqlx::Error> {
        let query = format!(
            "INSERT INTO workout_templates (user_id, name, description, exercises)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, WorkoutTemplate>(&query)
            .bind(user_id)
            .bind(&input.name)
            .bind(&input.description)
            .bind(Json(&input.exercises))
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(
        pool: &PgPool,
        user_id: DbId,
        id: DbId,
    ) -> Result<Option<WorkoutTemplate>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM workout_templates WHERE id = $1 AND user_id = $2");
        sqlx::query_as::<_, WorkoutTemplate>(&query)
            .bind(id)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    /// List a user's templates, most recently updated first.
    pub async fn list(pool: &PgPool, user_id: DbId) -> Result<Vec<WorkoutTemplate>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM workout_templates
             WHERE user_id = $1
             ORDER BY updated_at DESC"
        );
        sqlx::query_as::<_, WorkoutTemplate>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    /// Update a template. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no row with the given `id` exists for the user.
    pub async fn update(
        pool: &PgPool,
        user_id: DbId,
        id: DbId,
        input: &UpdateTemplate,
    ) -> Result<Option<WorkoutTemplate>, sqlx::Error> {
        let query = format!(
            "UPDATE workout_templates SET
                name = COALESCE($3, name),
                description = COALESCE($4, description),
                exercises = COALESCE($5, exercises)
             WHERE id = $1 AND user_id = $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, WorkoutTemplate>(&query)
            .bind(id)
            .bind(user_id)
            .bind(&input.name)
            .bind(&input.description)
            .bind(input.exercises.as_ref().map(Json))
            .fetch_optional(pool)
            .await
    }

    /// Delete a template. Sessions spawned from it keep their data.
    pub async fn delete(pool: &PgPool, user_id: DbId, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM workout_templates WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
