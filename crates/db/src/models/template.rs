//! Workout template models and DTOs.

use forgefit_core::types::{DbId, Timestamp};
use forgefit_core::workout::PlannedExercise;
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use validator::Validate;

/// A row from the `workout_templates` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct WorkoutTemplate {
    pub id: DbId,
    pub user_id: DbId,
    pub name: String,
    pub description: Option<String>,
    pub exercises: Json<Vec<PlannedExercise>>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a template.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateTemplate {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[validate(length(max = 1000))]
    pub description: Option<String>,
    #[validate(length(min = 1, max = 30), nested)]
    pub exercises: Vec<PlannedExercise>,
}

/// DTO for updating a template. All fields are optional.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateTemplate {
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,
    #[validate(length(max = 1000))]
    pub description: Option<String>,
    #[validate(length(min = 1, max = 30), nested)]
    pub exercises: Option<Vec<PlannedExercise>>,
}
