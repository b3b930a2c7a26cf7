//! Exercise library models and DTOs.

use forgefit_core::types::{DbId, Timestamp};
use forgefit_core::workout::validate_muscle_group_field;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A row from the `exercises` table.
///
/// `user_id` is `None` for built-in library entries.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Exercise {
    pub id: DbId,
    pub user_id: Option<DbId>,
    pub name: String,
    pub muscle_group: String,
    pub equipment: Option<String>,
    pub description: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Exercise {
    pub fn is_builtin(&self) -> bool {
        self.user_id.is_none()
    }
}

/// DTO for adding a custom exercise to a user's library.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateExercise {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[validate(custom(function = "validate_muscle_group_field"))]
    pub muscle_group: String,
    #[validate(length(max = 50))]
    pub equipment: Option<String>,
    #[validate(length(max = 1000))]
    pub description: Option<String>,
}

/// Library browse filters (`?muscle_group=&search=`).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExerciseFilter {
    pub muscle_group: Option<String>,
    /// Case-insensitive substring match on the name.
    pub search: Option<String>,
}
