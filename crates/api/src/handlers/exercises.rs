//! Handlers for the exercise library.
//!
//! Built-in entries are shared by everyone; custom entries belong to a user
//! and are the only ones that can be deleted.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use forgefit_core::error::CoreError;
use forgefit_core::types::DbId;
use forgefit_db::models::exercise::{CreateExercise, Exercise, ExerciseFilter};
use forgefit_db::repositories::ExerciseRepo;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/exercises?muscle_group=&search=
pub async fn list_exercises(
    auth: AuthUser,
    State(state): State<AppState>,
    Query(filter): Query<ExerciseFilter>,
) -> AppResult<Json<DataResponse<Vec<Exercise>>>> {
    let exercises = ExerciseRepo::list(&state.pool, auth.user_id, &filter).await?;
    Ok(Json(DataResponse { data: exercises }))
}

/// POST /api/v1/exercises
pub async fn create_exercise(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateExercise>,
) -> AppResult<(StatusCode, Json<DataResponse<Exercise>>)> {
    input.validate()?;

    let exercise = ExerciseRepo::create(&state.pool, auth.user_id, &input).await?;
    tracing::info!(
        user_id = auth.user_id,
        exercise_id = exercise.id,
        muscle_group = %exercise.muscle_group,
        "Custom exercise created"
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: exercise })))
}

/// GET /api/v1/exercises/{id}
pub async fn get_exercise(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Exercise>>> {
    let exercise = ExerciseRepo::find_by_id(&state.pool, auth.user_id, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Exercise",
            id,
        }))?;
    Ok(Json(DataResponse { data: exercise }))
}

/// DELETE /api/v1/exercises/{id}
///
/// Built-in entries answer 409; unknown ids answer 404.
pub async fn delete_exercise(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if ExerciseRepo::delete(&state.pool, auth.user_id, id).await? {
        tracing::info!(user_id = auth.user_id, exercise_id = id, "Custom exercise deleted");
        return Ok(StatusCode::NO_CONTENT);
    }

    match ExerciseRepo::find_by_id(&state.pool, auth.user_id, id).await? {
        Some(existing) if existing.is_builtin() => Err(AppError::Core(CoreError::Conflict(
            format!("Exercise {id} is part of the built-in library"),
        ))),
        _ => Err(AppError::Core(CoreError::NotFound {
            entity: "Exercise",
            id,
        })),
    }
}
