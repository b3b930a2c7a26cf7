//! Handlers for workout templates and instantiating sessions from them.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use forgefit_core::error::CoreError;
use forgefit_core::types::{DbId, Timestamp};
use forgefit_core::workout::{instantiate_exercises, SessionStatus, WorkoutSession};
use forgefit_db::models::template::{CreateTemplate, UpdateTemplate, WorkoutTemplate};
use forgefit_db::models::workout_session::CreateWorkoutSession;
use forgefit_db::repositories::{TemplateRepo, WorkoutSessionRepo};
use forgefit_events::bus::SESSION_STARTED;
use forgefit_events::WorkoutEvent;
use serde::Deserialize;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ScheduleRequest {
    pub scheduled_for: Timestamp,
}

// ---------------------------------------------------------------------------
// CRUD
// ---------------------------------------------------------------------------

/// GET /api/v1/templates
pub async fn list_templates(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<WorkoutTemplate>>>> {
    let templates = TemplateRepo::list(&state.pool, auth.user_id).await?;
    Ok(Json(DataResponse { data: templates }))
}

/// POST /api/v1/templates
pub async fn create_template(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateTemplate>,
) -> AppResult<(StatusCode, Json<DataResponse<WorkoutTemplate>>)> {
    input.validate()?;

    let template = TemplateRepo::create(&state.pool, auth.user_id, &input).await?;
    tracing::info!(
        user_id = auth.user_id,
        template_id = template.id,
        exercises = template.exercises.len(),
        "Template created"
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: template })))
}

/// GET /api/v1/templates/{id}
pub async fn get_template(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<WorkoutTemplate>>> {
    let template = find_template(&state, auth.user_id, id).await?;
    Ok(Json(DataResponse { data: template }))
}

/// PUT /api/v1/templates/{id}
pub async fn update_template(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateTemplate>,
) -> AppResult<Json<DataResponse<WorkoutTemplate>>> {
    input.validate()?;

    let template = TemplateRepo::update(&state.pool, auth.user_id, id, &input)
        .await?
        .ok_or_else(|| template_not_found(id))?;
    tracing::info!(user_id = auth.user_id, template_id = id, "Template updated");

    Ok(Json(DataResponse { data: template }))
}

/// DELETE /api/v1/templates/{id}
pub async fn delete_template(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if !TemplateRepo::delete(&state.pool, auth.user_id, id).await? {
        return Err(template_not_found(id));
    }
    tracing::info!(user_id = auth.user_id, template_id = id, "Template deleted");
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Instantiation
// ---------------------------------------------------------------------------

/// POST /api/v1/templates/{id}/start
///
/// Create an in-progress session from the template and make it live.
pub async fn start_from_template(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<(StatusCode, Json<DataResponse<WorkoutSession>>)> {
    let template = find_template(&state, auth.user_id, id).await?;
    let session = instantiate(&state, &template, SessionStatus::InProgress, None).await?;

    state.live_sessions.open(&session).await?;
    state
        .event_bus
        .publish(WorkoutEvent::new(SESSION_STARTED, auth.user_id).with_session(session.id));
    tracing::info!(
        user_id = auth.user_id,
        template_id = id,
        session_id = session.id,
        "Session started from template"
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: session })))
}

/// POST /api/v1/templates/{id}/schedule
///
/// Create a planned session for a future date.
pub async fn schedule_from_template(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<ScheduleRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<WorkoutSession>>)> {
    let template = find_template(&state, auth.user_id, id).await?;
    let session = instantiate(
        &state,
        &template,
        SessionStatus::Planned,
        Some(input.scheduled_for),
    )
    .await?;
    tracing::info!(
        user_id = auth.user_id,
        template_id = id,
        session_id = session.id,
        scheduled_for = %input.scheduled_for,
        "Session scheduled"
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: session })))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn template_not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "WorkoutTemplate",
        id,
    })
}

async fn find_template(state: &AppState, user_id: DbId, id: DbId) -> AppResult<WorkoutTemplate> {
    TemplateRepo::find_by_id(&state.pool, user_id, id)
        .await?
        .ok_or_else(|| template_not_found(id))
}

async fn instantiate(
    state: &AppState,
    template: &WorkoutTemplate,
    status: SessionStatus,
    scheduled_for: Option<Timestamp>,
) -> AppResult<WorkoutSession> {
    let input = CreateWorkoutSession {
        user_id: template.user_id,
        template_id: Some(template.id),
        name: template.name.clone(),
        status,
        exercises: instantiate_exercises(&template.exercises),
        scheduled_for,
    };
    let row = WorkoutSessionRepo::create(&state.pool, &input).await?;
    Ok(row.into_domain()?)
}
