//! Handlers for workout sessions: listing, explicit edits, live progress
//! recording, completion and deletion.
//!
//! Progress endpoints go through the live-session registry so every edit
//! re-arms the autosave timer. Completion and deletion run through the core
//! [`CompletionController`] with the request's `confirmed` flag as the
//! confirmer.

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use forgefit_core::completion::{
    CompletionController, CompletionOutcome, Confirmation, DeletionOutcome,
};
use forgefit_core::error::CoreError;
use forgefit_core::types::DbId;
use forgefit_core::workout::{ActualSet, SessionExercise, SessionStatus, WorkoutSession};
use forgefit_db::models::workout_session::UpdateWorkoutSession;
use forgefit_db::repositories::WorkoutSessionRepo;
use forgefit_events::bus::{SESSION_COMPLETED, SESSION_DELETED, SESSION_STARTED};
use forgefit_events::WorkoutEvent;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::engine::{BusNotifier, ResponseNavigator};
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::query::StatusParams;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Body of `PUT /sessions/{id}/sets`.
#[derive(Debug, Deserialize, Validate)]
pub struct RecordSetRequest {
    pub exercise_index: usize,
    /// Zero-based; bounded by `MAX_SETS_PER_EXERCISE`.
    #[validate(range(max = 49))]
    pub set_index: usize,
    #[validate(range(max = 1000))]
    pub reps: Option<u32>,
    #[validate(range(min = 0.0, max = 2000.0))]
    pub weight: Option<f64>,
    pub completed: Option<bool>,
}

/// Body of `PUT /sessions/{id}/exercises/{index}`. Absent fields are left alone.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateExerciseRequest {
    pub effort: Option<f64>,
    #[validate(length(max = 2000))]
    pub notes: Option<String>,
    #[serde(default)]
    pub mark_complete: bool,
}

/// `confirmed` flag for irreversible actions. Missing means not confirmed.
#[derive(Debug, Default, Deserialize)]
pub struct ConfirmParams {
    #[serde(default)]
    pub confirmed: bool,
}

#[derive(Debug, Serialize)]
pub struct LiveProgressResponse<T: Serialize> {
    pub session_id: DbId,
    pub result: T,
    pub revision: u64,
    pub autosave_pending: bool,
}

/// Result of a confirmed-or-declined action.
#[derive(Debug, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ActionResponse {
    Completed {
        redirect_to: String,
        refresh: bool,
        session: WorkoutSession,
    },
    Deleted {
        redirect_to: String,
        refresh: bool,
    },
    Declined,
}

// ---------------------------------------------------------------------------
// Reads and explicit edits
// ---------------------------------------------------------------------------

/// GET /api/v1/sessions?status=
pub async fn list_sessions(
    auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<StatusParams>,
) -> AppResult<Json<DataResponse<Vec<WorkoutSession>>>> {
    let filter = params.filter()?;
    let sessions = state.store.list_sessions(auth.user_id, filter).await?;
    Ok(Json(DataResponse { data: sessions }))
}

/// GET /api/v1/sessions/{id}
///
/// A live session reports its in-memory progress, including edits the
/// autosave has not written yet.
pub async fn get_session(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<WorkoutSession>>> {
    let mut session = find_session(&state, auth.user_id, id).await?;

    if let Some(live) = state.live_sessions.get(auth.user_id, id).await {
        session.exercises = live.lock().await.exercises().to_vec();
    }

    Ok(Json(DataResponse { data: session }))
}

/// PUT /api/v1/sessions/{id}
///
/// Explicit edit, allowed in any status. Replacing the exercise list
/// supersedes the live context: its autosave is held during the write and the
/// context is torn down once the write succeeds. A failed write keeps it live.
pub async fn update_session(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateWorkoutSession>,
) -> AppResult<Json<DataResponse<WorkoutSession>>> {
    input.validate()?;

    let pool = &state.pool;
    let user_id = auth.user_id;
    let input = &input;
    let write = move || async move {
        WorkoutSessionRepo::update(pool, user_id, id, input)
            .await
            .map_err(AppError::from)
            .and_then(|row| row.ok_or_else(|| session_not_found(id)))
    };

    let row = if input.exercises.is_some() {
        state.live_sessions.teardown_after(user_id, id, write).await?
    } else {
        write().await?
    };
    tracing::info!(user_id, session_id = id, "Session edited");

    Ok(Json(DataResponse {
        data: row.into_domain()?,
    }))
}

/// POST /api/v1/sessions/{id}/start
///
/// Move a planned session to in-progress and make it live.
pub async fn start_session(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<WorkoutSession>>> {
    let session = find_session(&state, auth.user_id, id).await?;
    session
        .status
        .validate_transition(SessionStatus::InProgress)
        .map_err(CoreError::Conflict)?;

    state
        .store
        .update_session_status(auth.user_id, id, SessionStatus::InProgress)
        .await?;
    let session = find_session(&state, auth.user_id, id).await?;

    state.live_sessions.open(&session).await?;
    state
        .event_bus
        .publish(WorkoutEvent::new(SESSION_STARTED, auth.user_id).with_session(id));
    tracing::info!(user_id = auth.user_id, session_id = id, "Planned session started");

    Ok(Json(DataResponse { data: session }))
}

// ---------------------------------------------------------------------------
// Live progress
// ---------------------------------------------------------------------------

/// PUT /api/v1/sessions/{id}/sets
///
/// Record reps/weight for a set (creating it if needed) and optionally flag
/// it completed. Schedules an autosave.
pub async fn record_set(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<RecordSetRequest>,
) -> AppResult<Json<DataResponse<LiveProgressResponse<ActualSet>>>> {
    input.validate()?;

    let live = state.live_sessions.get_or_load(auth.user_id, id).await?;
    let mut live = live.lock().await;

    let mut set = live.record_set(
        input.exercise_index,
        input.set_index,
        input.reps,
        input.weight,
    )?;
    if let Some(completed) = input.completed {
        live.set_set_completed(input.exercise_index, input.set_index, completed)?;
        set.completed = completed;
    }

    tracing::debug!(
        user_id = auth.user_id,
        session_id = id,
        exercise_index = input.exercise_index,
        set_index = input.set_index,
        "Set recorded"
    );

    let snapshot = live.snapshot();
    Ok(Json(DataResponse {
        data: LiveProgressResponse {
            session_id: id,
            result: set,
            revision: snapshot.revision,
            autosave_pending: live.has_pending_save(),
        },
    }))
}

/// PUT /api/v1/sessions/{id}/exercises/{index}
///
/// Update effort, notes and the completion flag of one exercise.
pub async fn update_exercise(
    auth: AuthUser,
    State(state): State<AppState>,
    Path((id, index)): Path<(DbId, usize)>,
    Json(input): Json<UpdateExerciseRequest>,
) -> AppResult<Json<DataResponse<LiveProgressResponse<SessionExercise>>>> {
    input.validate()?;

    let live = state.live_sessions.get_or_load(auth.user_id, id).await?;
    let mut live = live.lock().await;

    if let Some(effort) = input.effort {
        live.set_effort(index, Some(effort))?;
    }
    if let Some(notes) = input.notes {
        live.set_notes(index, notes)?;
    }
    if input.mark_complete {
        live.mark_exercise_complete(index)?;
    }

    let exercise = live
        .exercises()
        .get(index)
        .cloned()
        .ok_or_else(|| CoreError::Validation(format!("Exercise index {index} out of range")))?;

    let snapshot = live.snapshot();
    Ok(Json(DataResponse {
        data: LiveProgressResponse {
            session_id: id,
            result: exercise,
            revision: snapshot.revision,
            autosave_pending: live.has_pending_save(),
        },
    }))
}

/// DELETE /api/v1/sessions/{id}/live
///
/// Leave the session without saving. Edits inside the quiet period are lost.
pub async fn abandon_live_session(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if state.live_sessions.teardown(auth.user_id, id).await {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(session_not_found(id))
    }
}

// ---------------------------------------------------------------------------
// Completion and deletion
// ---------------------------------------------------------------------------

/// POST /api/v1/sessions/{id}/complete
///
/// Body: `{ "confirmed": true }`. Without confirmation nothing changes and the
/// outcome is `declined`. A failed write answers 500 and leaves the session
/// live and in progress.
pub async fn complete_session(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(params): Json<ConfirmParams>,
) -> AppResult<Json<DataResponse<ActionResponse>>> {
    let confirmed = params.confirmed;

    let live = state.live_sessions.get_or_load(auth.user_id, id).await?;
    let navigator = Arc::new(ResponseNavigator::default());
    let controller = controller(&state, auth.user_id, id, Arc::clone(&navigator));

    let outcome = {
        let mut live = live.lock().await;
        controller.complete(&mut live, &Confirmation(confirmed)).await?
    };

    match outcome {
        CompletionOutcome::Declined => Ok(Json(DataResponse {
            data: ActionResponse::Declined,
        })),
        CompletionOutcome::Completed { redirect_to } => {
            state.live_sessions.teardown(auth.user_id, id).await;
            state
                .event_bus
                .publish(WorkoutEvent::new(SESSION_COMPLETED, auth.user_id).with_session(id));

            let session = find_session(&state, auth.user_id, id).await?;
            let nav = navigator.take();
            Ok(Json(DataResponse {
                data: ActionResponse::Completed {
                    redirect_to: nav.redirect_to.unwrap_or(redirect_to),
                    refresh: nav.refresh,
                    session,
                },
            }))
        }
    }
}

/// DELETE /api/v1/sessions/{id}?confirmed=true
///
/// Deletes a session of any status. A confirmed delete holds the live
/// context's autosave during the write and drops the context once the row is
/// gone; if the delete fails the session stays live with its progress.
pub async fn delete_session(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Query(params): Query<ConfirmParams>,
) -> AppResult<Json<DataResponse<ActionResponse>>> {
    let navigator = Arc::new(ResponseNavigator::default());
    let controller = controller(&state, auth.user_id, id, Arc::clone(&navigator));
    let confirmation = Confirmation(params.confirmed);

    let outcome = if params.confirmed {
        state
            .live_sessions
            .teardown_after(auth.user_id, id, || {
                controller.delete(auth.user_id, id, &confirmation)
            })
            .await?
    } else {
        controller.delete(auth.user_id, id, &confirmation).await?
    };

    match outcome {
        DeletionOutcome::Declined => Ok(Json(DataResponse {
            data: ActionResponse::Declined,
        })),
        DeletionOutcome::Deleted { redirect_to } => {
            state
                .event_bus
                .publish(WorkoutEvent::new(SESSION_DELETED, auth.user_id).with_session(id));
            let nav = navigator.take();
            Ok(Json(DataResponse {
                data: ActionResponse::Deleted {
                    redirect_to: nav.redirect_to.unwrap_or(redirect_to),
                    refresh: nav.refresh,
                },
            }))
        }
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn session_not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "WorkoutSession",
        id,
    })
}

async fn find_session(state: &AppState, user_id: DbId, id: DbId) -> AppResult<WorkoutSession> {
    state
        .store
        .find_session(user_id, id)
        .await?
        .ok_or_else(|| session_not_found(id))
}

fn controller(
    state: &AppState,
    user_id: DbId,
    session_id: DbId,
    navigator: Arc<ResponseNavigator>,
) -> CompletionController {
    CompletionController::new(
        Arc::clone(&state.store),
        Arc::new(BusNotifier::new(Arc::clone(&state.event_bus), user_id).for_session(session_id)),
        navigator,
    )
}
