//! Calendar feed.
//!
//! Unlike the rest of the API this endpoint answers with a flat
//! `{ success, sessions, count }` body, and failures with
//! `{ success: false, error }`.

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use forgefit_core::calendar::{project, CalendarEvent};
use serde::Serialize;

use crate::error::AppError;
use crate::middleware::auth::AuthUser;
use crate::query::StatusParams;
use crate::state::AppState;

pub const CALENDAR_FAILED_MESSAGE: &str = "Failed to fetch workout sessions";

#[derive(Debug, Serialize)]
pub struct CalendarResponse {
    pub success: bool,
    pub sessions: Vec<CalendarEvent>,
    pub count: usize,
}

#[derive(Debug, Serialize)]
pub struct CalendarErrorResponse {
    pub success: bool,
    pub error: &'static str,
}

impl CalendarResponse {
    pub fn new(sessions: Vec<CalendarEvent>) -> Self {
        Self {
            success: true,
            count: sessions.len(),
            sessions,
        }
    }
}

/// GET /api/v1/calendar?status=
///
/// An unknown status is a 400 in the standard error format; storage
/// failures are the 500 calendar error body.
pub async fn get_calendar(
    auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<StatusParams>,
) -> Result<Response, AppError> {
    let filter = params.filter()?;

    match state.store.list_sessions(auth.user_id, filter).await {
        Ok(sessions) => {
            let events = project(&sessions, filter);
            tracing::debug!(user_id = auth.user_id, count = events.len(), "Calendar projected");
            Ok(Json(CalendarResponse::new(events)).into_response())
        }
        Err(e) => {
            tracing::error!(user_id = auth.user_id, error = %e, "Calendar fetch failed");
            Ok(calendar_error().into_response())
        }
    }
}

fn calendar_error() -> (StatusCode, Json<CalendarErrorResponse>) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(CalendarErrorResponse {
            success: false,
            error: CALENDAR_FAILED_MESSAGE,
        }),
    )
}
