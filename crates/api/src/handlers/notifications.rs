//! Handlers for the user's in-app notifications.

use axum::extract::{Query, State};
use axum::Json;
use forgefit_db::models::notification::Notification;
use forgefit_db::repositories::NotificationRepo;
use serde::Serialize;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::query::LimitParams;
use crate::response::DataResponse;
use crate::state::AppState;

const DEFAULT_LIMIT: i64 = 50;
const MAX_LIMIT: i64 = 200;

#[derive(Debug, Serialize)]
pub struct MarkReadResponse {
    pub marked: u64,
}

/// GET /api/v1/notifications?limit=
///
/// Unread notifications, newest first.
pub async fn list_unread(
    auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<LimitParams>,
) -> AppResult<Json<DataResponse<Vec<Notification>>>> {
    let limit = params.clamped(DEFAULT_LIMIT, MAX_LIMIT);
    let notifications = NotificationRepo::list_unread(&state.pool, auth.user_id, limit).await?;
    Ok(Json(DataResponse {
        data: notifications,
    }))
}

/// POST /api/v1/notifications/read
pub async fn mark_all_read(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<MarkReadResponse>>> {
    let marked = NotificationRepo::mark_all_read(&state.pool, auth.user_id).await?;
    tracing::debug!(user_id = auth.user_id, marked, "Notifications marked read");
    Ok(Json(DataResponse {
        data: MarkReadResponse { marked },
    }))
}
