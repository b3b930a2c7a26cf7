//! Route definitions for the `/sessions` resource.
//!
//! All endpoints require authentication.

use axum::routing::{delete, get, post, put};
use axum::Router;

use crate::handlers::sessions;
use crate::state::AppState;

/// Routes mounted at `/sessions`.
///
/// ```text
/// GET    /                        -> list_sessions (?status=)
/// GET    /{id}                    -> get_session
/// PUT    /{id}                    -> update_session
/// DELETE /{id}                    -> delete_session (?confirmed=)
/// POST   /{id}/start              -> start_session
/// PUT    /{id}/sets               -> record_set
/// PUT    /{id}/exercises/{index}  -> update_exercise
/// POST   /{id}/complete           -> complete_session
/// DELETE /{id}/live               -> abandon_live_session
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(sessions::list_sessions))
        .route(
            "/{id}",
            get(sessions::get_session)
                .put(sessions::update_session)
                .delete(sessions::delete_session),
        )
        .route("/{id}/start", post(sessions::start_session))
        .route("/{id}/sets", put(sessions::record_set))
        .route("/{id}/exercises/{index}", put(sessions::update_exercise))
        .route("/{id}/complete", post(sessions::complete_session))
        .route("/{id}/live", delete(sessions::abandon_live_session))
}
