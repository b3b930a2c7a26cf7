//! Route definitions for the exercise library.

use axum::routing::get;
use axum::Router;

use crate::handlers::exercises;
use crate::state::AppState;

/// Routes mounted at `/exercises`.
///
/// ```text
/// GET    /      -> list_exercises (?muscle_group=&search=)
/// POST   /      -> create_exercise
/// GET    /{id}  -> get_exercise
/// DELETE /{id}  -> delete_exercise
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(exercises::list_exercises).post(exercises::create_exercise),
        )
        .route(
            "/{id}",
            get(exercises::get_exercise).delete(exercises::delete_exercise),
        )
}
