//! Route definitions for the `/templates` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::templates;
use crate::state::AppState;

/// Routes mounted at `/templates`.
///
/// ```text
/// GET    /               -> list_templates
/// POST   /               -> create_template
/// GET    /{id}           -> get_template
/// PUT    /{id}           -> update_template
/// DELETE /{id}           -> delete_template
/// POST   /{id}/start     -> start_from_template
/// POST   /{id}/schedule  -> schedule_from_template
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(templates::list_templates).post(templates::create_template),
        )
        .route(
            "/{id}",
            get(templates::get_template)
                .put(templates::update_template)
                .delete(templates::delete_template),
        )
        .route("/{id}/start", post(templates::start_from_template))
        .route("/{id}/schedule", post(templates::schedule_from_template))
}
