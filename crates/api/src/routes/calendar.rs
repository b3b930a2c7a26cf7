use axum::routing::get;
use axum::Router;

use crate::handlers::calendar;
use crate::state::AppState;

/// Routes mounted at `/calendar`.
///
/// ```text
/// GET /  -> get_calendar (?status=)
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/", get(calendar::get_calendar))
}
