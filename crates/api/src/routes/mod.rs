pub mod auth;
pub mod calendar;
pub mod exercises;
pub mod health;
pub mod notifications;
pub mod sessions;
pub mod templates;
pub mod user;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/register                                   create account (public)
/// /auth/login                                      login (public)
/// /auth/refresh                                    refresh (public)
/// /auth/logout                                     logout (requires auth)
///
/// /user/me                                         current user
///
/// /exercises                                       list, create
/// /exercises/{id}                                  get, delete (own only)
///
/// /templates                                       list, create
/// /templates/{id}                                  get, update, delete
/// /templates/{id}/start                            start a live session (POST)
/// /templates/{id}/schedule                         plan a session (POST)
///
/// /sessions                                        list (?status=)
/// /sessions/{id}                                   get, update, delete (?confirmed=)
/// /sessions/{id}/start                             start a planned session (POST)
/// /sessions/{id}/sets                              record a set (PUT)
/// /sessions/{id}/exercises/{index}                 effort, notes, completion (PUT)
/// /sessions/{id}/complete                          complete (POST, confirmed body)
/// /sessions/{id}/live                              abandon without saving (DELETE)
///
/// /calendar                                        calendar events (?status=)
///
/// /notifications                                   unread notifications
/// /notifications/read                              mark all read (POST)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/user", user::router())
        .nest("/exercises", exercises::router())
        .nest("/templates", templates::router())
        .nest("/sessions", sessions::router())
        .nest("/calendar", calendar::router())
        .nest("/notifications", notifications::router())
}
