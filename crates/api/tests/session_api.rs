//! HTTP-level tests for templates, live sessions, completion, deletion and
//! the calendar feed.

mod common;

use std::time::Duration;

use axum::http::StatusCode;
use axum::Router;
use common::{body_json, delete_auth, get_auth, post_json_auth, put_json_auth, register};
use serde_json::json;
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn create_template(app: Router, token: &str) -> i64 {
    let response = post_json_auth(
        app,
        "/api/v1/templates",
        token,
        json!({
            "name": "Leg Day",
            "description": "Heavy lower body",
            "exercises": [
                {
                    "exercise_id": null,
                    "name": "Back Squat",
                    "muscle_group": "legs",
                    "target_sets": 3,
                    "target_reps": 5,
                    "target_weight": 100.0,
                    "rest_secs": 180
                },
                {
                    "exercise_id": null,
                    "name": "Walking Lunge",
                    "muscle_group": "legs",
                    "target_sets": 3,
                    "target_reps": 10,
                    "target_weight": null,
                    "rest_secs": 90
                }
            ]
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["data"]["id"].as_i64().unwrap()
}

async fn start_session(app: Router, token: &str, template_id: i64) -> i64 {
    let response = post_json_auth(
        app,
        &format!("/api/v1/templates/{template_id}/start"),
        token,
        json!({}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["data"]["status"], "in-progress");
    json["data"]["id"].as_i64().unwrap()
}

async fn record_set(app: Router, token: &str, session_id: i64, set_index: usize) {
    let response = put_json_auth(
        app,
        &format!("/api/v1/sessions/{session_id}/sets"),
        token,
        json!({
            "exercise_index": 0,
            "set_index": set_index,
            "reps": 5,
            "weight": 100.0,
            "completed": true
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
}

async fn stored_sets(pool: &PgPool, session_id: i64) -> usize {
    let exercises: serde_json::Value =
        sqlx::query_scalar("SELECT exercises FROM workout_sessions WHERE id = $1")
            .bind(session_id)
            .fetch_one(pool)
            .await
            .unwrap();
    exercises[0]["actual_sets"].as_array().map_or(0, Vec::len)
}

// ---------------------------------------------------------------------------
// Live progress and completion
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
#[ignore = "requires DATABASE_URL"]
async fn workout_flow_autosaves_then_completes(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let token = register(app.clone(), "lifter").await;
    let template_id = create_template(app.clone(), &token).await;
    let session_id = start_session(app.clone(), &token, template_id).await;

    record_set(app.clone(), &token, session_id, 0).await;
    record_set(app.clone(), &token, session_id, 1).await;
    assert_eq!(stored_sets(&pool, session_id).await, 0);

    // Test config uses a 200 ms quiet period.
    tokio::time::sleep(Duration::from_millis(600)).await;
    assert_eq!(stored_sets(&pool, session_id).await, 2);

    record_set(app.clone(), &token, session_id, 2).await;

    let response = post_json_auth(
        app.clone(),
        &format!("/api/v1/sessions/{session_id}/complete"),
        &token,
        json!({ "confirmed": true }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["outcome"], "completed");
    assert_eq!(json["data"]["redirect_to"], format!("/sessions/{session_id}"));
    assert_eq!(json["data"]["session"]["status"], "completed");
    assert!(json["data"]["session"]["completed_at"].is_string());
    assert_eq!(stored_sets(&pool, session_id).await, 3);

    let health = body_json(common::get(app, "/health").await).await;
    assert_eq!(health["live_sessions"], 0);
}

#[sqlx::test(migrations = "../db/migrations")]
#[ignore = "requires DATABASE_URL"]
async fn unconfirmed_completion_changes_nothing(pool: PgPool) {
    let app = common::build_test_app(pool);
    let token = register(app.clone(), "hesitant").await;
    let template_id = create_template(app.clone(), &token).await;
    let session_id = start_session(app.clone(), &token, template_id).await;

    let response = post_json_auth(
        app.clone(),
        &format!("/api/v1/sessions/{session_id}/complete"),
        &token,
        json!({ "confirmed": false }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["outcome"], "declined");

    let response = get_auth(app, &format!("/api/v1/sessions/{session_id}"), &token).await;
    assert_eq!(body_json(response).await["data"]["status"], "in-progress");
}

#[sqlx::test(migrations = "../db/migrations")]
#[ignore = "requires DATABASE_URL"]
async fn abandoned_session_discards_pending_edits(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let token = register(app.clone(), "quitter").await;
    let template_id = create_template(app.clone(), &token).await;
    let session_id = start_session(app.clone(), &token, template_id).await;

    record_set(app.clone(), &token, session_id, 0).await;
    let response = delete_auth(
        app.clone(),
        &format!("/api/v1/sessions/{session_id}/live"),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    tokio::time::sleep(Duration::from_millis(600)).await;
    assert_eq!(stored_sets(&pool, session_id).await, 0);
}

#[sqlx::test(migrations = "../db/migrations")]
#[ignore = "requires DATABASE_URL"]
async fn sessions_are_private_to_their_owner(pool: PgPool) {
    let app = common::build_test_app(pool);
    let owner = register(app.clone(), "owner").await;
    let other = register(app.clone(), "intruder").await;
    let template_id = create_template(app.clone(), &owner).await;
    let session_id = start_session(app.clone(), &owner, template_id).await;

    let response = get_auth(app.clone(), &format!("/api/v1/sessions/{session_id}"), &other).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = put_json_auth(
        app,
        &format!("/api/v1/sessions/{session_id}/sets"),
        &other,
        json!({ "exercise_index": 0, "set_index": 0, "reps": 1 }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../db/migrations")]
#[ignore = "requires DATABASE_URL"]
async fn set_index_past_the_limit_is_rejected(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let token = register(app.clone(), "overreacher").await;
    let template_id = create_template(app.clone(), &token).await;
    let session_id = start_session(app.clone(), &token, template_id).await;
    let uri = format!("/api/v1/sessions/{session_id}/sets");

    for set_index in [50u64, 5_000_000, u64::MAX] {
        let response = put_json_auth(
            app.clone(),
            &uri,
            &token,
            json!({ "exercise_index": 0, "set_index": set_index, "reps": 5 }),
        )
        .await;
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    // The last allowed index still works and fills the gap before it.
    record_set(app, &token, session_id, 49).await;
    tokio::time::sleep(Duration::from_millis(600)).await;
    assert_eq!(stored_sets(&pool, session_id).await, 50);
}

// ---------------------------------------------------------------------------
// Deletion
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
#[ignore = "requires DATABASE_URL"]
async fn delete_requires_confirmation(pool: PgPool) {
    let app = common::build_test_app(pool);
    let token = register(app.clone(), "cleaner").await;
    let template_id = create_template(app.clone(), &token).await;
    let session_id = start_session(app.clone(), &token, template_id).await;
    let uri = format!("/api/v1/sessions/{session_id}");

    let response = delete_auth(app.clone(), &uri, &token).await;
    assert_eq!(body_json(response).await["data"]["outcome"], "declined");

    let response = delete_auth(app.clone(), &format!("{uri}?confirmed=true"), &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["outcome"], "deleted");
    assert_eq!(json["data"]["redirect_to"], "/sessions");

    let response = get_auth(app, &uri, &token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Calendar
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
#[ignore = "requires DATABASE_URL"]
async fn calendar_filters_by_status(pool: PgPool) {
    let app = common::build_test_app(pool);
    let token = register(app.clone(), "planner").await;
    let template_id = create_template(app.clone(), &token).await;

    let done = start_session(app.clone(), &token, template_id).await;
    post_json_auth(
        app.clone(),
        &format!("/api/v1/sessions/{done}/complete"),
        &token,
        json!({ "confirmed": true }),
    )
    .await;
    start_session(app.clone(), &token, template_id).await;
    let response = post_json_auth(
        app.clone(),
        &format!("/api/v1/templates/{template_id}/schedule"),
        &token,
        json!({ "scheduled_for": "2030-01-06T17:00:00Z" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let all = body_json(get_auth(app.clone(), "/api/v1/calendar", &token).await).await;
    assert_eq!(all["success"], true);
    assert_eq!(all["count"], 3);

    let completed =
        body_json(get_auth(app.clone(), "/api/v1/calendar?status=completed", &token).await).await;
    assert_eq!(completed["count"], 1);
    assert_eq!(completed["sessions"][0]["id"], done);
    assert_eq!(completed["sessions"][0]["title"], "Leg Day (2 exercises)");

    let planned =
        body_json(get_auth(app.clone(), "/api/v1/calendar?status=planned", &token).await).await;
    assert_eq!(planned["count"], 1);
    assert_eq!(planned["sessions"][0]["start"], "2030-01-06T17:00:00Z");

    let response = get_auth(app, "/api/v1/calendar?status=paused", &token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
