// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! API input validation tests.
//!
//! Every rejection here must happen before the database is touched: the
//! test app runs with an offline database, which would answer 500.

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use chrono::{Days, Utc};
use serde_json::{json, Value};
use tower::ServiceExt;

mod common;

async fn send(method: &str, uri: &str, body: Option<Value>) -> StatusCode {
    let (app, state) = common::create_test_app();
    let token = common::create_test_jwt("user-1", &state.config.jwt_signing_key);

    let builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {}", token));

    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    app.oneshot(request).await.unwrap().status()
}

fn days_from_today(days: u64) -> String {
    Utc::now()
        .date_naive()
        .checked_add_days(Days::new(days))
        .unwrap()
        .to_string()
}

#[tokio::test]
async fn test_stats_invalid_as_of() {
    for uri in [
        "/api/stats/streak?asOf=yesterday",
        "/api/stats/weekly?asOf=2024-02-30",
    ] {
        assert_eq!(send("GET", uri, None).await, StatusCode::BAD_REQUEST, "{}", uri);
    }
}

#[tokio::test]
async fn test_stats_future_as_of() {
    let uri = format!("/api/stats/streak?asOf={}", days_from_today(5));
    assert_eq!(send("GET", &uri, None).await, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_workouts_incomplete_range() {
    let status = send("GET", "/api/workouts?startDate=2024-01-01", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_workouts_inverted_range() {
    let status = send(
        "GET",
        "/api/workouts?startDate=2024-02-01&endDate=2024-01-01",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_create_workout_in_future() {
    let body = json!({ "date": days_from_today(3), "type": "trained" });
    let status = send("POST", "/api/workouts", Some(body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_cycle_workout_in_future() {
    let body = json!({ "date": days_from_today(3) });
    let status = send("POST", "/api/workouts/cycle", Some(body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_create_workout_duration_too_long() {
    let body = json!({ "date": "2024-01-15", "type": "trained", "duration": 5000 });
    let status = send("POST", "/api/workouts", Some(body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_create_workout_unknown_type() {
    let body = json!({ "date": "2024-01-15", "type": "napped" });
    let status = send("POST", "/api/workouts", Some(body)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_incomplete_survey() {
    let body = json!({ "answers": { "question1": "Salud" } });
    let status = send("POST", "/api/survey", Some(body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_diet_invalid_date() {
    let status = send("GET", "/api/diet/today", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_diet_too_much_water() {
    let body = json!({ "date": "2024-01-15", "waterIntake": 500 });
    let status = send("POST", "/api/diet", Some(body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_routine_invalid_days() {
    let body = json!({ "name": "Morning", "daysOfWeek": [1, 9] });
    let status = send("POST", "/api/routines", Some(body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_preferences_empty_mascot_name() {
    let body = json!({ "mascotName": "" });
    let status = send("PUT", "/api/user/preferences", Some(body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_valid_request_reaches_database() {
    // Offline database: a well-formed request fails only at the storage layer.
    let status = send("GET", "/api/stats/weekly?asOf=2024-01-15", None).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
}
