// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Workout log routes.

use crate::db::DateRange;
use crate::error::{AppError, Result};
use crate::middleware::auth::AuthUser;
use crate::models::{WorkoutEntry, WorkoutType};
use crate::routes::{parse_date_param, SuccessResponse};
use crate::time_utils::{is_future_date, now_rfc3339, today_utc};
use crate::AppState;
use axum::{
    extract::{Path, Query, State},
    routing::{get, post, put},
    Extension, Json, Router,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use validator::Validate;

/// Longest range the calendar may request at once.
const MAX_RANGE_DAYS: i64 = 366;
/// Upper bound on minutes logged for a single day.
const MAX_DURATION_MINUTES: u32 = 24 * 60;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/workouts", get(list_workouts).post(create_workout))
        .route("/api/workouts/cycle", post(cycle_workout))
        .route(
            "/api/workouts/{id}",
            put(update_workout).delete(delete_workout),
        )
}

// ─── Listing ─────────────────────────────────────────────────

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct WorkoutsQuery {
    start_date: Option<String>,
    end_date: Option<String>,
}

/// Validate the optional `startDate`/`endDate` pair.
fn parse_range(start: Option<&str>, end: Option<&str>) -> Result<Option<DateRange>> {
    let (start, end) = match (start, end) {
        (None, None) => return Ok(None),
        (Some(start), Some(end)) => (
            parse_date_param("startDate", start)?,
            parse_date_param("endDate", end)?,
        ),
        _ => {
            return Err(AppError::BadRequest(
                "'startDate' and 'endDate' must be given together".to_string(),
            ))
        }
    };

    if start > end {
        return Err(AppError::BadRequest(
            "'startDate' must not be after 'endDate'".to_string(),
        ));
    }
    if (end - start).num_days() > MAX_RANGE_DAYS {
        return Err(AppError::BadRequest(format!(
            "Date range must not exceed {} days",
            MAX_RANGE_DAYS
        )));
    }

    Ok(Some(DateRange { start, end }))
}

/// List the user's workout entries, newest first.
async fn list_workouts(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Query(params): Query<WorkoutsQuery>,
) -> Result<Json<Vec<WorkoutEntry>>> {
    let range = parse_range(params.start_date.as_deref(), params.end_date.as_deref())?;

    tracing::debug!(user_id = %user.user_id, ?range, "Fetching workouts");

    let records = state
        .db
        .list_workout_entries(&user.user_id, range)
        .await?;

    let entries = records
        .iter()
        .filter_map(|record| match WorkoutEntry::try_from(record) {
            Ok(entry) => Some(entry),
            Err(e) => {
                tracing::warn!(
                    user_id = %user.user_id,
                    id = ?record.id,
                    error = %e,
                    "Skipping malformed workout entry"
                );
                None
            }
        })
        .collect();

    Ok(Json(entries))
}

// ─── Create / Update / Delete ────────────────────────────────

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateWorkoutRequest {
    pub date: NaiveDate,
    #[serde(rename = "type")]
    pub workout_type: WorkoutType,
    #[validate(range(max = MAX_DURATION_MINUTES))]
    pub duration: Option<u32>,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateWorkoutRequest {
    #[serde(default, rename = "type")]
    pub workout_type: Option<WorkoutType>,
    #[validate(range(max = MAX_DURATION_MINUTES))]
    pub duration: Option<u32>,
}

fn reject_future_date(date: NaiveDate) -> Result<()> {
    if is_future_date(date, today_utc()) {
        return Err(AppError::BadRequest(
            "Cannot log workouts for future dates".to_string(),
        ));
    }
    Ok(())
}

/// Record the user's workout for a day, replacing any earlier entry.
async fn create_workout(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(body): Json<CreateWorkoutRequest>,
) -> Result<Json<WorkoutEntry>> {
    body.validate()?;
    reject_future_date(body.date)?;

    let entry = WorkoutEntry::new(
        &user.user_id,
        body.date,
        body.workout_type,
        body.duration,
        &now_rfc3339(),
    );
    let entry = state.db.upsert_workout_entry(&entry).await?;

    tracing::info!(
        user_id = %user.user_id,
        date = %entry.date,
        workout_type = entry.workout_type.as_str(),
        duration = entry.duration,
        "Workout logged"
    );

    Ok(Json(entry))
}

/// Load an entry by ID, hiding entries owned by other users.
async fn load_owned_entry(state: &AppState, user: &AuthUser, id: &str) -> Result<WorkoutEntry> {
    match state.db.get_workout_entry(id).await? {
        Some(entry) if entry.user_id == user.user_id => Ok(entry),
        _ => Err(AppError::NotFound(format!("Workout entry {} not found", id))),
    }
}

/// Change the type or duration of an existing entry.
async fn update_workout(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
    Json(body): Json<UpdateWorkoutRequest>,
) -> Result<Json<WorkoutEntry>> {
    body.validate()?;

    let mut entry = load_owned_entry(&state, &user, &id).await?;

    if let Some(workout_type) = body.workout_type {
        if workout_type != entry.workout_type && body.duration.is_none() {
            entry.duration = workout_type.default_duration();
        }
        entry.workout_type = workout_type;
    }
    if let Some(duration) = body.duration {
        entry.duration = duration;
    }

    state.db.set_workout_entry(&entry).await?;

    tracing::info!(user_id = %user.user_id, id = %id, "Workout updated");

    Ok(Json(entry))
}

async fn delete_workout(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Result<Json<SuccessResponse>> {
    load_owned_entry(&state, &user, &id).await?;
    state.db.delete_workout_entry(&id).await?;

    tracing::info!(user_id = %user.user_id, id = %id, "Workout deleted");

    Ok(Json(SuccessResponse { success: true }))
}

// ─── Calendar Cycle ──────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct CycleWorkoutRequest {
    pub date: NaiveDate,
}

#[derive(Debug, Serialize)]
pub struct CycleWorkoutResponse {
    /// The day's entry after cycling; `None` once cleared
    pub entry: Option<WorkoutEntry>,
}

/// Advance a day through absent → trained → rested → absent.
async fn cycle_workout(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(body): Json<CycleWorkoutRequest>,
) -> Result<Json<CycleWorkoutResponse>> {
    reject_future_date(body.date)?;

    let entry = state
        .db
        .cycle_workout_entry(&user.user_id, body.date, &now_rfc3339())
        .await?;

    tracing::info!(
        user_id = %user.user_id,
        date = %body.date,
        state = entry.as_ref().map_or("absent", |e| e.workout_type.as_str()),
        "Workout day cycled"
    );

    Ok(Json(CycleWorkoutResponse { entry }))
}
