// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! API routes for authenticated users: profile, survey, diet and routines.

use crate::error::{AppError, Result};
use crate::middleware::auth::AuthUser;
use crate::models::survey::{is_question_key, SURVEY_QUESTION_COUNT};
use crate::models::{DietEntry, Exercise, Routine, SurveyResponse, Theme, User};
use crate::routes::{parse_date_param, SuccessResponse};
use crate::time_utils::now_rfc3339;
use crate::AppState;
use axum::{
    extract::{Path, State},
    routing::{get, post, put},
    Extension, Json, Router,
};
use chrono::NaiveDate;
use serde::Deserialize;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;
use validator::{Validate, ValidationError};

const MAX_MEAL_LEN: u64 = 2000;
const MAX_ANSWER_LEN: usize = 200;

/// API routes (require authentication via JWT).
/// The auth middleware is applied in routes/mod.rs for these routes.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/auth/user", get(get_me))
        .route("/api/user/preferences", put(update_preferences))
        .route("/api/survey", get(get_survey).post(submit_survey))
        .route("/api/diet", post(save_diet))
        .route("/api/diet/{date}", get(get_diet))
        .route("/api/routines", get(list_routines).post(create_routine))
        .route(
            "/api/routines/{id}",
            put(update_routine).delete(delete_routine),
        )
}

// ─── User Profile ────────────────────────────────────────────

/// Load the user's profile, creating it on first access.
async fn load_or_create_user(state: &AppState, user_id: &str) -> Result<User> {
    if let Some(profile) = state.db.get_user(user_id).await? {
        return Ok(profile);
    }

    let profile = User::new(user_id, &now_rfc3339());
    state.db.upsert_user(&profile).await?;
    tracing::info!(user_id = %user_id, "Created profile for first-time user");

    Ok(profile)
}

/// Get current user profile.
async fn get_me(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<User>> {
    Ok(Json(load_or_create_user(&state, &user.user_id).await?))
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct PreferencesRequest {
    pub current_theme: Option<Theme>,
    pub dark_mode: Option<bool>,
    pub notifications_enabled: Option<bool>,
    #[validate(length(min = 1, max = 50))]
    pub mascot_name: Option<String>,
}

/// Update theme, dark mode, notifications and mascot name.
async fn update_preferences(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(body): Json<PreferencesRequest>,
) -> Result<Json<User>> {
    body.validate()?;

    let mut profile = load_or_create_user(&state, &user.user_id).await?;
    if let Some(theme) = body.current_theme {
        profile.current_theme = theme;
    }
    if let Some(dark_mode) = body.dark_mode {
        profile.dark_mode = dark_mode;
    }
    if let Some(enabled) = body.notifications_enabled {
        profile.notifications_enabled = enabled;
    }
    if let Some(name) = body.mascot_name {
        profile.mascot_name = name.trim().to_string();
    }
    profile.updated_at = now_rfc3339();

    state.db.upsert_user(&profile).await?;

    tracing::info!(user_id = %user.user_id, "Preferences updated");

    Ok(Json(profile))
}

// ─── Onboarding Survey ───────────────────────────────────────

#[derive(Debug, Deserialize, Validate)]
pub struct SurveyRequest {
    #[validate(custom(function = "validate_answers"))]
    pub answers: BTreeMap<String, String>,
}

fn validate_answers(
    answers: &BTreeMap<String, String>,
) -> std::result::Result<(), ValidationError> {
    if answers.len() != SURVEY_QUESTION_COUNT || !answers.keys().all(|k| is_question_key(k)) {
        return Err(ValidationError::new("survey_questions"));
    }
    if answers
        .values()
        .any(|v| v.trim().is_empty() || v.len() > MAX_ANSWER_LEN)
    {
        return Err(ValidationError::new("survey_answer_length"));
    }
    Ok(())
}

async fn get_survey(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<Option<SurveyResponse>>> {
    Ok(Json(state.db.get_survey_response(&user.user_id).await?))
}

/// Store the onboarding answers and mark onboarding as completed.
async fn submit_survey(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(body): Json<SurveyRequest>,
) -> Result<Json<SurveyResponse>> {
    body.validate()?;

    let now = now_rfc3339();
    let response = SurveyResponse {
        user_id: user.user_id.clone(),
        answers: body.answers,
        created_at: now.clone(),
    };
    state.db.set_survey_response(&response).await?;

    let mut profile = load_or_create_user(&state, &user.user_id).await?;
    profile.complete_onboarding(&now);
    state.db.upsert_user(&profile).await?;

    tracing::info!(user_id = %user.user_id, "Onboarding survey completed");

    Ok(Json(response))
}

// ─── Diet ────────────────────────────────────────────────────

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct DietRequest {
    pub date: NaiveDate,
    #[validate(length(max = MAX_MEAL_LEN))]
    pub breakfast: Option<String>,
    #[validate(length(max = MAX_MEAL_LEN))]
    pub lunch: Option<String>,
    #[validate(length(max = MAX_MEAL_LEN))]
    pub dinner: Option<String>,
    #[validate(length(max = MAX_MEAL_LEN))]
    pub snacks: Option<String>,
    #[serde(default)]
    #[validate(range(max = 50))]
    pub water_intake: u32,
}

/// Get the diet entry for a day (`null` if nothing was logged).
async fn get_diet(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(date): Path<String>,
) -> Result<Json<Option<DietEntry>>> {
    let date = parse_date_param("date", &date)?;
    Ok(Json(state.db.get_diet_entry(&user.user_id, date).await?))
}

/// Create or replace the diet entry for a day.
async fn save_diet(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(body): Json<DietRequest>,
) -> Result<Json<DietEntry>> {
    body.validate()?;

    let now = now_rfc3339();
    let created_at = state
        .db
        .get_diet_entry(&user.user_id, body.date)
        .await?
        .map(|existing| existing.created_at)
        .unwrap_or_else(|| now.clone());

    let entry = DietEntry {
        id: DietEntry::document_id(&user.user_id, body.date),
        user_id: user.user_id.clone(),
        date: body.date,
        breakfast: body.breakfast,
        lunch: body.lunch,
        dinner: body.dinner,
        snacks: body.snacks,
        water_intake: body.water_intake,
        created_at,
        updated_at: now,
    };
    state.db.set_diet_entry(&entry).await?;

    tracing::info!(user_id = %user.user_id, date = %entry.date, "Diet saved");

    Ok(Json(entry))
}

// ─── Routines ────────────────────────────────────────────────

fn validate_days_of_week(days: &[u8]) -> std::result::Result<(), ValidationError> {
    let unique: BTreeSet<u8> = days.iter().copied().collect();
    if unique.len() != days.len() || days.iter().any(|&d| d > 6) {
        return Err(ValidationError::new("days_of_week"));
    }
    Ok(())
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RoutineRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[validate(length(max = 1000))]
    pub description: Option<String>,
    #[serde(default)]
    #[validate(length(max = 50), nested)]
    pub exercises: Vec<Exercise>,
    /// Total minutes; derived from the exercises when omitted
    pub duration: Option<u32>,
    #[serde(default)]
    #[validate(custom(function = "validate_days_of_week"))]
    pub days_of_week: Vec<u8>,
    #[serde(default)]
    pub is_active: bool,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRoutineRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,
    #[validate(length(max = 1000))]
    pub description: Option<String>,
    #[validate(length(max = 50), nested)]
    pub exercises: Option<Vec<Exercise>>,
    pub duration: Option<u32>,
    #[validate(custom(function = "validate_days_of_week"))]
    pub days_of_week: Option<Vec<u8>>,
    pub is_active: Option<bool>,
}

fn total_duration(exercises: &[Exercise]) -> u32 {
    exercises.iter().map(|e| e.duration).sum()
}

async fn list_routines(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<Vec<Routine>>> {
    Ok(Json(state.db.list_routines(&user.user_id).await?))
}

async fn create_routine(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(body): Json<RoutineRequest>,
) -> Result<Json<Routine>> {
    body.validate()?;

    let now = now_rfc3339();
    let duration = body
        .duration
        .unwrap_or_else(|| total_duration(&body.exercises));
    let routine = Routine {
        id: uuid::Uuid::new_v4().to_string(),
        user_id: user.user_id.clone(),
        name: body.name,
        description: body.description,
        exercises: body.exercises,
        duration,
        days_of_week: body.days_of_week,
        is_active: body.is_active,
        created_at: now.clone(),
        updated_at: now,
    };
    state.db.set_routine(&routine).await?;

    tracing::info!(user_id = %user.user_id, routine_id = %routine.id, "Routine created");

    Ok(Json(routine))
}

/// Load a routine by ID, hiding routines owned by other users.
async fn load_owned_routine(state: &AppState, user: &AuthUser, id: &str) -> Result<Routine> {
    match state.db.get_routine(id).await? {
        Some(routine) if routine.user_id == user.user_id => Ok(routine),
        _ => Err(AppError::NotFound(format!("Routine {} not found", id))),
    }
}

async fn update_routine(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
    Json(body): Json<UpdateRoutineRequest>,
) -> Result<Json<Routine>> {
    body.validate()?;

    let mut routine = load_owned_routine(&state, &user, &id).await?;

    if let Some(name) = body.name {
        routine.name = name;
    }
    if let Some(description) = body.description {
        routine.description = Some(description);
    }
    if let Some(exercises) = body.exercises {
        if body.duration.is_none() {
            routine.duration = total_duration(&exercises);
        }
        routine.exercises = exercises;
    }
    if let Some(duration) = body.duration {
        routine.duration = duration;
    }
    if let Some(days) = body.days_of_week {
        routine.days_of_week = days;
    }
    if let Some(is_active) = body.is_active {
        routine.is_active = is_active;
    }
    routine.updated_at = now_rfc3339();

    state.db.set_routine(&routine).await?;

    tracing::info!(user_id = %user.user_id, routine_id = %id, "Routine updated");

    Ok(Json(routine))
}

async fn delete_routine(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Result<Json<SuccessResponse>> {
    load_owned_routine(&state, &user, &id).await?;
    state.db.delete_routine(&id).await?;

    tracing::info!(user_id = %user.user_id, routine_id = %id, "Routine deleted");

    Ok(Json(SuccessResponse { success: true }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ExerciseType;

    fn full_survey() -> BTreeMap<String, String> {
        (1..=SURVEY_QUESTION_COUNT)
            .map(|n| (format!("question{}", n), "answer".to_string()))
            .collect()
    }

    #[test]
    fn test_survey_requires_all_questions() {
        assert!(validate_answers(&full_survey()).is_ok());

        let mut missing = full_survey();
        missing.remove("question10");
        assert!(validate_answers(&missing).is_err());

        let mut extra = full_survey();
        extra.remove("question10");
        extra.insert("favoriteColor".to_string(), "green".to_string());
        assert!(validate_answers(&extra).is_err());

        let mut blank = full_survey();
        blank.insert("question3".to_string(), "  ".to_string());
        assert!(validate_answers(&blank).is_err());
    }

    #[test]
    fn test_days_of_week_validation() {
        assert!(validate_days_of_week(&[0, 1, 3, 6]).is_ok());
        assert!(validate_days_of_week(&[]).is_ok());
        assert!(validate_days_of_week(&[7]).is_err());
        assert!(validate_days_of_week(&[1, 1]).is_err());
    }

    #[test]
    fn test_routine_request_validates_exercises() {
        let body: RoutineRequest = serde_json::from_value(serde_json::json!({
            "name": "Morning",
            "exercises": [
                { "name": "Run", "duration": 20, "type": "cardio" },
                { "name": "", "duration": 10, "type": "strength" }
            ],
            "daysOfWeek": [1, 3, 5]
        }))
        .unwrap();
        assert!(body.validate().is_err());
    }

    #[test]
    fn test_total_duration() {
        let exercises = vec![
            Exercise {
                name: "Run".to_string(),
                description: None,
                duration: 20,
                exercise_type: ExerciseType::Cardio,
            },
            Exercise {
                name: "Stretch".to_string(),
                description: Some("Hamstrings".to_string()),
                duration: 10,
                exercise_type: ExerciseType::Flexibility,
            },
        ];
        assert_eq!(total_duration(&exercises), 30);
    }
}
