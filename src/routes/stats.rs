// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Streak and weekly statistics routes.

use crate::db::DateRange;
use crate::error::{AppError, Result};
use crate::middleware::auth::AuthUser;
use crate::models::{StreakSummary, WeeklySummary};
use crate::routes::parse_date_param;
use crate::services::stats::{compute_streak, compute_weekly_stats, weekly_window_start};
use crate::time_utils::{is_future_date, today_utc};
use crate::AppState;
use axum::{
    extract::{Query, State},
    routing::get,
    Extension, Json, Router,
};
use chrono::NaiveDate;
use serde::Deserialize;
use std::sync::Arc;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/stats/streak", get(get_streak))
        .route("/api/stats/weekly", get(get_weekly_stats))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct StatsQuery {
    /// Client's local date; defaults to today (UTC)
    as_of: Option<String>,
}

/// Resolve the day statistics are computed for.
fn resolve_as_of(raw: Option<&str>, today: NaiveDate) -> Result<NaiveDate> {
    let Some(raw) = raw else {
        return Ok(today);
    };

    let as_of = parse_date_param("asOf", raw)?;
    if is_future_date(as_of, today) {
        return Err(AppError::BadRequest(
            "Invalid 'asOf' parameter: date is in the future".to_string(),
        ));
    }
    Ok(as_of)
}

/// Current and best training streaks over the user's whole log.
async fn get_streak(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Query(params): Query<StatsQuery>,
) -> Result<Json<StreakSummary>> {
    let as_of = resolve_as_of(params.as_of.as_deref(), today_utc())?;

    let records = state.db.list_trained_entries(&user.user_id).await?;
    let summary = compute_streak(&records, as_of);

    tracing::debug!(
        user_id = %user.user_id,
        %as_of,
        records = records.len(),
        current = summary.current,
        best = summary.best,
        "Computed streak"
    );

    Ok(Json(summary))
}

/// Trained days and hours in the trailing week.
async fn get_weekly_stats(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Query(params): Query<StatsQuery>,
) -> Result<Json<WeeklySummary>> {
    let as_of = resolve_as_of(params.as_of.as_deref(), today_utc())?;
    let range = DateRange {
        start: weekly_window_start(as_of),
        end: as_of,
    };

    let records = state
        .db
        .list_workout_entries(&user.user_id, Some(range))
        .await?;
    let summary = compute_weekly_stats(&records, as_of);

    tracing::debug!(
        user_id = %user.user_id,
        %as_of,
        records = records.len(),
        trained_days = summary.trained_days,
        total_hours = summary.total_hours,
        "Computed weekly stats"
    );

    Ok(Json(summary))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_as_of_defaults_to_today() {
        let today = date(2024, 3, 15);
        assert_eq!(resolve_as_of(None, today).unwrap(), today);
    }

    #[test]
    fn test_as_of_accepts_past_and_next_day() {
        let today = date(2024, 3, 15);
        assert_eq!(
            resolve_as_of(Some("2024-01-01"), today).unwrap(),
            date(2024, 1, 1)
        );
        assert_eq!(
            resolve_as_of(Some("2024-03-16"), today).unwrap(),
            date(2024, 3, 16)
        );
    }

    #[test]
    fn test_as_of_rejects_invalid_input() {
        let today = date(2024, 3, 15);
        for raw in ["yesterday", "2024-13-01", "2024-03-20"] {
            let err = resolve_as_of(Some(raw), today).unwrap_err();
            assert!(matches!(err, AppError::BadRequest(_)), "{}", raw);
        }
    }
}
