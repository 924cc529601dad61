// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Streak and weekly statistics over a user's workout log.
//!
//! Pure functions of their input: records may arrive in any order, may
//! repeat a date, and may be malformed. Malformed records are skipped,
//! duplicate dates count once, and dates after `as_of` are ignored.

use chrono::{Days, NaiveDate};
use std::collections::BTreeMap;

use crate::models::{StreakSummary, WeeklySummary, WorkoutEntry, WorkoutRecord, WorkoutType};

/// Days before `as_of` included in the weekly window (inclusive on both ends).
pub const WEEKLY_WINDOW_DAYS: u64 = 7;

/// Compute current and best trained streaks as of `as_of`.
pub fn compute_streak(records: &[WorkoutRecord], as_of: NaiveDate) -> StreakSummary {
    let days = trained_days(records, None, as_of);

    // Most recent first.
    let dates: Vec<NaiveDate> = days.into_keys().rev().collect();

    let current = current_run(&dates, as_of);
    let best = best_run(&dates).max(current);

    StreakSummary { current, best }
}

/// Compute trained days and hours in `[as_of - 7 days, as_of]`.
pub fn compute_weekly_stats(records: &[WorkoutRecord], as_of: NaiveDate) -> WeeklySummary {
    let window_start = weekly_window_start(as_of);
    let days = trained_days(records, Some(window_start), as_of);

    let total_minutes: u64 = days.values().map(|&minutes| u64::from(minutes)).sum();

    WeeklySummary {
        trained_days: days.len() as u32,
        total_hours: minutes_to_hours(total_minutes),
    }
}

/// First day of the weekly window ending at `as_of`.
pub fn weekly_window_start(as_of: NaiveDate) -> NaiveDate {
    as_of
        .checked_sub_days(Days::new(WEEKLY_WINDOW_DAYS))
        .unwrap_or(NaiveDate::MIN)
}

/// Distinct trained dates in `[from, as_of]` with the minutes recorded for each.
///
/// When a date has several trained records the longest duration wins, so the
/// result does not depend on record order.
fn trained_days(
    records: &[WorkoutRecord],
    from: Option<NaiveDate>,
    as_of: NaiveDate,
) -> BTreeMap<NaiveDate, u32> {
    let mut days = BTreeMap::new();
    let mut skipped = 0usize;

    for record in records {
        let entry = match WorkoutEntry::try_from(record) {
            Ok(entry) => entry,
            Err(e) => {
                tracing::debug!(id = ?record.id, error = %e, "Skipping malformed workout record");
                skipped += 1;
                continue;
            }
        };

        if entry.workout_type != WorkoutType::Trained
            || entry.date > as_of
            || from.is_some_and(|start| entry.date < start)
        {
            continue;
        }

        let minutes = days.entry(entry.date).or_insert(0);
        *minutes = (*minutes).max(entry.duration);
    }

    if skipped > 0 {
        tracing::warn!(skipped, "Ignored malformed workout records");
    }

    days
}

/// Run length anchored at the most recent date, if that date is `as_of` or
/// the day before. `dates` must be distinct and sorted descending.
fn current_run(dates: &[NaiveDate], as_of: NaiveDate) -> u32 {
    let Some(&latest) = dates.first() else {
        return 0;
    };

    if (as_of - latest).num_days() > 1 {
        return 0;
    }

    let consecutive = dates
        .windows(2)
        .take_while(|pair| (pair[0] - pair[1]).num_days() == 1)
        .count();

    consecutive as u32 + 1
}

/// Longest run of consecutive dates. `dates` must be distinct and sorted
/// descending.
fn best_run(dates: &[NaiveDate]) -> u32 {
    if dates.is_empty() {
        return 0;
    }

    let mut best = 1;
    let mut run = 1;
    for pair in dates.windows(2) {
        if (pair[0] - pair[1]).num_days() == 1 {
            run += 1;
            best = best.max(run);
        } else {
            run = 1;
        }
    }
    best
}

/// Minutes to hours rounded to one decimal place, half away from zero.
fn minutes_to_hours(minutes: u64) -> f64 {
    // minutes / 60 * 10 == minutes / 6
    (minutes as f64 / 6.0).round() / 10.0
}
