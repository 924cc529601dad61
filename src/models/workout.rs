// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Daily workout log model for storage and API.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::time_utils::parse_iso_date;

/// Default minutes recorded for a `trained` day when the client omits it.
pub const DEFAULT_TRAINED_MINUTES: u32 = 30;

/// What the user did on a given day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkoutType {
    Trained,
    Rested,
}

impl WorkoutType {
    /// Duration stored when the client does not send one.
    pub fn default_duration(self) -> u32 {
        match self {
            WorkoutType::Trained => DEFAULT_TRAINED_MINUTES,
            WorkoutType::Rested => 0,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            WorkoutType::Trained => "trained",
            WorkoutType::Rested => "rested",
        }
    }
}

impl std::str::FromStr for WorkoutType {
    type Err = MalformedEntry;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "trained" => Ok(WorkoutType::Trained),
            "rested" => Ok(WorkoutType::Rested),
            other => Err(MalformedEntry::UnknownType(other.to_string())),
        }
    }
}

/// Next state of a calendar day in the log: absent → trained → rested → absent.
pub fn next_workout_state(current: Option<WorkoutType>) -> Option<WorkoutType> {
    match current {
        None => Some(WorkoutType::Trained),
        Some(WorkoutType::Trained) => Some(WorkoutType::Rested),
        Some(WorkoutType::Rested) => None,
    }
}

/// Workout log entry stored in Firestore.
///
/// Document ID is `{user_id}_{date}`, so there is at most one entry per
/// user and calendar day when written through this service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutEntry {
    /// Document ID
    pub id: String,
    /// Owner (subject of the session token)
    pub user_id: String,
    /// Calendar day this entry describes
    pub date: NaiveDate,
    #[serde(rename = "type")]
    pub workout_type: WorkoutType,
    /// Minutes trained
    pub duration: u32,
    /// When this entry was first written (RFC3339)
    pub created_at: String,
}

impl WorkoutEntry {
    /// Build a new entry for `user_id` on `date`.
    pub fn new(
        user_id: &str,
        date: NaiveDate,
        workout_type: WorkoutType,
        duration: Option<u32>,
        now: &str,
    ) -> Self {
        Self {
            id: Self::document_id(user_id, date),
            user_id: user_id.to_string(),
            date,
            workout_type,
            duration: duration.unwrap_or_else(|| workout_type.default_duration()),
            created_at: now.to_string(),
        }
    }

    pub fn document_id(user_id: &str, date: NaiveDate) -> String {
        format!("{}_{}", user_id, date)
    }

    /// Keep the creation time of the entry this one overwrites.
    pub fn replacing(mut self, existing: Option<&WorkoutEntry>) -> Self {
        if let Some(existing) = existing {
            self.created_at = existing.created_at.clone();
        }
        self
    }
}

/// Entry left for `user_id` on `date` after one calendar tap.
///
/// `None` means the day is cleared.
pub fn cycled_entry(
    existing: Option<&WorkoutEntry>,
    user_id: &str,
    date: NaiveDate,
    now: &str,
) -> Option<WorkoutEntry> {
    next_workout_state(existing.map(|e| e.workout_type)).map(|workout_type| {
        WorkoutEntry::new(user_id, date, workout_type, None, now).replacing(existing)
    })
}

/// Lenient view of a stored workout document.
///
/// Everything is optional so that one corrupt document does not fail a
/// whole query; conversion to [`WorkoutEntry`] decides what is usable.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutRecord {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default, rename = "type")]
    pub workout_type: Option<String>,
    #[serde(default)]
    pub duration: Option<i64>,
    #[serde(default)]
    pub created_at: Option<String>,
}

impl WorkoutRecord {
    /// Convenience constructor for a well-formed record.
    pub fn new(date: &str, workout_type: &str, duration: i64) -> Self {
        Self {
            date: Some(date.to_string()),
            workout_type: Some(workout_type.to_string()),
            duration: Some(duration),
            ..Default::default()
        }
    }
}

impl From<&WorkoutEntry> for WorkoutRecord {
    fn from(entry: &WorkoutEntry) -> Self {
        Self {
            id: Some(entry.id.clone()),
            user_id: Some(entry.user_id.clone()),
            date: Some(entry.date.to_string()),
            workout_type: Some(entry.workout_type.as_str().to_string()),
            duration: Some(i64::from(entry.duration)),
            created_at: Some(entry.created_at.clone()),
        }
    }
}

/// Why a stored record could not be used.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MalformedEntry {
    #[error("missing field: {0}")]
    MissingField(&'static str),

    #[error("invalid date: {0}")]
    InvalidDate(String),

    #[error("unknown workout type: {0}")]
    UnknownType(String),

    #[error("invalid duration: {0}")]
    InvalidDuration(i64),
}

impl TryFrom<&WorkoutRecord> for WorkoutEntry {
    type Error = MalformedEntry;

    fn try_from(record: &WorkoutRecord) -> Result<Self, Self::Error> {
        let raw_date = record
            .date
            .as_deref()
            .ok_or(MalformedEntry::MissingField("date"))?;
        let date =
            parse_iso_date(raw_date).ok_or_else(|| MalformedEntry::InvalidDate(raw_date.into()))?;

        let workout_type: WorkoutType = record
            .workout_type
            .as_deref()
            .ok_or(MalformedEntry::MissingField("type"))?
            .parse()?;

        let raw_duration = record
            .duration
            .ok_or(MalformedEntry::MissingField("duration"))?;
        let duration =
            u32::try_from(raw_duration).map_err(|_| MalformedEntry::InvalidDuration(raw_duration))?;

        let user_id = record.user_id.clone().unwrap_or_default();
        let id = record
            .id
            .clone()
            .unwrap_or_else(|| WorkoutEntry::document_id(&user_id, date));

        Ok(Self {
            id,
            user_id,
            date,
            workout_type,
            duration,
            created_at: record.created_at.clone().unwrap_or_default(),
        })
    }
}
