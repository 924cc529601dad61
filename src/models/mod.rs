// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models for the application.

pub mod diet;
pub mod routine;
pub mod stats;
pub mod survey;
pub mod user;
pub mod workout;

pub use diet::DietEntry;
pub use routine::{Exercise, ExerciseType, Routine};
pub use stats::{StreakSummary, WeeklySummary};
pub use survey::SurveyResponse;
pub use user::{Theme, User};
pub use workout::{MalformedEntry, WorkoutEntry, WorkoutRecord, WorkoutType};
