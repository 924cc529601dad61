//! Exercise routine model.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Kind of exercise within a routine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExerciseType {
    Cardio,
    Strength,
    Flexibility,
}

/// One exercise in a routine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct Exercise {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[serde(default)]
    #[validate(length(max = 1000))]
    pub description: Option<String>,
    /// Minutes
    #[validate(range(max = 600))]
    pub duration: u32,
    #[serde(rename = "type")]
    pub exercise_type: ExerciseType,
}

/// A weekly exercise routine stored in Firestore.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Routine {
    /// Document ID (UUID v4)
    pub id: String,
    pub user_id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub exercises: Vec<Exercise>,
    /// Total minutes
    #[serde(default)]
    pub duration: u32,
    /// Scheduled weekdays, 0 = Sunday
    #[serde(default)]
    pub days_of_week: Vec<u8>,
    #[serde(default)]
    pub is_active: bool,
    pub created_at: String,
    pub updated_at: String,
}
