//! Daily diet log model.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// What the user ate on a given day.
///
/// Document ID is `{user_id}_{date}`; saving again for the same day
/// replaces the meals but keeps `created_at`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DietEntry {
    pub id: String,
    pub user_id: String,
    pub date: NaiveDate,
    #[serde(default)]
    pub breakfast: Option<String>,
    #[serde(default)]
    pub lunch: Option<String>,
    #[serde(default)]
    pub dinner: Option<String>,
    #[serde(default)]
    pub snacks: Option<String>,
    /// Glasses of water
    #[serde(default)]
    pub water_intake: u32,
    pub created_at: String,
    pub updated_at: String,
}

impl DietEntry {
    pub fn document_id(user_id: &str, date: NaiveDate) -> String {
        format!("{}_{}", user_id, date)
    }
}
