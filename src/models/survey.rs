//! Onboarding survey answers.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Number of questions in the onboarding survey.
pub const SURVEY_QUESTION_COUNT: usize = 10;

/// Answers keyed by `question1` .. `question10`.
///
/// Stored once per user (document ID is the user ID).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SurveyResponse {
    pub user_id: String,
    pub answers: BTreeMap<String, String>,
    pub created_at: String,
}

/// Whether `key` names one of the survey questions.
pub fn is_question_key(key: &str) -> bool {
    key.strip_prefix("question")
        .and_then(|n| n.parse::<usize>().ok())
        .is_some_and(|n| (1..=SURVEY_QUESTION_COUNT).contains(&n))
}
