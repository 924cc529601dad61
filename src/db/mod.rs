//! Database layer (Firestore).

pub mod firestore;

pub use firestore::{DateRange, FirestoreDb};

/// Collection names as constants.
pub mod collections {
    pub const USERS: &str = "users";
    /// Daily workout log, keyed by `{user_id}_{date}`
    pub const WORKOUT_ENTRIES: &str = "workout_entries";
    /// Daily diet log, keyed by `{user_id}_{date}`
    pub const DIET_ENTRIES: &str = "diet_entries";
    pub const ROUTINES: &str = "routines";
    /// Onboarding survey answers (keyed by user_id)
    pub const SURVEY_RESPONSES: &str = "survey_responses";
}
