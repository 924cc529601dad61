//! Workout statistics returned to the dashboard.
//!
//! Both summaries are computed on request from the workout log; nothing is
//! stored.

use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Consecutive-day training streaks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct StreakSummary {
    /// Run of trained days ending today or yesterday (0 if broken)
    pub current: u32,
    /// Longest run of trained days anywhere in the log
    pub best: u32,
}

/// Training totals for the trailing week.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct WeeklySummary {
    /// Distinct days with a `trained` entry
    pub trained_days: u32,
    /// Trained minutes as hours, one decimal place
    pub total_hours: f64,
}
