// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Shared helpers for date/time handling.

use chrono::{DateTime, Days, NaiveDate, SecondsFormat, Utc};

/// Clients ahead of UTC may legitimately be on the next calendar day.
pub const MAX_CLIENT_DATE_LEAD_DAYS: u64 = 1;

/// Format a UTC timestamp as RFC3339 using a `Z` suffix.
pub fn format_utc_rfc3339(date: DateTime<Utc>) -> String {
    date.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Current timestamp in the stored RFC3339 format.
pub fn now_rfc3339() -> String {
    format_utc_rfc3339(Utc::now())
}

/// The server's current calendar date (UTC).
pub fn today_utc() -> NaiveDate {
    Utc::now().date_naive()
}

/// Parse a `YYYY-MM-DD` calendar date.
pub fn parse_iso_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").ok()
}

/// Whether `date` is later than any client's local "today" can be.
pub fn is_future_date(date: NaiveDate, today: NaiveDate) -> bool {
    match today.checked_add_days(Days::new(MAX_CLIENT_DATE_LEAD_DAYS)) {
        Some(latest) => date > latest,
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_iso_date() {
        assert_eq!(
            parse_iso_date("2024-03-01"),
            NaiveDate::from_ymd_opt(2024, 3, 1)
        );
        assert_eq!(parse_iso_date("2024-02-30"), None);
        assert_eq!(parse_iso_date("03/01/2024"), None);
        assert_eq!(parse_iso_date(""), None);
    }

    #[test]
    fn test_future_date_allows_one_day_lead() {
        let today = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        assert!(!is_future_date(today, today));
        assert!(!is_future_date(today.succ_opt().unwrap(), today));
        assert!(is_future_date(
            NaiveDate::from_ymd_opt(2024, 3, 3).unwrap(),
            today
        ));
    }
}
