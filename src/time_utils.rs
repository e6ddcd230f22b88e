// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Shared helpers for calendar days, Sunday-start weeks and date formatting.
//!
//! Harvest dates travel as UTC timestamps but are compared by calendar day.
//! Weeks always run Sunday through Saturday, regardless of locale.

use chrono::{DateTime, Datelike, Days, NaiveDate, SecondsFormat, Utc};
use serde::Serialize;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Years accepted in client-supplied dates.
const YEAR_RANGE: std::ops::RangeInclusive<i32> = 1..=9999;

/// Inclusive calendar bounds of one Sunday-start week.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct WeekBounds {
    /// Sunday
    pub start: NaiveDate,
    /// Following Saturday
    pub end: NaiveDate,
}

/// Sunday-to-Saturday week containing `date`.
pub fn week_bounds(date: NaiveDate) -> WeekBounds {
    let back = Days::new(u64::from(date.weekday().num_days_from_sunday()));
    let start = date.checked_sub_days(back).unwrap_or(NaiveDate::MIN);
    WeekBounds {
        start,
        end: week_end(start),
    }
}

/// Saturday closing the week that starts on `start`, clamped to the
/// calendar's last day.
pub fn week_end(start: NaiveDate) -> NaiveDate {
    start.checked_add_days(Days::new(6)).unwrap_or(NaiveDate::MAX)
}

/// Inclusive membership test on calendar days.
pub fn is_within_week(date: NaiveDate, start: NaiveDate, end: NaiveDate) -> bool {
    start <= date && date <= end
}

/// Calendar day (UTC) of a timestamp.
pub fn calendar_day(date: DateTime<Utc>) -> NaiveDate {
    date.date_naive()
}

/// Parse a harvest date given either as `YYYY-MM-DD` (midnight UTC) or as
/// an RFC3339 timestamp. Years outside 1..=9999 are rejected.
pub fn parse_harvest_date(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    let parsed = match NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        Ok(day) => day.and_hms_opt(0, 0, 0).map(|dt| dt.and_utc()),
        Err(_) => DateTime::parse_from_rfc3339(raw)
            .ok()
            .map(|dt| dt.with_timezone(&Utc)),
    };
    parsed.filter(|dt| YEAR_RANGE.contains(&dt.year()))
}

/// Parse a calendar day from the same inputs accepted by [`parse_harvest_date`].
pub fn parse_day(raw: &str) -> Option<NaiveDate> {
    parse_harvest_date(raw).map(calendar_day)
}

/// Format a UTC timestamp as RFC3339 using a `Z` suffix.
pub fn format_utc_rfc3339(date: DateTime<Utc>) -> String {
    date.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Format a timestamp's calendar day as `YYYY-MM-DD`.
pub fn format_day(date: DateTime<Utc>) -> String {
    calendar_day(date).format("%Y-%m-%d").to_string()
}
