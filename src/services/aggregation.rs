// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Weekly goal tracking and trend aggregation over log entries.
//!
//! All filtering uses the entry's harvest `date` (by calendar day), never
//! `created_at`.

use crate::models::{EggLogEntry, TotalCollections, TrendPoint, WeeklyStats};
use crate::time_utils::{is_within_week, week_bounds, week_end};
use crate::units::{grams_to_eggs, round_to};
use chrono::{Days, NaiveDate};
use std::collections::BTreeMap;

/// Default trend window when the caller gives no explicit range.
pub const DEFAULT_TREND_WEEKS: u32 = 4;

/// Summarize the week starting on `week_start` against `goal_grams`.
///
/// `week_start` should be a Sunday; the window is `[week_start, week_start + 6d]`.
pub fn weekly_stats(entries: &[EggLogEntry], week_start: NaiveDate, goal_grams: f64) -> WeeklyStats {
    let week_end = week_end(week_start);

    let daily_entries: Vec<EggLogEntry> = entries
        .iter()
        .filter(|e| is_within_week(e.harvest_day(), week_start, week_end))
        .cloned()
        .collect();

    let total_grams: f64 = daily_entries.iter().map(|e| e.grams_logged).sum();
    let total_eggs: i64 = daily_entries.iter().map(|e| e.egg_count).sum();

    let progress_percentage = if goal_grams > 0.0 {
        total_grams / goal_grams * 100.0
    } else {
        0.0
    };
    let difference = total_grams - goal_grams;

    WeeklyStats {
        week_start,
        week_end,
        total_grams: round_to(total_grams, 2),
        total_eggs,
        goal_grams,
        goal_eggs: grams_to_eggs(goal_grams),
        progress_percentage: round_to(progress_percentage, 1),
        is_ahead: difference >= 0.0,
        difference: round_to(difference.abs(), 2),
        daily_entries,
    }
}

/// Weekly stats for the Sunday-start week containing `day`.
pub fn weekly_stats_for_day(entries: &[EggLogEntry], day: NaiveDate, goal_grams: f64) -> WeeklyStats {
    weekly_stats(entries, week_bounds(day).start, goal_grams)
}

/// Daily totals between `start` and `end` (inclusive), ascending by day.
///
/// Days without entries produce no point. `cumulative` is the running grams
/// total across the emitted points.
pub fn trend_series(entries: &[EggLogEntry], start: NaiveDate, end: NaiveDate) -> Vec<TrendPoint> {
    let mut daily: BTreeMap<NaiveDate, (f64, i64)> = BTreeMap::new();

    for entry in entries {
        let day = entry.harvest_day();
        if day < start || day > end {
            continue;
        }
        let totals = daily.entry(day).or_insert((0.0, 0));
        totals.0 += entry.grams_logged;
        totals.1 += entry.egg_count;
    }

    let mut cumulative = 0.0;
    daily
        .into_iter()
        .map(|(date, (grams, eggs))| {
            cumulative += grams;
            TrendPoint {
                date,
                grams: round_to(grams, 2),
                eggs,
                cumulative: round_to(cumulative, 2),
            }
        })
        .collect()
}

/// The `weeks`-long window ending on `today`, or `None` if it would start
/// before the first representable day.
pub fn trend_window(today: NaiveDate, weeks: u32) -> Option<(NaiveDate, NaiveDate)> {
    let start = today.checked_sub_days(Days::new(u64::from(weeks) * 7))?;
    Some((start, today))
}

/// All-time totals across every entry.
pub fn total_collections(entries: &[EggLogEntry]) -> TotalCollections {
    let total_grams: f64 = entries.iter().map(|e| e.grams_logged).sum();
    TotalCollections {
        total_grams: round_to(total_grams, 2),
        total_eggs: entries.iter().map(|e| e.egg_count).sum(),
        entry_count: entries.len(),
    }
}
