//! Computed harvest statistics.
//!
//! None of these are stored; they are derived from the entry collection on
//! every request by `services::aggregation`.

use chrono::NaiveDate;
use serde::Serialize;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

use crate::models::EggLogEntry;

/// Progress for one Sunday-to-Saturday week.
#[derive(Debug, Clone, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct WeeklyStats {
    /// Sunday
    pub week_start: NaiveDate,
    /// Saturday
    pub week_end: NaiveDate,

    // ─── Totals ──────────────────────────────────────────────────
    /// Grams harvested this week (2 dp)
    pub total_grams: f64,
    /// Eggs harvested this week
    pub total_eggs: i64,

    // ─── Goal ────────────────────────────────────────────────────
    pub goal_grams: f64,
    pub goal_eggs: i64,
    /// Percent of goal reached (1 dp), 0 when there is no goal
    pub progress_percentage: f64,
    /// Total has met or passed the goal
    pub is_ahead: bool,
    /// Distance from goal in grams (2 dp, always non-negative)
    pub difference: f64,

    /// Entries that fall in this week
    pub daily_entries: Vec<EggLogEntry>,
}

/// One day in a trend series.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct TrendPoint {
    pub date: NaiveDate,
    pub grams: f64,
    pub eggs: i64,
    /// Running grams total through this day
    pub cumulative: f64,
}

/// All-time totals.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct TotalCollections {
    pub total_grams: f64,
    pub total_eggs: i64,
    pub entry_count: usize,
}
