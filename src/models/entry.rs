// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Egg harvest log entry model for storage and API.

use crate::time_utils::calendar_day;
use crate::units::grams_to_eggs;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// One harvested-weight observation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct EggLogEntry {
    /// Opaque identifier assigned at creation
    pub id: String,
    /// When the harvest happened (compared by calendar day)
    pub date: DateTime<Utc>,
    /// Harvested weight in grams
    pub grams_logged: f64,
    /// Derived from `grams_logged`, never edited directly
    pub egg_count: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// When this record was created
    pub created_at: DateTime<Utc>,
}

impl EggLogEntry {
    /// Build a new entry, deriving the egg count from the weight.
    pub fn new(id: String, input: NewEggLog, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            date: input.date,
            egg_count: grams_to_eggs(input.grams_logged),
            grams_logged: input.grams_logged,
            notes: normalize_notes(input.notes),
            created_at,
        }
    }

    /// Calendar day of the harvest.
    pub fn harvest_day(&self) -> NaiveDate {
        calendar_day(self.date)
    }
}

/// User-supplied fields of an entry (everything but id and creation time).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewEggLog {
    pub date: DateTime<Utc>,
    pub grams_logged: f64,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Blank notes are stored as absent.
pub(crate) fn normalize_notes(notes: Option<String>) -> Option<String> {
    notes
        .map(|n| n.trim().to_string())
        .filter(|n| !n.is_empty())
}
