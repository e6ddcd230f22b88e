// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Persisted form of the entry collection and goal.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{EggLogEntry, GoalSettings};

/// Everything the store needs to survive a restart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreSnapshot {
    #[serde(default)]
    pub entries: Vec<EggLogEntry>,
    #[serde(default)]
    pub goal: GoalSettings,
    /// When this snapshot was written
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_saved: Option<DateTime<Utc>>,
}

impl StoreSnapshot {
    /// Empty collection with the given goal.
    pub fn fresh(goal: GoalSettings) -> Self {
        Self {
            entries: Vec::new(),
            goal,
            last_saved: None,
        }
    }
}
