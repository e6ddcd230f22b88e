// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Weekly collection goal.

use crate::units::grams_to_eggs;
use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Default weekly goal for a fresh install (grams).
pub const DEFAULT_WEEKLY_GOAL_GRAMS: f64 = 15.0;

/// The single active weekly target.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct GoalSettings {
    pub weekly_goal_grams: f64,
    pub weekly_goal_eggs: i64,
    pub is_active: bool,
}

impl GoalSettings {
    /// Derive the full goal record from a target weight.
    pub fn from_grams(weekly_goal_grams: f64) -> Self {
        Self {
            weekly_goal_grams,
            weekly_goal_eggs: grams_to_eggs(weekly_goal_grams),
            is_active: weekly_goal_grams > 0.0,
        }
    }
}

impl Default for GoalSettings {
    fn default() -> Self {
        Self::from_grams(DEFAULT_WEEKLY_GOAL_GRAMS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_goal() {
        let goal = GoalSettings::default();
        assert_eq!(goal.weekly_goal_grams, 15.0);
        assert_eq!(goal.weekly_goal_eggs, 9750);
        assert!(goal.is_active);
    }

    #[test]
    fn test_zero_goal_is_inactive() {
        let goal = GoalSettings::from_grams(0.0);
        assert_eq!(goal.weekly_goal_eggs, 0);
        assert!(!goal.is_active);
    }
}
