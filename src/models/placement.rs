// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Container placement model for harvested eggs.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Where a batch of eggs is stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub enum Container {
    Refrigerator,
    Incubator,
    #[serde(rename = "NO HARVEST")]
    NoHarvest,
}

/// Whether Thursday and Saturday harvests are allowed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub enum HarvestPolicy {
    /// Thursday and Saturday are rest days with no collection.
    #[default]
    RestDays,
    /// Any day may be harvested; Thursday/Saturday batches go to the
    /// refrigerator and move whenever convenient.
    Flexible,
}

impl HarvestPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            HarvestPolicy::RestDays => "rest-days",
            HarvestPolicy::Flexible => "flexible",
        }
    }
}

impl fmt::Display for HarvestPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HarvestPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "rest-days" | "rest_days" | "strict" => Ok(HarvestPolicy::RestDays),
            "flexible" | "allow" => Ok(HarvestPolicy::Flexible),
            other => Err(format!("unknown harvest policy '{}'", other)),
        }
    }
}

/// Storage and movement rule for a harvest made on a given weekday.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct PlacementInstruction {
    pub container: Container,
    pub temperature: &'static str,
    pub duration: &'static str,
    pub next_action: &'static str,
    pub next_action_date: &'static str,
    /// Days until the batch moves to the incubator, when that is scheduled
    pub move_after_days: Option<u32>,
    /// Extra work is due today
    pub urgent: bool,
    pub additional_notes: Option<&'static str>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_policy_parse() {
        assert_eq!(
            "rest-days".parse::<HarvestPolicy>().unwrap(),
            HarvestPolicy::RestDays
        );
        assert_eq!(
            " Flexible ".parse::<HarvestPolicy>().unwrap(),
            HarvestPolicy::Flexible
        );
        assert!("sometimes".parse::<HarvestPolicy>().is_err());
    }

    #[test]
    fn test_container_wire_names() {
        assert_eq!(
            serde_json::to_string(&Container::NoHarvest).unwrap(),
            "\"NO HARVEST\""
        );
        assert_eq!(
            serde_json::to_string(&Container::Refrigerator).unwrap(),
            "\"Refrigerator\""
        );
    }
}
