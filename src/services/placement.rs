// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Harvest placement schedule.
//!
//! Maps the weekday of a harvest to where the eggs are stored and when they
//! move to the incubator. The result depends only on the weekday and the
//! configured [`HarvestPolicy`], never on entry history.

use crate::models::{Container, HarvestPolicy, PlacementInstruction};
use chrono::{Datelike, NaiveDate, Weekday};

const FRIDGE_TEMP: &str = "4°C";
const INCUBATOR_TEMP: &str = "28°C";

/// Placement instruction for a harvest on `date`.
pub fn placement_for(date: NaiveDate, policy: HarvestPolicy) -> PlacementInstruction {
    match date.weekday() {
        Weekday::Sun => fridge(
            "Store for 3 days",
            "Wednesday",
            3,
            "Label: 'Sunday Harvest - Move to Incubator Wednesday'",
        ),
        Weekday::Mon => fridge(
            "Store for 1 day",
            "Tuesday",
            1,
            "Label: 'Monday Harvest - Move to Incubator Tuesday'",
        ),
        Weekday::Tue => PlacementInstruction {
            urgent: false,
            additional_notes: Some("Direct to incubator - no refrigeration needed"),
            ..incubator()
        },
        Weekday::Wed => PlacementInstruction {
            urgent: true,
            additional_notes: Some(
                "BUSY DAY: Also move Monday & Sunday eggs from fridge to incubator today!",
            ),
            ..incubator()
        },
        Weekday::Thu => off_day(policy, "Thursday"),
        Weekday::Fri => fridge(
            "Store for 3+ days",
            "Monday (next week)",
            3,
            "Label: 'Friday Harvest - Move to Incubator Monday'",
        ),
        Weekday::Sat => off_day(policy, "Saturday"),
    }
}

/// Thursday and Saturday are outside the primary schedule.
pub fn is_off_schedule_harvest(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Thu | Weekday::Sat)
}

/// Whether collection is allowed on `date` under `policy`.
pub fn can_harvest_on_date(date: NaiveDate, policy: HarvestPolicy) -> bool {
    match policy {
        HarvestPolicy::RestDays => !is_off_schedule_harvest(date),
        HarvestPolicy::Flexible => true,
    }
}

/// Full English weekday name, e.g. "Monday".
pub fn day_name(date: NaiveDate) -> String {
    date.format("%A").to_string()
}

fn fridge(
    duration: &'static str,
    move_day: &'static str,
    days: u32,
    notes: &'static str,
) -> PlacementInstruction {
    PlacementInstruction {
        container: Container::Refrigerator,
        temperature: FRIDGE_TEMP,
        duration,
        next_action: "Move to incubator",
        next_action_date: move_day,
        move_after_days: Some(days),
        urgent: false,
        additional_notes: Some(notes),
    }
}

fn incubator() -> PlacementInstruction {
    PlacementInstruction {
        container: Container::Incubator,
        temperature: INCUBATOR_TEMP,
        duration: "Permanent storage",
        next_action: "Stay in incubator",
        next_action_date: "No movement needed",
        move_after_days: None,
        urgent: false,
        additional_notes: None,
    }
}

fn off_day(policy: HarvestPolicy, day: &'static str) -> PlacementInstruction {
    match policy {
        HarvestPolicy::RestDays => PlacementInstruction {
            container: Container::NoHarvest,
            temperature: "N/A",
            duration: "Rest day",
            next_action: "No harvest today",
            next_action_date: "Try another day",
            move_after_days: None,
            urgent: false,
            additional_notes: Some(if day == "Thursday" {
                "Thursday is a rest day - no egg collection"
            } else {
                "Saturday is a rest day - no egg collection"
            }),
        },
        HarvestPolicy::Flexible => PlacementInstruction {
            container: Container::Refrigerator,
            temperature: FRIDGE_TEMP,
            duration: "Flexible",
            next_action: "Move to incubator when convenient",
            next_action_date: "Flexible",
            move_after_days: None,
            urgent: false,
            additional_notes: Some(
                "Off-schedule harvest: refrigerate and fold into the next incubator move",
            ),
        },
    }
}
