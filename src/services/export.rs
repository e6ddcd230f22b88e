// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! CSV export of the egg log.

use crate::models::EggLogEntry;
use crate::time_utils::format_day;
use serde::Serialize;

/// One exported spreadsheet row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExportRow {
    #[serde(rename = "Date")]
    pub date: String,
    #[serde(rename = "Grams Logged")]
    pub grams_logged: f64,
    #[serde(rename = "Egg Count")]
    pub egg_count: i64,
    #[serde(rename = "Notes")]
    pub notes: String,
    #[serde(rename = "Created At")]
    pub created_at: String,
}

impl From<&EggLogEntry> for ExportRow {
    fn from(entry: &EggLogEntry) -> Self {
        Self {
            date: format_day(entry.date),
            grams_logged: entry.grams_logged,
            egg_count: entry.egg_count,
            notes: entry.notes.clone().unwrap_or_default(),
            created_at: format_day(entry.created_at),
        }
    }
}

pub fn export_rows(entries: &[EggLogEntry]) -> Vec<ExportRow> {
    entries.iter().map(ExportRow::from).collect()
}

/// Render entries as CSV with a header row.
pub fn render_csv(entries: &[EggLogEntry]) -> anyhow::Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    if entries.is_empty() {
        // serde only emits headers alongside the first record
        writer.write_record(["Date", "Grams Logged", "Egg Count", "Notes", "Created At"])?;
    }
    for row in export_rows(entries) {
        writer.serialize(row)?;
    }
    let bytes = writer.into_inner().map_err(|e| anyhow::anyhow!(e.to_string()))?;
    Ok(String::from_utf8(bytes)?)
}

/// Attachment file name for an export made at `now`.
pub fn export_filename(now: chrono::DateTime<chrono::Utc>) -> String {
    format!("waxworm-egg-logs-{}.csv", format_day(now))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NewEggLog;

    fn entry(grams: f64, notes: Option<&str>) -> EggLogEntry {
        EggLogEntry::new(
            "id".to_string(),
            NewEggLog {
                date: "2024-06-03T09:00:00Z".parse().unwrap(),
                grams_logged: grams,
                notes: notes.map(String::from),
            },
            "2024-06-04T10:30:00Z".parse().unwrap(),
        )
    }

    #[test]
    fn test_render_csv() {
        let csv = render_csv(&[entry(2.5, Some("Morning collection"))]).unwrap();
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(lines[0], "Date,Grams Logged,Egg Count,Notes,Created At");
        assert_eq!(lines[1], "2024-06-03,2.5,1625,Morning collection,2024-06-04");
        assert_eq!(lines.len(), 2);
    }

    #[test]
    fn test_render_csv_quotes_notes() {
        let csv = render_csv(&[entry(1.0, Some("big, \"fresh\" batch"))]).unwrap();
        assert!(csv.contains("\"big, \"\"fresh\"\" batch\""));
    }

    #[test]
    fn test_render_csv_empty_has_header() {
        let csv = render_csv(&[]).unwrap();
        assert_eq!(csv.trim_end(), "Date,Grams Logged,Egg Count,Notes,Created At");
    }

    #[test]
    fn test_missing_notes_export_blank() {
        let row = ExportRow::from(&entry(1.0, None));
        assert_eq!(row.notes, "");
    }
}
