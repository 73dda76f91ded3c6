//! Weekly report model.
//!
//! A report is identified by its ISO week: the id is always derived from
//! `(year, iso_week)` and never assigned by callers.

use crate::errors::{AppError, AppResult};
use crate::models::{Category, Weekday};
use crate::utils::{date, time};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Build the report id for an ISO week, e.g. `2024-07`.
pub fn report_id(year: i32, iso_week: u32) -> String {
    format!("{}-{:02}", year, iso_week)
}

/// Split a report id back into `(year, iso_week)`.
pub fn parse_report_id(id: &str) -> Option<(i32, u32)> {
    let (y, w) = id.trim().rsplit_once('-')?;
    let year = y.parse::<i32>().ok()?;
    let week = w.parse::<u32>().ok()?;
    date::iso_week_start(year, week)?;
    Some((year, week))
}

/// One working day of a report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayEntry {
    pub weekday: Weekday,
    pub category: Category,
    pub hours: String,
    pub activities: String,
}

impl DayEntry {
    pub fn new(
        weekday: Weekday,
        category: Category,
        hours: impl Into<String>,
        activities: impl Into<String>,
    ) -> Self {
        Self {
            weekday,
            category,
            hours: hours.into(),
            activities: activities.into(),
        }
    }

    /// Validate the hours field and fill the placeholders used for absence days.
    pub fn normalized(&self) -> AppResult<Self> {
        let mut hours = self.hours.trim().to_string();
        let mut activities = self.activities.trim().to_string();

        if !hours.is_empty() && time::parse_hours(&hours).is_none() {
            return Err(AppError::InvalidHours(self.hours.clone()));
        }

        if self.category.is_absence() {
            if hours.is_empty() {
                hours = "0:00".to_string();
            }
            if activities.is_empty() {
                activities = "-".to_string();
            }
        }

        Ok(Self {
            weekday: self.weekday,
            category: self.category,
            hours,
            activities,
        })
    }

    /// Worked minutes, 0 when the field is empty or malformed.
    pub fn minutes(&self) -> i64 {
        time::parse_hours(&self.hours).unwrap_or(0)
    }
}

/// A weekly training report with its day entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    pub sequence_no: i64,
    pub trainee_name: String,
    pub year: i32,
    pub iso_week: u32,
    #[serde(default)]
    pub day_entries: Vec<DayEntry>,
}

impl Report {
    pub fn id(&self) -> String {
        report_id(self.year, self.iso_week)
    }

    /// Monday of the report's week.
    pub fn week_start(&self) -> Option<NaiveDate> {
        date::iso_week_start(self.year, self.iso_week)
    }

    /// Validated copy of the report, with day entries sorted by weekday.
    ///
    /// Every write path goes through here, so live edits, bulk imports and
    /// legacy migration all store the same shape.
    pub fn normalized(&self) -> AppResult<Self> {
        if self.week_start().is_none() {
            return Err(AppError::InvalidWeek(format!(
                "week {} does not exist in {}",
                self.iso_week, self.year
            )));
        }

        if self.sequence_no < 0 {
            return Err(AppError::InvalidReport(format!(
                "negative sequence number {}",
                self.sequence_no
            )));
        }

        let day_entries = normalize_day_entries(&self.id(), &self.day_entries)?;

        Ok(Self {
            sequence_no: self.sequence_no,
            trainee_name: self.trainee_name.trim().to_string(),
            year: self.year,
            iso_week: self.iso_week,
            day_entries,
        })
    }

    pub fn total_minutes(&self) -> i64 {
        self.day_entries.iter().map(DayEntry::minutes).sum()
    }
}

/// Validate a full set of day entries and sort it by weekday.
pub fn normalize_day_entries(report_id: &str, entries: &[DayEntry]) -> AppResult<Vec<DayEntry>> {
    let mut seen = HashSet::new();
    let mut out = Vec::with_capacity(entries.len());

    for entry in entries {
        if !seen.insert(entry.weekday) {
            return Err(AppError::InvalidReport(format!(
                "{} appears more than once in {}",
                entry.weekday, report_id
            )));
        }
        out.push(entry.normalized()?);
    }

    out.sort_by_key(|e| e.weekday);
    Ok(out)
}
