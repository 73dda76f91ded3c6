use crate::db::pool::TxMode;
use crate::db::queries::Repository;
use crate::errors::{AppError, AppResult};
use crate::models::{Category, ConfigValue, Configuration, DayEntry, Report, Weekday};
use crate::utils::date;
use chrono::NaiveDate;
use std::borrow::Cow;
use serde_json::Value;

pub const TRAINEE_NAME_KEY: &str = "trainee_name";
pub const LAST_NUMBER_KEY: &str = "last_report_number";
pub const LAST_YEAR_KEY: &str = "last_report_year";
pub const LAST_WEEK_KEY: &str = "last_report_week";
pub const DEFAULT_HOURS_KEY: &str = "default_hours";
pub const DEFAULT_CATEGORIES_KEY: &str = "default_categories";

/// Settings group written by older versions, holding per-day defaults.
const LEGACY_SETTINGS_KEY: &str = "einstellungen";
const LEGACY_DEFAULT_HOURS_KEY: &str = "default_stunden";
const LEGACY_DEFAULT_CATEGORIES_KEY: &str = "default_typen";

const FALLBACK_HOURS: &str = "08:00";

/// Where the next report should continue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Suggestion {
    pub sequence_no: i64,
    pub year: i32,
    pub iso_week: u32,
}

pub struct ReportLogic;

impl ReportLogic {
    /// Save a report and remember it as the last one written, atomically.
    pub fn save(repo: &Repository, report: &Report) -> AppResult<String> {
        repo.with_transaction(TxMode::Write, |_| {
            let id = repo.upsert_report(report)?;

            let mut last = Configuration::new();
            last.insert(LAST_NUMBER_KEY.to_string(), report.sequence_no.into());
            last.insert(LAST_YEAR_KEY.to_string(), i64::from(report.year).into());
            last.insert(LAST_WEEK_KEY.to_string(), i64::from(report.iso_week).into());
            repo.save_configuration(&last)?;

            Ok(id)
        })
    }

    /// Next sequence number and the week after the last saved report.
    ///
    /// Without a recorded last report the sequence continues after the
    /// highest stored one and the week defaults to the one containing `today`.
    pub fn suggest_next(repo: &Repository, today: NaiveDate) -> AppResult<Suggestion> {
        let cfg = repo.load_configuration()?;
        let get = |k: &str| cfg.get(k).and_then(ConfigValue::as_i64);

        let last = match get(LAST_NUMBER_KEY) {
            Some(n) => Some(n),
            None => repo.max_sequence_no()?,
        };
        let sequence_no = match last {
            Some(n) => n.checked_add(1).ok_or_else(|| {
                AppError::InvalidReport(format!("no sequence number after {}", n))
            })?,
            None => 1,
        };

        let last_week = match (get(LAST_YEAR_KEY), get(LAST_WEEK_KEY)) {
            (Some(y), Some(w)) => i32::try_from(y)
                .ok()
                .zip(u32::try_from(w).ok())
                .and_then(|(y, w)| date::next_iso_week(y, w)),
            _ => None,
        };
        let (year, iso_week) = last_week.unwrap_or_else(|| date::iso_week_of(today));

        Ok(Suggestion {
            sequence_no,
            year,
            iso_week,
        })
    }

    /// Trainee name stored in the settings, if any.
    pub fn trainee_name(cfg: &Configuration) -> Option<String> {
        cfg.get(TRAINEE_NAME_KEY)
            .and_then(|v| v.as_str().map(Cow::into_owned))
            .or_else(|| {
                cfg.get("name_azubi")
                    .and_then(|v| v.as_str().map(Cow::into_owned))
            })
            .filter(|s| !s.trim().is_empty())
    }

    /// One entry per weekday from the configured defaults.
    ///
    /// Falls back to a company day of 08:00; absence days get 0:00.
    pub fn default_day_entries(cfg: &Configuration) -> Vec<DayEntry> {
        let hours = per_day_defaults(cfg, DEFAULT_HOURS_KEY, LEGACY_DEFAULT_HOURS_KEY);
        let categories =
            per_day_defaults(cfg, DEFAULT_CATEGORIES_KEY, LEGACY_DEFAULT_CATEGORIES_KEY);

        Weekday::ALL
            .iter()
            .map(|&day| {
                let category = lookup_day(&categories, day)
                    .and_then(|s| s.parse::<Category>().ok())
                    .unwrap_or(Category::Company);
                let hours = if category.is_absence() {
                    "0:00".to_string()
                } else {
                    lookup_day(&hours, day).unwrap_or_else(|| FALLBACK_HOURS.to_string())
                };
                DayEntry::new(day, category, hours, "")
            })
            .collect()
    }
}

/// Per-weekday map from a top-level setting or from the legacy settings group.
fn per_day_defaults(cfg: &Configuration, key: &str, legacy_key: &str) -> Option<Value> {
    if let Some(v) = cfg.get(key).map(ConfigValue::as_json)
        && v.is_object()
    {
        return Some(v);
    }

    cfg.get(LEGACY_SETTINGS_KEY)
        .map(ConfigValue::as_json)
        .and_then(|group| group.get(legacy_key).cloned())
        .filter(Value::is_object)
}

fn lookup_day(map: &Option<Value>, day: Weekday) -> Option<String> {
    let obj = map.as_ref()?.as_object()?;
    obj.iter()
        .find(|(k, _)| Weekday::from_legacy_name(k) == Some(day))
        .and_then(|(_, v)| v.as_str().map(str::to_string))
}
