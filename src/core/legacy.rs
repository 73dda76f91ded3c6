//! One-shot migration of the old JSON data files into the database.
//!
//! Each file is parsed, written through the ordinary repository operations
//! and removed only once that write has committed. The three files are
//! independent: a broken one is reported and left on disk, the others still
//! migrate. Once a file is gone later startups have nothing to do.
//!
//! Existing rows are merged with, not replaced by, legacy content: settings
//! and reports with the same key are overwritten, templates are appended.

use crate::db::log::ttlog_quiet;
use crate::db::pool::TxMode;
use crate::db::queries::Repository;
use crate::errors::{AppError, AppResult};
use crate::models::{Category, ConfigValue, Configuration, DayEntry, Report, Weekday};
use serde::Deserialize;
use serde_json::Value;
use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::PathBuf;
use tracing::{info, warn};

pub const LEGACY_CONFIG_FILE: &str = "berichtsheft_konfig.json";
pub const LEGACY_REPORTS_FILE: &str = "berichts_daten.json";
pub const LEGACY_TEMPLATES_FILE: &str = "templates.json";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LegacyOutcome {
    /// No such file in the data directory.
    Missing,
    /// Migrated and removed; number of settings, reports or new templates.
    Imported(usize),
    Failed(String),
}

impl LegacyOutcome {
    pub fn imported(&self) -> Option<usize> {
        match self {
            LegacyOutcome::Imported(n) => Some(*n),
            _ => None,
        }
    }

    pub fn failure(&self) -> Option<&str> {
        match self {
            LegacyOutcome::Failed(msg) => Some(msg),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LegacyImportSummary {
    pub configuration: LegacyOutcome,
    pub reports: LegacyOutcome,
    pub templates: LegacyOutcome,
}

impl LegacyImportSummary {
    pub fn outcomes(&self) -> [(&'static str, &LegacyOutcome); 3] {
        [
            (LEGACY_CONFIG_FILE, &self.configuration),
            (LEGACY_REPORTS_FILE, &self.reports),
            (LEGACY_TEMPLATES_FILE, &self.templates),
        ]
    }

    pub fn has_failures(&self) -> bool {
        self.outcomes().iter().any(|(_, o)| o.failure().is_some())
    }
}

pub struct LegacyImporter<'a> {
    repo: &'a Repository,
    dir: PathBuf,
}

impl<'a> LegacyImporter<'a> {
    pub fn new(repo: &'a Repository, dir: impl Into<PathBuf>) -> Self {
        Self {
            repo,
            dir: dir.into(),
        }
    }

    /// Migrate whatever legacy files are present. Never fails as a whole.
    pub fn run(&self) -> LegacyImportSummary {
        LegacyImportSummary {
            configuration: self.migrate_file(LEGACY_CONFIG_FILE, |c| self.import_configuration(c)),
            reports: self.migrate_file(LEGACY_REPORTS_FILE, |c| self.import_reports(c)),
            templates: self.migrate_file(LEGACY_TEMPLATES_FILE, |c| self.import_templates(c)),
        }
    }

    fn migrate_file<F>(&self, name: &str, import: F) -> LegacyOutcome
    where
        F: FnOnce(&str) -> AppResult<usize>,
    {
        let path = self.dir.join(name);
        if !path.is_file() {
            return LegacyOutcome::Missing;
        }

        info!(file = %path.display(), "legacy data file found, migrating");

        let imported = fs::read_to_string(&path)
            .map_err(AppError::from)
            .and_then(|content| import(&content));

        let n = match imported {
            Ok(n) => n,
            Err(e) => {
                let e = AppError::LegacyImport {
                    file: name.to_string(),
                    message: e.to_string(),
                };
                warn!(error = %e, "legacy migration failed, file kept");
                return LegacyOutcome::Failed(e.to_string());
            }
        };

        // the data is committed at this point; only now the file may go
        if let Err(e) = fs::remove_file(&path) {
            warn!(file = %path.display(), error = %e, "legacy data migrated but file not removed");
            return LegacyOutcome::Failed(format!(
                "data migrated but the file could not be removed: {}",
                e
            ));
        }

        ttlog_quiet(
            self.repo.database(),
            "legacy_import",
            name,
            &format!("{} entries migrated from legacy file", n),
        );
        info!(file = %name, entries = n, "legacy data file migrated and removed");
        LegacyOutcome::Imported(n)
    }

    fn import_configuration(&self, content: &str) -> AppResult<usize> {
        let raw: serde_json::Map<String, Value> = serde_json::from_str(content)?;
        let entries: Configuration = raw
            .into_iter()
            .map(|(k, v)| (k, ConfigValue::from(v)))
            .collect();

        self.repo.save_configuration(&entries)?;
        Ok(entries.len())
    }

    fn import_reports(&self, content: &str) -> AppResult<usize> {
        let raw: BTreeMap<String, LegacyReport> = serde_json::from_str(content)?;

        let mut reports = BTreeMap::new();
        for (key, legacy) in raw {
            let report = legacy
                .into_report()
                .map_err(|e| AppError::InvalidReport(format!("{}: {}", key, e)))?;
            reports.insert(key, report);
        }

        self.repo.bulk_import_reports(&reports)
    }

    fn import_templates(&self, content: &str) -> AppResult<usize> {
        let legacy: Vec<String> = serde_json::from_str(content)?;

        self.repo.with_transaction(TxMode::Write, |_| {
            let mut merged = self.repo.load_templates()?;
            let mut known: HashSet<String> = merged.iter().cloned().collect();

            let mut added = 0;
            for text in legacy {
                let text = text.trim().to_string();
                if text.is_empty() || !known.insert(text.clone()) {
                    continue;
                }
                merged.push(text);
                added += 1;
            }

            self.repo.save_templates(&merged)?;
            Ok(added)
        })
    }
}

/// Numbers in the old files were sometimes written as strings.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum LegacyNumber {
    Int(i64),
    Text(String),
}

impl LegacyNumber {
    fn value(&self, field: &str) -> AppResult<i64> {
        match self {
            LegacyNumber::Int(n) => Ok(*n),
            LegacyNumber::Text(s) => s
                .trim()
                .parse()
                .map_err(|_| AppError::InvalidReport(format!("{} is not a number: {:?}", field, s))),
        }
    }
}

#[derive(Debug, Deserialize)]
struct LegacyReport {
    #[serde(rename = "jahr")]
    year: LegacyNumber,
    #[serde(rename = "kalenderwoche")]
    week: LegacyNumber,
    #[serde(rename = "fortlaufende_nr", default)]
    sequence_no: Option<LegacyNumber>,
    #[serde(rename = "name_azubi", default)]
    trainee_name: String,
    #[serde(rename = "tage_daten", default)]
    days: Vec<LegacyDay>,
}

#[derive(Debug, Deserialize)]
struct LegacyDay {
    #[serde(rename = "tag_name", default)]
    weekday: Option<String>,
    #[serde(rename = "typ", default)]
    category: String,
    #[serde(rename = "stunden", default)]
    hours: String,
    #[serde(rename = "taetigkeiten", default)]
    activities: String,
}

impl LegacyReport {
    fn into_report(self) -> AppResult<Report> {
        let year = i32::try_from(self.year.value("jahr")?)
            .map_err(|_| AppError::InvalidWeek("year out of range".to_string()))?;
        let iso_week = u32::try_from(self.week.value("kalenderwoche")?)
            .map_err(|_| AppError::InvalidWeek("negative week".to_string()))?;
        let sequence_no = match &self.sequence_no {
            Some(n) => n.value("fortlaufende_nr")?,
            None => 0,
        };

        if self.days.len() > Weekday::ALL.len() {
            return Err(AppError::InvalidReport(format!(
                "{} day entries, at most {} expected",
                self.days.len(),
                Weekday::ALL.len()
            )));
        }

        let mut day_entries = Vec::with_capacity(self.days.len());
        for (i, day) in self.days.into_iter().enumerate() {
            // positional unless the file names the day
            let weekday = match day.weekday.as_deref().filter(|s| !s.trim().is_empty()) {
                Some(name) => Weekday::from_legacy_name(name)
                    .ok_or_else(|| AppError::InvalidWeekday(name.to_string()))?,
                None => Weekday::from_index(i)
                    .ok_or_else(|| AppError::InvalidWeekday(i.to_string()))?,
            };

            let category = if day.category.trim().is_empty() {
                Category::Company
            } else {
                day.category.parse::<Category>()?
            };

            day_entries.push(DayEntry::new(weekday, category, day.hours, day.activities));
        }

        Ok(Report {
            sequence_no,
            trainee_name: self.trainee_name,
            year,
            iso_week,
            day_entries,
        })
    }
}
