//! Repository: settings, weekly reports and text templates.
//!
//! Every public operation runs inside `Database::with_transaction`, so a
//! failing statement leaves the store exactly as it was. Operations compose:
//! called from inside another transaction they join it.

use crate::db::pool::{Database, Tx, TxMode};
use crate::errors::{AppError, AppResult};
use crate::models::{
    Category, ConfigValue, Configuration, DayEntry, Report, Weekday, normalize_day_entries,
};
use rusqlite::types::Type;
use rusqlite::{OptionalExtension, Row, params};
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, info};

/// Row counts of the main tables.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StoreCounts {
    pub reports: i64,
    pub day_entries: i64,
    pub templates: i64,
    pub settings: i64,
}

pub struct Repository {
    db: Database,
}

impl Repository {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    pub fn database(&self) -> &Database {
        &self.db
    }

    pub fn into_database(self) -> Database {
        self.db
    }

    /// Run several repository calls as one unit.
    pub fn with_transaction<T, F>(&self, mode: TxMode, body: F) -> AppResult<T>
    where
        F: FnOnce(&Tx<'_>) -> AppResult<T>,
    {
        self.db.with_transaction(mode, body)
    }

    // ---------------------------
    // Configuration
    // ---------------------------

    pub fn load_configuration(&self) -> AppResult<Configuration> {
        self.db.with_transaction(TxMode::Read, |tx| {
            let mut stmt = tx.prepare("SELECT key, value FROM configuration")?;
            let rows = stmt.query_map([], |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, Option<String>>(1)?))
            })?;

            let mut out = Configuration::new();
            for r in rows {
                let (key, raw) = r?;
                out.insert(key, ConfigValue::decode(raw.as_deref().unwrap_or("")));
            }
            Ok(out)
        })
    }

    /// Upsert the given keys; keys not mentioned keep their value.
    pub fn save_configuration(&self, entries: &Configuration) -> AppResult<()> {
        self.db.with_transaction(TxMode::Write, |tx| {
            let mut stmt = tx.prepare_cached(
                "INSERT INTO configuration (key, value) VALUES (?1, ?2)
                 ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            )?;
            for (key, value) in entries {
                stmt.execute(params![key, value.encode()])?;
            }
            Ok(())
        })?;

        debug!(keys = entries.len(), "configuration saved");
        Ok(())
    }

    pub fn get_setting(&self, key: &str) -> AppResult<Option<ConfigValue>> {
        self.db.with_transaction(TxMode::Read, |tx| {
            let raw: Option<Option<String>> = tx
                .query_row(
                    "SELECT value FROM configuration WHERE key = ?1",
                    [key],
                    |row| row.get(0),
                )
                .optional()?;
            Ok(raw.map(|v| ConfigValue::decode(v.as_deref().unwrap_or(""))))
        })
    }

    pub fn set_setting(&self, key: &str, value: impl Into<ConfigValue>) -> AppResult<()> {
        let mut entries = Configuration::new();
        entries.insert(key.to_string(), value.into());
        self.save_configuration(&entries)
    }

    // ---------------------------
    // Reports
    // ---------------------------

    /// All reports keyed by id, day entries in weekday order.
    pub fn load_reports(&self) -> AppResult<BTreeMap<String, Report>> {
        self.db
            .with_transaction(TxMode::Read, |tx| select_reports(tx, None))
    }

    pub fn load_report(&self, id: &str) -> AppResult<Option<Report>> {
        let mut found = self
            .db
            .with_transaction(TxMode::Read, |tx| select_reports(tx, Some(id)))?;
        Ok(found.remove(id))
    }

    /// Insert or replace a report together with its full set of day entries.
    ///
    /// The id is derived from `(year, iso_week)`. Returns that id.
    pub fn upsert_report(&self, report: &Report) -> AppResult<String> {
        let report = report.normalized()?;
        let id = report.id();

        self.db.with_transaction(TxMode::Write, |tx| {
            tx.execute(
                "INSERT INTO reports (report_id, sequence_no, trainee_name, year, iso_week)
                 VALUES (?1, ?2, ?3, ?4, ?5)
                 ON CONFLICT(report_id) DO UPDATE SET
                     sequence_no  = excluded.sequence_no,
                     trainee_name = excluded.trainee_name,
                     year         = excluded.year,
                     iso_week     = excluded.iso_week",
                params![
                    id,
                    report.sequence_no,
                    report.trainee_name,
                    report.year,
                    report.iso_week
                ],
            )?;
            insert_day_entries(tx, &id, &report.day_entries)
        })?;

        debug!(report = %id, days = report.day_entries.len(), "report saved");
        Ok(id)
    }

    /// Replace every day entry of an existing report with `entries`.
    ///
    /// Entries have no identity of their own, so the old set is deleted and
    /// the new one inserted in weekday order, atomically.
    pub fn replace_day_entries(&self, report_id: &str, entries: &[DayEntry]) -> AppResult<()> {
        let entries = normalize_day_entries(report_id, entries)?;

        self.db.with_transaction(TxMode::Write, |tx| {
            let exists: Option<i64> = tx
                .query_row(
                    "SELECT 1 FROM reports WHERE report_id = ?1",
                    [report_id],
                    |row| row.get(0),
                )
                .optional()?;
            if exists.is_none() {
                return Err(AppError::ReportNotFound(report_id.to_string()));
            }
            insert_day_entries(tx, report_id, &entries)
        })
    }

    /// Delete a report and its day entries. Returns whether it existed.
    pub fn delete_report(&self, id: &str) -> AppResult<bool> {
        let existed = self.db.with_transaction(TxMode::Write, |tx| {
            // children first, without relying on the declared cascade
            tx.execute("DELETE FROM day_entries WHERE report_id = ?1", [id])?;
            let n = tx.execute("DELETE FROM reports WHERE report_id = ?1", [id])?;
            Ok(n > 0)
        })?;

        if existed {
            info!(report = %id, "report deleted");
        }
        Ok(existed)
    }

    /// Remove every report. Returns how many were removed.
    pub fn delete_all_reports(&self) -> AppResult<usize> {
        let n = self.db.with_transaction(TxMode::Write, |tx| {
            tx.execute("DELETE FROM day_entries", [])?;
            Ok(tx.execute("DELETE FROM reports", [])?)
        })?;

        info!(reports = n, "all reports deleted");
        Ok(n)
    }

    /// Upsert every report in one transaction: all of them or none.
    ///
    /// Map keys are informational only; ids are re-derived from each report,
    /// so two entries for the same week store one report. Returns the number
    /// of distinct reports written.
    pub fn bulk_import_reports(&self, reports: &BTreeMap<String, Report>) -> AppResult<usize> {
        let n = self.db.with_transaction(TxMode::Write, |_| {
            let mut stored = BTreeSet::new();
            for (key, report) in reports {
                let id = self.upsert_report(report)?;
                if *key != id {
                    debug!(key = %key, report = %id, "imported report stored under derived id");
                }
                stored.insert(id);
            }
            Ok(stored.len())
        })?;

        info!(reports = n, "bulk import committed");
        Ok(n)
    }

    /// Highest stored sequence number, if any report exists.
    pub fn max_sequence_no(&self) -> AppResult<Option<i64>> {
        self.db.with_transaction(TxMode::Read, |tx| {
            Ok(tx.query_row("SELECT MAX(sequence_no) FROM reports", [], |row| {
                row.get::<_, Option<i64>>(0)
            })?)
        })
    }

    // ---------------------------
    // Templates
    // ---------------------------

    pub fn load_templates(&self) -> AppResult<Vec<String>> {
        self.db.with_transaction(TxMode::Read, |tx| {
            let mut stmt = tx.prepare("SELECT text FROM templates ORDER BY id ASC")?;
            let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;

            let mut out = Vec::new();
            for r in rows {
                out.push(r?);
            }
            Ok(out)
        })
    }

    /// Replace the whole template list; ids restart from 1 in list order.
    pub fn save_templates(&self, templates: &[String]) -> AppResult<()> {
        self.db.with_transaction(TxMode::Write, |tx| {
            tx.execute("DELETE FROM templates", [])?;
            tx.execute("DELETE FROM sqlite_sequence WHERE name = 'templates'", [])?;

            let mut stmt = tx.prepare_cached("INSERT INTO templates (text) VALUES (?1)")?;
            for text in templates.iter().map(|t| t.trim()).filter(|t| !t.is_empty()) {
                stmt.execute([text])?;
            }
            Ok(())
        })?;

        debug!(templates = templates.len(), "templates saved");
        Ok(())
    }

    // ---------------------------
    // Misc
    // ---------------------------

    pub fn counts(&self) -> AppResult<StoreCounts> {
        self.db.with_transaction(TxMode::Read, |tx| {
            let count = |table: &str| -> rusqlite::Result<i64> {
                tx.query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| {
                    row.get(0)
                })
            };
            Ok(StoreCounts {
                reports: count("reports")?,
                day_entries: count("day_entries")?,
                templates: count("templates")?,
                settings: count("configuration")?,
            })
        })
    }
}

/// Delete-then-insert of a report's day entries. `entries` must be normalized.
fn insert_day_entries(tx: &Tx<'_>, report_id: &str, entries: &[DayEntry]) -> AppResult<()> {
    tx.execute("DELETE FROM day_entries WHERE report_id = ?1", [report_id])?;

    let mut stmt = tx.prepare_cached(
        "INSERT INTO day_entries (report_id, weekday_name, category, hours_text, activities_text)
         VALUES (?1, ?2, ?3, ?4, ?5)",
    )?;
    for e in entries {
        stmt.execute(params![
            report_id,
            e.weekday.to_db_str(),
            e.category.to_db_str(),
            e.hours,
            e.activities
        ])?;
    }
    Ok(())
}

struct ReportRow {
    id: String,
    sequence_no: i64,
    trainee_name: String,
    year: i32,
    iso_week: u32,
    day: Option<DayEntry>,
}

fn select_reports(tx: &Tx<'_>, only: Option<&str>) -> AppResult<BTreeMap<String, Report>> {
    let mut stmt = tx.prepare(
        "SELECT r.report_id, r.sequence_no, r.trainee_name, r.year, r.iso_week,
                d.weekday_name, d.category, d.hours_text, d.activities_text
         FROM reports r
         LEFT JOIN day_entries d ON d.report_id = r.report_id
         WHERE ?1 IS NULL OR r.report_id = ?1
         ORDER BY r.report_id ASC, d.id ASC",
    )?;

    let rows = stmt.query_map([only], map_report_row)?;

    let mut out: BTreeMap<String, Report> = BTreeMap::new();
    for r in rows {
        let row = r?;
        let report = out.entry(row.id.clone()).or_insert_with(|| Report {
            sequence_no: row.sequence_no,
            trainee_name: row.trainee_name.clone(),
            year: row.year,
            iso_week: row.iso_week,
            day_entries: Vec::new(),
        });
        if let Some(day) = row.day {
            report.day_entries.push(day);
        }
    }

    for report in out.values_mut() {
        report.day_entries.sort_by_key(|e| e.weekday);
    }

    Ok(out)
}

fn map_report_row(row: &Row) -> rusqlite::Result<ReportRow> {
    let weekday: Option<String> = row.get(5)?;

    let day = match weekday {
        Some(name) => {
            let weekday = Weekday::from_db_str(&name).ok_or_else(|| {
                rusqlite::Error::FromSqlConversionFailure(
                    5,
                    Type::Text,
                    Box::new(AppError::InvalidWeekday(name.clone())),
                )
            })?;

            let cat_str: String = row.get(6)?;
            let category = Category::from_db_str(&cat_str).ok_or_else(|| {
                rusqlite::Error::FromSqlConversionFailure(
                    6,
                    Type::Text,
                    Box::new(AppError::InvalidCategory(cat_str.clone())),
                )
            })?;

            Some(DayEntry {
                weekday,
                category,
                hours: row.get::<_, Option<String>>(7)?.unwrap_or_default(),
                activities: row.get::<_, Option<String>>(8)?.unwrap_or_default(),
            })
        }
        None => None,
    };

    Ok(ReportRow {
        id: row.get(0)?,
        sequence_no: row.get(1)?,
        trainee_name: row.get(2)?,
        year: row.get(3)?,
        iso_week: row.get(4)?,
        day,
    })
}
