use crate::db::pool::{Database, TxMode};
use crate::errors::AppResult;
use chrono::Local;
use rusqlite::params;
use tracing::warn;

/// Write an internal log line into the `log` table.
pub fn ttlog(db: &Database, operation: &str, target: &str, message: &str) -> AppResult<()> {
    // Timestamp locale, formattato in ISO 8601
    let now = Local::now().to_rfc3339();

    db.with_transaction(TxMode::Write, |tx| {
        let mut stmt = tx.prepare_cached(
            "INSERT INTO log (date, operation, target, message)
             VALUES (?1, ?2, ?3, ?4)",
        )?;
        stmt.execute(params![now, operation, target, message])?;
        Ok(())
    })
}

/// Like [`ttlog`], but a failure is only reported, never returned.
pub fn ttlog_quiet(db: &Database, operation: &str, target: &str, message: &str) {
    if let Err(e) = ttlog(db, operation, target, message) {
        warn!(error = %e, operation, "failed to write internal log");
    }
}

#[derive(Debug, Clone)]
pub struct LogEntry {
    pub id: i64,
    pub date: String,
    pub operation: String,
    pub target: String,
    pub message: String,
}

pub fn load_log(db: &Database) -> AppResult<Vec<LogEntry>> {
    db.with_transaction(TxMode::Read, |tx| {
        let mut stmt = tx.prepare_cached(
            "SELECT id, date, operation, target, message FROM log ORDER BY id ASC",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok(LogEntry {
                id: row.get(0)?,
                date: row.get(1)?,
                operation: row.get(2)?,
                target: row.get::<_, Option<String>>(3)?.unwrap_or_default(),
                message: row.get(4)?,
            })
        })?;

        let mut out = Vec::new();
        for r in rows {
            out.push(r?);
        }
        Ok(out)
    })
}
