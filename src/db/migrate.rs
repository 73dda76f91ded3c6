//! Versioned, forward-only schema migrations.
//!
//! The schema version lives in the database header (`PRAGMA user_version`,
//! 0 on a fresh store). Each script is named `<version>_<description>.sql`;
//! a script runs together with its version bump in one transaction, so a
//! failed script leaves the version at the last one that succeeded.

use crate::db::pool::{Database, TxMode};
use crate::errors::{AppError, AppResult};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Scripts compiled into the binary.
const EMBEDDED: &[(&str, &str)] = &[
    (
        "001_initial_schema.sql",
        include_str!("migrations/001_initial_schema.sql"),
    ),
    (
        "002_audit_log.sql",
        include_str!("migrations/002_audit_log.sql"),
    ),
    (
        "003_unique_weekday_per_report.sql",
        include_str!("migrations/003_unique_weekday_per_report.sql"),
    ),
];

#[derive(Debug, Clone)]
pub struct Migration {
    pub version: u32,
    pub name: String,
    pub sql: String,
}

#[derive(Debug, Clone)]
pub enum MigrationSource {
    Embedded,
    /// Every `*.sql` file in the directory.
    Directory(PathBuf),
}

impl MigrationSource {
    /// Load, parse and sort the scripts of this source.
    ///
    /// Files without a numeric prefix are skipped with a warning; two files
    /// claiming the same version are rejected before anything runs.
    pub fn load(&self) -> AppResult<Vec<Migration>> {
        let scripts = match self {
            MigrationSource::Embedded => EMBEDDED
                .iter()
                .map(|(name, sql)| (name.to_string(), sql.to_string()))
                .collect(),
            MigrationSource::Directory(dir) => read_scripts(dir)?,
        };

        let mut migrations = Vec::new();
        for (name, sql) in scripts {
            match parse_version(&name) {
                Some(version) if version > 0 => migrations.push(Migration { version, name, sql }),
                _ => warn!(file = %name, "migration file has no valid version prefix, skipped"),
            }
        }

        migrations.sort_by_key(|m| m.version);

        let mut seen = HashSet::new();
        for m in &migrations {
            if !seen.insert(m.version) {
                return Err(AppError::MigrationSource(format!(
                    "version {} is used by more than one script ({})",
                    m.version, m.name
                )));
            }
        }

        Ok(migrations)
    }
}

/// Leading integer of a script name: `012_add_index.sql` → 12.
pub fn parse_version(name: &str) -> Option<u32> {
    let stem = Path::new(name).file_stem()?.to_str()?;
    stem.split('_').next()?.parse().ok()
}

fn read_scripts(dir: &Path) -> AppResult<Vec<(String, String)>> {
    let entries = fs::read_dir(dir).map_err(|e| {
        AppError::MigrationSource(format!("cannot read {}: {}", dir.display(), e))
    })?;

    let mut out = Vec::new();
    for entry in entries {
        let path = entry?.path();
        if !path.is_file() || path.extension().and_then(|e| e.to_str()) != Some("sql") {
            continue;
        }
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        out.push((name, fs::read_to_string(&path)?));
    }
    Ok(out)
}

/// Persisted schema version.
pub fn schema_version(db: &Database) -> AppResult<u32> {
    let v: i64 = db
        .connection()?
        .query_row("PRAGMA user_version", [], |row| row.get(0))?;
    Ok(u32::try_from(v).unwrap_or(0))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationReport {
    pub from: u32,
    pub to: u32,
    pub applied: Vec<String>,
}

impl MigrationReport {
    pub fn is_noop(&self) -> bool {
        self.applied.is_empty()
    }
}

pub struct Migrator {
    source: MigrationSource,
}

impl Migrator {
    pub fn new(source: MigrationSource) -> Self {
        Self { source }
    }

    pub fn embedded() -> Self {
        Self::new(MigrationSource::Embedded)
    }

    /// Use `dir` when configured, the embedded scripts otherwise.
    pub fn from_config(dir: Option<&Path>) -> Self {
        match dir {
            Some(d) => Self::new(MigrationSource::Directory(d.to_path_buf())),
            None => Self::embedded(),
        }
    }

    /// Scripts newer than the persisted version.
    pub fn pending(&self, db: &Database) -> AppResult<Vec<Migration>> {
        let current = schema_version(db)?;
        Ok(self
            .source
            .load()?
            .into_iter()
            .filter(|m| m.version > current)
            .collect())
    }

    /// Bring the schema up to the newest script. A no-op on an up-to-date store.
    pub fn apply(&self, db: &Database) -> AppResult<MigrationReport> {
        let from = schema_version(db)?;
        info!(version = from, "current schema version");

        let mut to = from;
        let mut applied = Vec::new();

        for m in self.pending(db)? {
            info!(version = m.version, file = %m.name, "applying migration");

            db.with_transaction(TxMode::Write, |tx| {
                tx.execute_batch(&m.sql)
                    .map_err(|source| AppError::Migration {
                        version: m.version,
                        name: m.name.clone(),
                        source,
                    })?;
                tx.pragma_update(None, "user_version", m.version)?;
                Ok(())
            })?;

            debug!(version = m.version, "migration committed");
            to = m.version;
            applied.push(m.name);
        }

        if applied.is_empty() {
            debug!(version = from, "schema already up to date");
        }

        Ok(MigrationReport { from, to, applied })
    }
}
