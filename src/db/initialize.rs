use crate::config::Config;
use crate::core::legacy::{LegacyImportSummary, LegacyImporter};
use crate::db::log::ttlog_quiet;
use crate::db::migrate::{MigrationReport, Migrator};
use crate::db::pool::Database;
use crate::db::queries::Repository;
use crate::errors::AppResult;
use crate::ui::messages::{success, warning};
use crate::utils::path::{data_dir_of, is_in_memory};
use std::path::Path;

/// Initialize the database.
/// Delegates all schema creation / upgrades to the migration engine.
pub fn init_db(db: &Database, migrations_dir: Option<&Path>) -> AppResult<MigrationReport> {
    // NO direct CREATE TABLE here.
    // All schema is guaranteed by migrations.
    let report = Migrator::from_config(migrations_dir).apply(db)?;

    for name in &report.applied {
        ttlog_quiet(db, "migration_applied", name, "Schema migration applied");
    }

    Ok(report)
}

/// Startup sequence: connect → migrate → import old JSON files.
///
/// Connection and migration failures are fatal; legacy import problems are
/// only reported.
pub fn open_store(cfg: &Config) -> AppResult<Repository> {
    let db_path = cfg.database_path();
    let db = Database::connect(&db_path)?;
    init_db(&db, cfg.migrations_path().as_deref())?;

    let repo = Repository::new(db);

    if !is_in_memory(&db_path) {
        let summary = LegacyImporter::new(&repo, data_dir_of(&db_path)).run();
        announce_legacy_import(&summary);
    }

    Ok(repo)
}

fn announce_legacy_import(summary: &LegacyImportSummary) {
    for (file, outcome) in summary.outcomes() {
        if let Some(n) = outcome.imported() {
            success(format!("Migrated {} entries from legacy file {}", n, file));
        } else if let Some(msg) = outcome.failure() {
            warning(format!("Legacy file {} could not be migrated: {}", file, msg));
        }
    }
}
