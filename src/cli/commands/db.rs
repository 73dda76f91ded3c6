use crate::cli::parser::Commands;
use crate::config::Config;
use crate::db::initialize::init_db;
use crate::db::pool::Database;
use crate::db::queries::Repository;
use crate::db::stats;
use crate::errors::AppResult;
use crate::utils::colors::{CYAN, GREEN, RED, RESET};

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Db {
        migrate,
        check,
        vacuum,
        info,
    } = cmd
    {
        // schema is always brought up to date; legacy files are left alone here
        let db = Database::connect(cfg.database_path())?;
        let report = init_db(&db, cfg.migrations_path().as_deref())?;

        //
        // 1) MIGRATE
        //
        if *migrate {
            println!("{}▶ Running migrations…{}", CYAN, RESET);
            if report.is_noop() {
                println!(
                    "{}✔ Schema already up to date (version {}).{}\n",
                    GREEN, report.to, RESET
                );
            } else {
                for name in &report.applied {
                    println!("  • {}", name);
                }
                println!(
                    "{}✔ Migration completed (schema version {} → {}).{}\n",
                    GREEN, report.from, report.to, RESET
                );
            }
        }

        //
        // 2) CHECK
        //
        if *check {
            println!("{}▶ Running integrity check…{}", CYAN, RESET);

            let integrity: String =
                db.connection()?
                    .query_row("PRAGMA integrity_check;", [], |row| row.get(0))?;

            if integrity == "ok" {
                println!("{}✔ Integrity check passed.{}\n", GREEN, RESET);
            } else {
                println!("{}✘ Integrity check failed:{} {}\n", RED, RESET, integrity);
            }
        }

        //
        // 3) VACUUM
        //
        if *vacuum {
            println!("{}▶ Running VACUUM…{}", CYAN, RESET);
            db.connection()?.execute_batch("VACUUM;")?;
            println!("{}✔ Vacuum completed.{}\n", GREEN, RESET);
        }

        //
        // 4) INFO
        //
        if *info {
            let repo = Repository::new(db);
            stats::print_db_info(&repo)?;
        }
    }

    Ok(())
}
