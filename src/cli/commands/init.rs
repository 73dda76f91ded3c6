use crate::config::Config;
use crate::db::log;
use crate::errors::AppResult;

use crate::cli::parser::Cli;
use crate::db::initialize::open_store;

/// Handle the `init` command
///
/// This initializes:
///  - the config directory (if missing)
///  - the configuration file (skipped in test mode)
///  - the SQLite database and all pending migrations
///  - any legacy JSON data found next to the database
pub fn handle(cli: &Cli) -> AppResult<()> {
    let cfg = Config::init_all(cli.db.clone(), cli.test)?;
    let db_path = cfg.database_path();

    println!("⚙️  Initializing rBerichtsheft…");
    if !cli.test {
        println!("📄 Config file : {}", Config::config_file().display());
    }
    println!("🗄️  Database   : {}", db_path.display());

    let repo = open_store(&cfg)?;

    println!("✅ Database initialized at {}", db_path.display());

    log::ttlog_quiet(
        repo.database(),
        "init",
        "Database initialized",
        &format!("Database initialized at {}", db_path.display()),
    );

    println!("🎉 rBerichtsheft initialization completed!");
    Ok(())
}
