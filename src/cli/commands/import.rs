use crate::cli::parser::Commands;
use crate::config::Config;
use crate::db::initialize::open_store;
use crate::db::log::ttlog_quiet;
use crate::errors::AppResult;
use crate::models::Report;
use crate::ui::messages::{info, success};
use crate::utils::path::expand_tilde;
use std::collections::BTreeMap;
use std::fs;

/// Handle the `import` command: all reports of the file or none of them.
pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Import { file } = cmd {
        let path = expand_tilde(file);
        let content = fs::read_to_string(&path)?;
        let reports: BTreeMap<String, Report> = serde_json::from_str(&content)?;

        if reports.is_empty() {
            info(format!("{} contains no reports.", path.display()));
            return Ok(());
        }

        let repo = open_store(cfg)?;
        let n = repo.bulk_import_reports(&reports)?;

        ttlog_quiet(
            repo.database(),
            "import",
            &path.display().to_string(),
            &format!("{} reports imported", n),
        );
        success(format!("Imported {} reports from {}", n, path.display()));
    }

    Ok(())
}
