use crate::cli::commands::list::normalize_id;
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::db::initialize::open_store;
use crate::db::log::ttlog_quiet;
use crate::errors::{AppError, AppResult};
use crate::ui::messages::{confirm, info, success};

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Del { id, all, yes } = cmd {
        let target = match id {
            Some(raw) if !*all => Some(normalize_id(raw)?),
            _ => None,
        };

        //
        // Confirmation prompt
        //
        let prompt = match &target {
            Some(id) => format!("Delete report {}? This action is irreversible.", id),
            None => "Delete ALL reports? This action is irreversible.".to_string(),
        };

        if !*yes && !confirm(&prompt) {
            info("Operation cancelled.");
            return Ok(());
        }

        //
        // Execute deletion
        //
        let repo = open_store(cfg)?;

        match target {
            Some(id) => {
                if !repo.delete_report(&id)? {
                    return Err(AppError::ReportNotFound(id));
                }
                ttlog_quiet(repo.database(), "report_deleted", &id, "Report deleted");
                success(format!("Report {} has been deleted.", id));
            }
            None => {
                let n = repo.delete_all_reports()?;
                ttlog_quiet(
                    repo.database(),
                    "reset",
                    "reports",
                    &format!("{} reports deleted", n),
                );
                success(format!("All reports ({}) have been deleted.", n));
            }
        }
    }

    Ok(())
}
