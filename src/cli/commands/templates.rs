use crate::cli::parser::Commands;
use crate::config::Config;
use crate::db::initialize::open_store;
use crate::db::log::ttlog_quiet;
use crate::errors::{AppError, AppResult};
use crate::ui::messages::{info, success};

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Templates {
        list,
        add,
        remove,
        clear,
    } = cmd
    {
        if let Some(text) = add
            && text.trim().is_empty()
        {
            return Err(AppError::Other("template text is empty".to_string()));
        }

        let repo = open_store(cfg)?;
        let mut templates = repo.load_templates()?;
        let mut changed = false;

        // numbers refer to the list as shown before this call
        if let Some(n) = remove {
            if *n == 0 || *n > templates.len() {
                return Err(AppError::Other(format!(
                    "no template number {} ({} stored)",
                    n,
                    templates.len()
                )));
            }
            templates.remove(n - 1);
            changed = true;
        }

        if *clear {
            templates.clear();
            changed = true;
        }

        if let Some(text) = add {
            let text = text.trim();
            if templates.iter().any(|t| t == text) {
                info("Template already present.");
            } else {
                templates.push(text.to_string());
                changed = true;
            }
        }

        if changed {
            repo.save_templates(&templates)?;
            ttlog_quiet(
                repo.database(),
                "templates",
                "templates",
                &format!("{} templates saved", templates.len()),
            );
            success(format!("{} templates saved.", templates.len()));
        }

        if *list {
            if templates.is_empty() {
                info("No templates stored.");
            }
            for (i, t) in templates.iter().enumerate() {
                println!("{:>3}. {}", i + 1, t);
            }
        }
    }

    Ok(())
}
