use crate::cli::parser::Commands;
use crate::config::Config;
use crate::errors::{AppError, AppResult};
use crate::ui::messages::{success, warning};
use std::path::Path;
use std::process::Command;

/// Editor from `$EDITOR` / `$VISUAL`, else the platform default.
fn default_editor() -> String {
    std::env::var("EDITOR")
        .or_else(|_| std::env::var("VISUAL"))
        .unwrap_or_else(|_| {
            if cfg!(target_os = "windows") {
                "notepad".to_string()
            } else {
                "nano".to_string()
            }
        })
}

fn run_editor(editor: &str, path: &Path) -> bool {
    matches!(Command::new(editor).arg(path).status(), Ok(s) if s.success())
}

/// Handle the `config` subcommand
pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Config {
        print_config,
        edit_config,
        editor,
    } = cmd
    {
        let path = Config::config_file();

        if *print_config {
            println!("📄 Current configuration ({}):\n", path.display());
            println!("{}", serde_yaml::to_string(cfg)?);
        }

        if *edit_config {
            // the editor needs something to open
            if !path.exists() {
                cfg.save_to(&path)?;
            }

            let fallback = default_editor();
            let requested = editor.clone().unwrap_or_else(|| fallback.clone());

            if run_editor(&requested, &path) {
                success(format!("Configuration edited with '{}'", requested));
            } else if requested != fallback {
                warning(format!(
                    "Editor '{}' failed, trying '{}'",
                    requested, fallback
                ));
                if !run_editor(&fallback, &path) {
                    return Err(AppError::Config(format!(
                        "cannot edit {} with '{}'",
                        path.display(),
                        fallback
                    )));
                }
                success(format!("Configuration edited with '{}'", fallback));
            } else {
                return Err(AppError::Config(format!(
                    "cannot edit {} with '{}'",
                    path.display(),
                    requested
                )));
            }

            // reject edits that no longer parse
            Config::load_from(&path)?;
        }
    }

    Ok(())
}
