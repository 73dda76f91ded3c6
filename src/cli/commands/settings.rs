use crate::cli::parser::Commands;
use crate::config::Config;
use crate::db::initialize::open_store;
use crate::db::log::ttlog_quiet;
use crate::errors::{AppError, AppResult};
use crate::models::ConfigValue;
use crate::ui::messages::{info, success};
use crate::utils::colors::{CYAN, RESET};

/// Interpret a command-line value: valid JSON is kept structured, anything
/// else is stored as the literal string.
pub fn parse_value(raw: &str) -> ConfigValue {
    match serde_json::from_str::<serde_json::Value>(raw) {
        Ok(v) => ConfigValue::from(v),
        Err(_) => ConfigValue::Scalar(raw.to_string()),
    }
}

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Settings { list, get, set } = cmd {
        let repo = open_store(cfg)?;

        if let Some(pair) = set {
            let (key, value) = pair
                .split_once('=')
                .map(|(k, v)| (k.trim(), v))
                .filter(|(k, _)| !k.is_empty())
                .ok_or_else(|| AppError::Config(format!("expected KEY=VALUE, got '{}'", pair)))?;

            repo.set_setting(key, parse_value(value))?;
            ttlog_quiet(repo.database(), "settings", key, "Setting updated");
            success(format!("Setting '{}' saved.", key));
        }

        if let Some(key) = get {
            match repo.get_setting(key)? {
                Some(v) => println!("{}", v),
                None => return Err(AppError::Config(format!("no setting named '{}'", key))),
            }
        }

        if *list {
            let settings = repo.load_configuration()?;
            if settings.is_empty() {
                info("No settings stored.");
            }
            for (k, v) in &settings {
                println!("{}{}{} = {}", CYAN, k, RESET, v);
            }
        }
    }

    Ok(())
}
