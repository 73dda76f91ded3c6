use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::report::ReportLogic;
use crate::db::initialize::open_store;
use crate::db::log::ttlog_quiet;
use crate::errors::{AppError, AppResult};
use crate::models::{Category, DayEntry, Report, Weekday};
use crate::ui::messages::{success, warning};
use crate::utils::date;

/// Parse a `CATEGORY|HH:MM|activities` day spec.
///
/// Omitted parts keep the value of `default`, so `school` alone is enough.
pub fn parse_day_spec(spec: &str, default: &DayEntry) -> AppResult<DayEntry> {
    let mut parts = spec.splitn(3, '|');

    let category = match parts.next().map(str::trim).filter(|s| !s.is_empty()) {
        Some(c) => c.parse::<Category>()?,
        None => default.category,
    };

    let hours = match parts.next().map(str::trim).filter(|s| !s.is_empty()) {
        Some(h) => h.to_string(),
        None if category.is_absence() => String::new(),
        None => default.hours.clone(),
    };

    let activities = parts
        .next()
        .map(|s| s.trim().to_string())
        .unwrap_or_else(|| default.activities.clone());

    Ok(DayEntry::new(default.weekday, category, hours, activities))
}

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Add {
        year,
        week,
        nr,
        name,
        days,
    } = cmd
    {
        if days.len() > Weekday::ALL.len() {
            return Err(AppError::InvalidReport(format!(
                "{} --day entries given, a week has {}",
                days.len(),
                Weekday::ALL.len()
            )));
        }

        let repo = open_store(cfg)?;
        let settings = repo.load_configuration()?;
        let suggest = || ReportLogic::suggest_next(&repo, date::today());

        let (year, iso_week) = match (year, week) {
            (Some(y), Some(w)) => (*y, *w),
            (None, None) => {
                let s = suggest()?;
                (s.year, s.iso_week)
            }
            _ => {
                return Err(AppError::InvalidWeek(
                    "year and week must be given together".to_string(),
                ));
            }
        };
        let sequence_no = match nr {
            Some(n) => *n,
            None => suggest()?.sequence_no,
        };

        let trainee_name = name
            .clone()
            .or_else(|| ReportLogic::trainee_name(&settings))
            .unwrap_or_default();
        if trainee_name.trim().is_empty() {
            warning("No trainee name given; set one with `settings --set trainee_name=...`");
        }

        let mut day_entries = ReportLogic::default_day_entries(&settings);
        for (entry, spec) in day_entries.iter_mut().zip(days) {
            *entry = parse_day_spec(spec, entry)?;
        }

        let report = Report {
            sequence_no,
            trainee_name,
            year,
            iso_week,
            day_entries,
        };

        let id = ReportLogic::save(&repo, &report)?;

        ttlog_quiet(
            repo.database(),
            "report_saved",
            &id,
            &format!("Report #{} saved", report.sequence_no),
        );

        success(format!(
            "Report #{} for week {} saved ({} hours).",
            report.sequence_no,
            id,
            crate::utils::format_minutes(report.total_minutes())
        ));
    }

    Ok(())
}
