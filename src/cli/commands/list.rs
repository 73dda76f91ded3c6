use crate::cli::parser::Commands;
use crate::config::Config;
use crate::db::initialize::open_store;
use crate::errors::{AppError, AppResult};
use crate::models::{Report, parse_report_id, report_id};
use crate::ui::messages::{header, info};
use crate::utils::colors::{RESET, color_for_category, colorize_optional};
use crate::utils::date::week_span;
use crate::utils::format_minutes;
use crate::utils::table::{Column, Table};

/// Normalize user input like `2024-7` to the stored id `2024-07`.
pub fn normalize_id(input: &str) -> AppResult<String> {
    parse_report_id(input)
        .map(|(y, w)| report_id(y, w))
        .ok_or_else(|| AppError::InvalidWeek(input.to_string()))
}

fn span_of(r: &Report) -> String {
    week_span(r.year, r.iso_week)
        .map(|(from, to)| format!("{} – {}", from, to))
        .unwrap_or_default()
}

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    match cmd {
        Commands::List { year } => {
            let repo = open_store(cfg)?;
            let reports = repo.load_reports()?;

            let selected: Vec<&Report> = reports
                .values()
                .filter(|r| year.is_none_or(|y| r.year == y))
                .collect();

            if selected.is_empty() {
                info("No reports found.");
                return Ok(());
            }

            let mut table = Table::new(vec![
                Column::new("ID", 8),
                Column::new("NR", 4),
                Column::new("PERIOD", 25),
                Column::new("HOURS", 6),
                Column::new("DAYS", 14),
                Column::new("TRAINEE", 24),
            ]);

            for r in selected {
                let days: String = r
                    .day_entries
                    .iter()
                    .map(|d| d.category.to_db_str()[..1].to_uppercase())
                    .collect::<Vec<_>>()
                    .join(" ");
                table.add_row(vec![
                    r.id(),
                    r.sequence_no.to_string(),
                    span_of(r),
                    format_minutes(r.total_minutes()),
                    days,
                    r.trainee_name.clone(),
                ]);
            }

            print!("{}", table.render());
        }

        Commands::Show { id } => {
            let id = normalize_id(id)?;
            let repo = open_store(cfg)?;
            let report = repo
                .load_report(&id)?
                .ok_or_else(|| AppError::ReportNotFound(id.clone()))?;

            header(format!(
                "Report #{} · week {} · {}",
                report.sequence_no,
                report.id(),
                span_of(&report)
            ));
            println!("Trainee: {}\n", report.trainee_name);

            for d in &report.day_entries {
                let color = color_for_category(d.category);
                println!(
                    "{:<10} {}{:<9}{} {:>6}  {}",
                    d.weekday,
                    color,
                    d.category,
                    RESET,
                    colorize_optional(&d.hours),
                    colorize_optional(&d.activities)
                );
            }

            println!("\nTotal: {}", format_minutes(report.total_minutes()));
        }

        _ => {}
    }

    Ok(())
}
