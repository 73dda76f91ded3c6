use crate::db::migrate::schema_version;
use crate::db::queries::Repository;
use crate::errors::AppResult;
use crate::models::{Category, Report};
use crate::utils::colors::{CYAN, GREEN, GREY, RESET, YELLOW};
use crate::utils::path::is_in_memory;
use crate::utils::time::parse_hours;
use std::collections::BTreeMap;
use std::fs;
use tracing::warn;

/// Aggregated figures over all stored reports.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Statistics {
    pub total_reports: usize,
    pub total_minutes: i64,
    pub minutes_by_category: BTreeMap<Category, i64>,
    pub days_by_category: BTreeMap<Category, usize>,
    pub minutes_by_year: BTreeMap<i32, i64>,
}

impl Statistics {
    pub fn total_hours(&self) -> f64 {
        self.total_minutes as f64 / 60.0
    }

    pub fn hours_for(&self, c: Category) -> f64 {
        *self.minutes_by_category.get(&c).unwrap_or(&0) as f64 / 60.0
    }

    pub fn days_for(&self, c: Category) -> usize {
        *self.days_by_category.get(&c).unwrap_or(&0)
    }
}

/// Hours that cannot be parsed count as zero.
pub fn compute(reports: &BTreeMap<String, Report>) -> Statistics {
    let mut stats = Statistics {
        total_reports: reports.len(),
        ..Default::default()
    };

    for (id, report) in reports {
        for day in &report.day_entries {
            let minutes = if day.hours.trim().is_empty() {
                0
            } else {
                parse_hours(&day.hours).unwrap_or_else(|| {
                    warn!(report = %id, weekday = %day.weekday, hours = %day.hours, "unparsable hours counted as 0");
                    0
                })
            };

            stats.total_minutes += minutes;
            *stats.minutes_by_category.entry(day.category).or_insert(0) += minutes;
            *stats.days_by_category.entry(day.category).or_insert(0) += 1;
            *stats.minutes_by_year.entry(report.year).or_insert(0) += minutes;
        }
    }

    stats
}

pub fn statistics(repo: &Repository) -> AppResult<Statistics> {
    Ok(compute(&repo.load_reports()?))
}

pub fn print_db_info(repo: &Repository) -> AppResult<()> {
    println!();

    //
    // 1) FILE SIZE
    //
    let path = repo.database().path();
    if is_in_memory(path) {
        println!("{}• File:{} {}in-memory{}", CYAN, RESET, GREY, RESET);
    } else {
        let file_size = fs::metadata(path).map(|m| m.len()).unwrap_or(0);
        let file_mb = (file_size as f64) / (1024.0 * 1024.0);
        println!("{}• File:{} {}{}{}", CYAN, RESET, YELLOW, path.display(), RESET);
        println!("{}• Size:{} {:.2} MB", CYAN, RESET, file_mb);
    }

    //
    // 2) SCHEMA
    //
    let version = schema_version(repo.database())?;
    println!("{}• Schema version:{} {}", CYAN, RESET, version);

    //
    // 3) COUNTS
    //
    let counts = repo.counts()?;
    println!(
        "{}• Reports:{} {}{}{} ({} day entries)",
        CYAN, RESET, GREEN, counts.reports, RESET, counts.day_entries
    );
    println!("{}• Templates:{} {}", CYAN, RESET, counts.templates);
    println!("{}• Settings:{} {}", CYAN, RESET, counts.settings);

    //
    // 4) WEEK RANGE
    //
    let reports = repo.load_reports()?;
    let fmt_first = reports
        .keys()
        .next()
        .cloned()
        .unwrap_or_else(|| format!("{GREY}--{RESET}"));
    let fmt_last = reports
        .keys()
        .next_back()
        .cloned()
        .unwrap_or_else(|| format!("{GREY}--{RESET}"));

    println!("{}• Week range:{}", CYAN, RESET);
    println!("    from: {}", fmt_first);
    println!("    to:   {}", fmt_last);

    println!();
    Ok(())
}
