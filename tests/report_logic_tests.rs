use chrono::NaiveDate;
use rberichtsheft::cli::commands::add::parse_day_spec;
use rberichtsheft::core::report::{LAST_NUMBER_KEY, ReportLogic};
use rberichtsheft::db::stats;
use rberichtsheft::errors::AppError;
use rberichtsheft::models::{Category, ConfigValue, Configuration, DayEntry, Weekday};
use rberichtsheft::utils::time::parse_hours;
use serde_json::json;

mod common;
use common::{memory_repo, sample_report};

#[test]
fn test_parse_hours() {
    assert_eq!(parse_hours("08:00"), Some(480));
    assert_eq!(parse_hours("7:45"), Some(465));
    assert_eq!(parse_hours("120:30"), Some(7230));
    assert_eq!(parse_hours("8:60"), None);
    assert_eq!(parse_hours("8"), None);
    assert_eq!(parse_hours("-1:00"), None);
}

#[test]
fn test_suggest_next_on_empty_store_uses_current_week() {
    let repo = memory_repo();
    let today = NaiveDate::from_ymd_opt(2024, 10, 2).unwrap();

    let s = ReportLogic::suggest_next(&repo, today).unwrap();
    assert_eq!(s.sequence_no, 1);
    assert_eq!((s.year, s.iso_week), (2024, 40));
}

#[test]
fn test_suggest_next_continues_after_last_saved_report() {
    let repo = memory_repo();
    let today = NaiveDate::from_ymd_opt(2024, 10, 2).unwrap();

    ReportLogic::save(&repo, &sample_report(2024, 52, 7)).unwrap();

    let s = ReportLogic::suggest_next(&repo, today).unwrap();
    assert_eq!(s.sequence_no, 8);
    assert_eq!((s.year, s.iso_week), (2025, 1));

    assert_eq!(
        repo.get_setting(LAST_NUMBER_KEY).unwrap().unwrap().as_i64(),
        Some(7)
    );
}

#[test]
fn test_suggest_next_falls_back_to_highest_stored_number() {
    let repo = memory_repo();
    repo.upsert_report(&sample_report(2024, 10, 41)).unwrap();

    let today = NaiveDate::from_ymd_opt(2024, 3, 20).unwrap();
    let s = ReportLogic::suggest_next(&repo, today).unwrap();
    assert_eq!(s.sequence_no, 42);
}

#[test]
fn test_failed_save_does_not_touch_last_report_keys() {
    let repo = memory_repo();
    assert!(ReportLogic::save(&repo, &sample_report(2024, 70, 5)).is_err());
    assert!(repo.get_setting(LAST_NUMBER_KEY).unwrap().is_none());
}

#[test]
fn test_default_day_entries() {
    let mut cfg = Configuration::new();
    cfg.insert(
        "default_categories".to_string(),
        ConfigValue::from(json!({"Friday": "school", "Wednesday": "Urlaub"})),
    );
    cfg.insert(
        "einstellungen".to_string(),
        ConfigValue::from(json!({"default_stunden": {"Montag": "07:30", "Freitag": "06:00"}})),
    );

    let days = ReportLogic::default_day_entries(&cfg);
    assert_eq!(days.len(), 5);
    assert_eq!(days[0].hours, "07:30");
    assert_eq!(days[1].hours, "08:00");
    assert_eq!(days[2].category, Category::Vacation);
    assert_eq!(days[2].hours, "0:00");
    assert_eq!(days[4].category, Category::School);
    assert_eq!(days[4].hours, "06:00");
}

#[test]
fn test_trainee_name_prefers_new_key() {
    let mut cfg = Configuration::new();
    cfg.insert("name_azubi".to_string(), ConfigValue::from("Legacy"));
    assert_eq!(ReportLogic::trainee_name(&cfg).as_deref(), Some("Legacy"));

    cfg.insert("trainee_name".to_string(), ConfigValue::from("Current"));
    assert_eq!(ReportLogic::trainee_name(&cfg).as_deref(), Some("Current"));
}

#[test]
fn test_parse_day_spec_keeps_defaults() {
    let default = DayEntry::new(Weekday::Tuesday, Category::Company, "08:00", "");

    let full = parse_day_spec("school|06:15|Math", &default).unwrap();
    assert_eq!(full.weekday, Weekday::Tuesday);
    assert_eq!(full.category, Category::School);
    assert_eq!(full.hours, "06:15");
    assert_eq!(full.activities, "Math");

    let text_only = parse_day_spec("|  |Warehouse", &default).unwrap();
    assert_eq!(text_only.category, Category::Company);
    assert_eq!(text_only.hours, "08:00");

    let sick = parse_day_spec("Krank", &default).unwrap();
    assert_eq!(sick.category, Category::Sick);
    assert_eq!(sick.hours, "");

    assert!(parse_day_spec("party|08:00|x", &default).is_err());
}

#[test]
fn test_statistics() {
    let repo = memory_repo();
    repo.upsert_report(&sample_report(2023, 52, 1)).unwrap();
    repo.upsert_report(&sample_report(2024, 1, 2)).unwrap();

    let s = stats::statistics(&repo).unwrap();
    assert_eq!(s.total_reports, 2);
    // 4 × 8:00 + 6:30 per week
    assert_eq!(s.total_minutes, 2 * 2310);
    assert_eq!(s.days_for(Category::Company), 8);
    assert_eq!(s.days_for(Category::School), 2);
    assert_eq!(s.days_for(Category::Sick), 0);
    assert!((s.hours_for(Category::School) - 13.0).abs() < f64::EPSILON);
    assert_eq!(s.minutes_by_year[&2023], 2310);
    assert_eq!(s.minutes_by_year[&2024], 2310);
}

#[test]
fn test_suggest_next_refuses_to_overflow_sequence() {
    let repo = memory_repo();
    let today = NaiveDate::from_ymd_opt(2024, 10, 2).unwrap();

    repo.upsert_report(&sample_report(2024, 39, i64::MAX)).unwrap();
    assert!(matches!(
        ReportLogic::suggest_next(&repo, today),
        Err(AppError::InvalidReport(_))
    ));

    ReportLogic::save(&repo, &sample_report(2024, 40, i64::MAX)).unwrap();
    assert!(matches!(
        ReportLogic::suggest_next(&repo, today),
        Err(AppError::InvalidReport(_))
    ));
}

#[test]
fn test_numeric_trainee_name_is_kept() {
    let mut cfg = Configuration::new();
    // plain text that also parses as JSON
    cfg.insert("trainee_name".to_string(), ConfigValue::decode("1234"));
    assert!(matches!(cfg["trainee_name"], ConfigValue::Structured(_)));

    assert_eq!(ReportLogic::trainee_name(&cfg).as_deref(), Some("1234"));

    assert_eq!(ConfigValue::decode("true").as_str().as_deref(), Some("true"));
    assert_eq!(ConfigValue::decode("[1, 2]").as_str(), None);
}
