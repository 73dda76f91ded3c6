#![allow(dead_code)]
use assert_cmd::{Command, cargo_bin_cmd};
use rberichtsheft::db::{Database, Repository};
use rberichtsheft::db::initialize::init_db;
use rberichtsheft::models::{Category, DayEntry, Report, Weekday};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub fn rbh() -> Command {
    cargo_bin_cmd!("rberichtsheft")
}

/// Fresh directory holding the test DB; legacy files dropped next to it are picked up.
pub fn setup_test_dir() -> (TempDir, String) {
    let dir = tempfile::tempdir().expect("tempdir");
    let db_path = dir
        .path()
        .join("rberichtsheft.sqlite")
        .to_string_lossy()
        .to_string();
    (dir, db_path)
}

/// Run `init` in test mode so no config file is written.
pub fn init_cli_db(db_path: &str) {
    rbh()
        .args(["--db", db_path, "--test", "init"])
        .assert()
        .success();
}

/// Migrated in-memory store.
pub fn memory_repo() -> Repository {
    let db = Database::connect_in_memory().expect("connect");
    init_db(&db, None).expect("migrate");
    Repository::new(db)
}

/// Migrated file-backed store in `dir`.
pub fn file_repo(dir: &Path) -> Repository {
    let db = Database::connect(db_file(dir)).expect("connect");
    init_db(&db, None).expect("migrate");
    Repository::new(db)
}

pub fn db_file(dir: &Path) -> PathBuf {
    dir.join("rberichtsheft.sqlite")
}

pub fn company_day(day: Weekday, text: &str) -> DayEntry {
    DayEntry::new(day, Category::Company, "08:00", text)
}

/// Full week: Monday to Thursday at the company, school on Friday.
pub fn sample_report(year: i32, week: u32, nr: i64) -> Report {
    let mut day_entries: Vec<DayEntry> = Weekday::ALL[..4]
        .iter()
        .map(|&d| company_day(d, &format!("{} work", d)))
        .collect();
    day_entries.push(DayEntry::new(
        Weekday::Friday,
        Category::School,
        "06:30",
        "Vocational school",
    ));

    Report {
        sequence_no: nr,
        trainee_name: "Max Mustermann".to_string(),
        year,
        iso_week: week,
        day_entries,
    }
}
