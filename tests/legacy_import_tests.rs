use rberichtsheft::config::Config;
use rberichtsheft::core::legacy::{
    LEGACY_CONFIG_FILE, LEGACY_REPORTS_FILE, LEGACY_TEMPLATES_FILE, LegacyImporter, LegacyOutcome,
};
use rberichtsheft::db::initialize::open_store;
use rberichtsheft::db::log::load_log;
use rberichtsheft::models::{Category, Weekday};
use std::fs;
use std::path::Path;

mod common;
use common::{db_file, file_repo, sample_report};

const REPORTS_JSON: &str = r#"{
    "2024-40": {
        "fortlaufende_nr": 12,
        "name_azubi": "Max Mustermann",
        "jahr": 2024,
        "kalenderwoche": 40,
        "tage_daten": [
            {"typ": "Betrieb", "stunden": "08:00", "taetigkeiten": "Lager"},
            {"typ": "Betrieb", "stunden": "08:00", "taetigkeiten": "Versand"},
            {"typ": "Schule", "stunden": "06:00", "taetigkeiten": "BWL"},
            {"typ": "Feiertag", "stunden": "", "taetigkeiten": ""},
            {"typ": "", "stunden": "07:30", "taetigkeiten": "Inventur"}
        ]
    },
    "2024-41": {
        "fortlaufende_nr": "13",
        "name_azubi": "Max Mustermann",
        "jahr": "2024",
        "kalenderwoche": "41",
        "tage_daten": [
            {"tag_name": "Freitag", "typ": "Krank", "stunden": "", "taetigkeiten": ""}
        ]
    }
}"#;

fn write_legacy(dir: &Path, name: &str, content: &str) {
    fs::write(dir.join(name), content).unwrap();
}

#[test]
fn test_all_legacy_files_migrate_and_disappear() {
    let dir = tempfile::tempdir().unwrap();
    let repo = file_repo(dir.path());

    write_legacy(
        dir.path(),
        LEGACY_CONFIG_FILE,
        r#"{"name_azubi": "Max Mustermann", "einstellungen": {"default_stunden": {"Montag": "07:30"}}}"#,
    );
    write_legacy(dir.path(), LEGACY_REPORTS_FILE, REPORTS_JSON);
    write_legacy(dir.path(), LEGACY_TEMPLATES_FILE, r#"["Lager", "Versand"]"#);

    let summary = LegacyImporter::new(&repo, dir.path()).run();
    assert_eq!(summary.configuration, LegacyOutcome::Imported(2));
    assert_eq!(summary.reports, LegacyOutcome::Imported(2));
    assert_eq!(summary.templates, LegacyOutcome::Imported(2));
    assert!(!summary.has_failures());

    for name in [LEGACY_CONFIG_FILE, LEGACY_REPORTS_FILE, LEGACY_TEMPLATES_FILE] {
        assert!(!dir.path().join(name).exists(), "{name} still present");
    }

    let cfg = repo.load_configuration().unwrap();
    assert_eq!(cfg["name_azubi"].as_str().as_deref(), Some("Max Mustermann"));
    assert!(cfg["einstellungen"].as_json().is_object());

    let reports = repo.load_reports().unwrap();
    let week40 = &reports["2024-40"];
    assert_eq!(week40.sequence_no, 12);
    assert_eq!(week40.day_entries.len(), 5);
    assert_eq!(week40.day_entries[2].weekday, Weekday::Wednesday);
    assert_eq!(week40.day_entries[2].category, Category::School);
    assert_eq!(week40.day_entries[3].category, Category::Holiday);
    assert_eq!(week40.day_entries[3].hours, "0:00");
    assert_eq!(week40.day_entries[4].category, Category::Company);

    let week41 = &reports["2024-41"];
    assert_eq!(week41.sequence_no, 13);
    assert_eq!(week41.day_entries[0].weekday, Weekday::Friday);
    assert_eq!(week41.day_entries[0].category, Category::Sick);

    assert_eq!(repo.load_templates().unwrap(), vec!["Lager", "Versand"]);

    let logged = load_log(repo.database())
        .unwrap()
        .into_iter()
        .filter(|e| e.operation == "legacy_import")
        .count();
    assert_eq!(logged, 3);
}

#[test]
fn test_second_run_finds_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let repo = file_repo(dir.path());
    write_legacy(dir.path(), LEGACY_TEMPLATES_FILE, r#"["a"]"#);

    LegacyImporter::new(&repo, dir.path()).run();
    let again = LegacyImporter::new(&repo, dir.path()).run();

    assert_eq!(again.configuration, LegacyOutcome::Missing);
    assert_eq!(again.reports, LegacyOutcome::Missing);
    assert_eq!(again.templates, LegacyOutcome::Missing);
    assert_eq!(repo.load_templates().unwrap(), vec!["a"]);
}

#[test]
fn test_broken_file_is_kept_and_others_still_migrate() {
    let dir = tempfile::tempdir().unwrap();
    let repo = file_repo(dir.path());

    write_legacy(dir.path(), LEGACY_REPORTS_FILE, "{ not json");
    write_legacy(dir.path(), LEGACY_TEMPLATES_FILE, r#"["kept going"]"#);

    let summary = LegacyImporter::new(&repo, dir.path()).run();
    assert!(summary.reports.failure().is_some());
    assert_eq!(summary.templates.imported(), Some(1));
    assert!(summary.has_failures());

    assert!(dir.path().join(LEGACY_REPORTS_FILE).exists());
    assert!(!dir.path().join(LEGACY_TEMPLATES_FILE).exists());
    assert!(repo.load_reports().unwrap().is_empty());
}

#[test]
fn test_invalid_report_aborts_the_whole_file() {
    let dir = tempfile::tempdir().unwrap();
    let repo = file_repo(dir.path());

    let six_days = r#"{
        "2024-40": {"jahr": 2024, "kalenderwoche": 40, "tage_daten": []},
        "2024-41": {"jahr": 2024, "kalenderwoche": 41, "tage_daten": [
            {"typ": "Betrieb"}, {"typ": "Betrieb"}, {"typ": "Betrieb"},
            {"typ": "Betrieb"}, {"typ": "Betrieb"}, {"typ": "Betrieb"}
        ]}
    }"#;
    write_legacy(dir.path(), LEGACY_REPORTS_FILE, six_days);

    let summary = LegacyImporter::new(&repo, dir.path()).run();
    assert!(summary.reports.failure().is_some());
    assert!(dir.path().join(LEGACY_REPORTS_FILE).exists());
    assert!(repo.load_reports().unwrap().is_empty());
}

#[test]
fn test_legacy_data_merges_with_existing_rows() {
    let dir = tempfile::tempdir().unwrap();
    let repo = file_repo(dir.path());

    repo.set_setting("name_azubi", "Old Name").unwrap();
    repo.set_setting("untouched", "stays").unwrap();
    repo.upsert_report(&sample_report(2024, 39, 11)).unwrap();
    repo.save_templates(&["Lager".to_string()]).unwrap();

    write_legacy(dir.path(), LEGACY_CONFIG_FILE, r#"{"name_azubi": "New Name"}"#);
    write_legacy(dir.path(), LEGACY_REPORTS_FILE, REPORTS_JSON);
    write_legacy(
        dir.path(),
        LEGACY_TEMPLATES_FILE,
        r#"["Lager", "Versand", "  ", "Versand"]"#,
    );

    let summary = LegacyImporter::new(&repo, dir.path()).run();
    assert_eq!(summary.templates, LegacyOutcome::Imported(1));

    let cfg = repo.load_configuration().unwrap();
    assert_eq!(cfg["name_azubi"].as_str().as_deref(), Some("New Name"));
    assert_eq!(cfg["untouched"].as_str().as_deref(), Some("stays"));

    let ids: Vec<String> = repo.load_reports().unwrap().into_keys().collect();
    assert_eq!(ids, vec!["2024-39", "2024-40", "2024-41"]);

    assert_eq!(repo.load_templates().unwrap(), vec!["Lager", "Versand"]);
}

#[test]
fn test_startup_sequence_runs_the_importer() {
    let dir = tempfile::tempdir().unwrap();
    write_legacy(dir.path(), LEGACY_REPORTS_FILE, REPORTS_JSON);

    let cfg = Config {
        database: db_file(dir.path()).to_string_lossy().to_string(),
        ..Config::default()
    };

    let repo = open_store(&cfg).unwrap();
    assert_eq!(repo.load_reports().unwrap().len(), 2);
    assert!(!dir.path().join(LEGACY_REPORTS_FILE).exists());
}
