use rberichtsheft::db::{Database, TxMode};
use rberichtsheft::errors::{AppError, AppResult};
use std::collections::BTreeMap;
use std::fs;

mod common;
use common::{db_file, file_repo, memory_repo, sample_report};

#[test]
fn test_failed_body_rolls_back_partial_writes() {
    let repo = memory_repo();
    repo.set_setting("kept", "yes").unwrap();

    let result: AppResult<()> = repo.with_transaction(TxMode::Write, |_| {
        repo.set_setting("kept", "overwritten")?;
        repo.set_setting("new_key", "value")?;
        repo.upsert_report(&sample_report(2024, 40, 1))?;
        repo.save_templates(&["t".to_string()])?;
        Err(AppError::Other("boom".to_string()))
    });
    assert!(result.is_err());

    let cfg = repo.load_configuration().unwrap();
    assert_eq!(cfg.len(), 1);
    assert_eq!(cfg["kept"].as_str().as_deref(), Some("yes"));
    assert!(repo.load_reports().unwrap().is_empty());
    assert!(repo.load_templates().unwrap().is_empty());
    assert_eq!(repo.database().transaction_depth(), 0);
}

#[test]
fn test_inner_failure_aborts_whole_bulk_import() {
    let repo = memory_repo();
    repo.upsert_report(&sample_report(2023, 10, 1)).unwrap();

    let mut batch = BTreeMap::new();
    batch.insert("2024-01".to_string(), sample_report(2024, 1, 2));
    batch.insert("2024-02".to_string(), sample_report(2024, 2, 3));
    batch.insert("2024-99".to_string(), sample_report(2024, 99, 4));

    assert!(repo.bulk_import_reports(&batch).is_err());

    let ids: Vec<String> = repo.load_reports().unwrap().into_keys().collect();
    assert_eq!(ids, vec!["2023-10"]);
}

#[test]
fn test_nested_calls_join_the_outer_transaction() {
    let repo = memory_repo();
    let db = repo.database();

    repo.with_transaction(TxMode::Write, |_| {
        assert_eq!(db.transaction_depth(), 1);
        db.with_transaction(TxMode::Write, |tx| {
            assert_eq!(db.transaction_depth(), 2);
            assert_eq!(tx.mode(), TxMode::Write);
            Ok(())
        })?;
        assert_eq!(db.transaction_depth(), 1);
        repo.upsert_report(&sample_report(2024, 40, 1))?;
        Ok(())
    })
    .unwrap();

    assert_eq!(db.transaction_depth(), 0);
    assert_eq!(repo.load_reports().unwrap().len(), 1);
}

#[test]
fn test_caught_inner_error_still_commits_outer_work() {
    let repo = memory_repo();

    repo.with_transaction(TxMode::Write, |_| {
        repo.upsert_report(&sample_report(2024, 40, 1))?;
        // the outer body decides the outcome
        let inner = repo.upsert_report(&sample_report(2024, 60, 2));
        assert!(inner.is_err());
        Ok(())
    })
    .unwrap();

    assert_eq!(repo.load_reports().unwrap().len(), 1);
}

#[test]
fn test_write_inside_read_transaction_is_refused() {
    let repo = memory_repo();

    let result = repo.with_transaction(TxMode::Read, |_| repo.set_setting("x", "1"));
    assert!(matches!(result, Err(AppError::Transaction(_))));

    assert!(repo.get_setting("x").unwrap().is_none());

    // reads nest fine
    let n = repo
        .with_transaction(TxMode::Read, |_| Ok(repo.load_configuration()?.len()))
        .unwrap();
    assert_eq!(n, 0);
}

#[test]
fn test_close_is_idempotent() {
    let mut db = Database::connect_in_memory().unwrap();
    assert!(db.is_open());

    db.close().unwrap();
    db.close().unwrap();
    assert!(!db.is_open());

    let result = db.with_transaction(TxMode::Read, |_| Ok(()));
    assert!(matches!(result, Err(AppError::NotConnected)));
}

#[test]
fn test_repository_hands_back_its_connection() {
    let repo = memory_repo();
    repo.set_setting("a", "1").unwrap();

    let mut db = repo.into_database();
    db.close().unwrap();
    assert!(matches!(db.connection(), Err(AppError::NotConnected)));
}

#[test]
fn test_connect_configures_pragmas() {
    let dir = tempfile::tempdir().unwrap();
    let db = Database::connect(dir.path().join("nested/dir/store.sqlite")).unwrap();
    let conn = db.connection().unwrap();

    let fk: i64 = conn
        .query_row("PRAGMA foreign_keys", [], |r| r.get(0))
        .unwrap();
    let journal: String = conn
        .query_row("PRAGMA journal_mode", [], |r| r.get(0))
        .unwrap();
    let sync: i64 = conn
        .query_row("PRAGMA synchronous", [], |r| r.get(0))
        .unwrap();

    assert_eq!(fk, 1);
    assert_eq!(journal.to_lowercase(), "wal");
    // NORMAL
    assert_eq!(sync, 1);
}

#[test]
fn test_connect_fails_on_unreachable_path() {
    let dir = tempfile::tempdir().unwrap();
    let blocker = dir.path().join("blocker");
    fs::write(&blocker, "a file, not a directory").unwrap();

    let err = Database::connect(blocker.join("store.sqlite"))
        .err()
        .unwrap();
    assert!(matches!(err, AppError::Connection { .. }));

    let source = std::error::Error::source(&err).unwrap();
    assert!(source.downcast_ref::<std::io::Error>().is_some());
}

#[test]
fn test_connect_fails_on_corrupt_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("corrupt.sqlite");
    fs::write(&path, vec![b'x'; 4096]).unwrap();

    let err = Database::connect(&path).err().unwrap();
    assert!(matches!(err, AppError::Connection { .. }));

    let source = std::error::Error::source(&err).unwrap();
    assert!(source.downcast_ref::<rusqlite::Error>().is_some());
}

#[test]
fn test_writer_contention_fails_instead_of_hanging() {
    let dir = tempfile::tempdir().unwrap();
    let repo = file_repo(dir.path());
    let other = Database::connect(db_file(dir.path())).unwrap();

    let outcome = repo.with_transaction(TxMode::Write, |_| {
        repo.set_setting("owner", "first")?;
        Ok(other.with_transaction(TxMode::Write, |_| Ok(())))
    });

    let inner = outcome.unwrap();
    assert!(inner.is_err());
    assert_eq!(
        repo.get_setting("owner").unwrap().unwrap().as_str().as_deref(),
        Some("first")
    );
}
