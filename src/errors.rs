//! Unified application error type.
//! All modules (db, core, cli, utils) return AppError to keep the error
//! handling consistent and easy to manage.

use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    // ---------------------------
    // IO
    // ---------------------------
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    // ---------------------------
    // Database-related
    // ---------------------------
    /// Any failing statement. Callers only learn that the operation failed;
    /// the surrounding transaction guarantees nothing was written.
    #[error("Database error: {0}")]
    Db(#[from] rusqlite::Error),

    /// Unreachable path or unreadable file. The source is the I/O error of
    /// the directory creation or the rusqlite error of open/configure.
    #[error("Cannot open database '{path}': {source}")]
    Connection {
        path: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Database connection is closed")]
    NotConnected,

    #[error("Transaction error: {0}")]
    Transaction(String),

    #[error("Migration {version} ({name}) failed: {source}")]
    Migration {
        version: u32,
        name: String,
        #[source]
        source: rusqlite::Error,
    },

    #[error("Invalid migration source: {0}")]
    MigrationSource(String),

    // ---------------------------
    // Validation errors
    // ---------------------------
    #[error("Invalid ISO week: {0}")]
    InvalidWeek(String),

    #[error("Invalid hours format (expected HH:MM): {0}")]
    InvalidHours(String),

    #[error("Invalid category: {0}")]
    InvalidCategory(String),

    #[error("Invalid weekday: {0}")]
    InvalidWeekday(String),

    #[error("Invalid report: {0}")]
    InvalidReport(String),

    #[error("Report not found: {0}")]
    ReportNotFound(String),

    // ---------------------------
    // Serialization
    // ---------------------------
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    // ---------------------------
    // Config errors
    // ---------------------------
    #[error("Configuration error: {0}")]
    Config(String),

    // ---------------------------
    // Legacy import
    // ---------------------------
    #[error("Legacy import of '{file}' failed: {message}")]
    LegacyImport { file: String, message: String },

    // ---------------------------
    // Generic fallback
    // ---------------------------
    #[error("Internal error: {0}")]
    Other(String),
}

pub type AppResult<T> = Result<T, AppError>;
