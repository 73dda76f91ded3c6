//! SQLite connection and transaction manager.
//!
//! One `Database` owns the single connection of the process. Every write goes
//! through [`Database::with_transaction`], which composes: a call made while
//! another transaction is open joins it instead of opening a nested one, so
//! the outermost call stays the only commit point.

use crate::errors::{AppError, AppResult};
use crate::utils::path::is_in_memory;
use rusqlite::{Connection, Transaction, TransactionBehavior};
use std::cell::Cell;
use std::fs;
use std::ops::Deref;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TxMode {
    /// `BEGIN DEFERRED`
    Read,
    /// `BEGIN IMMEDIATE`: takes the write lock up front, so contention fails
    /// right away instead of midway through the body.
    Write,
}

pub struct Database {
    path: PathBuf,
    conn: Option<Connection>,
    depth: Cell<u32>,
    outer_mode: Cell<TxMode>,
}

impl Database {
    /// Open (or create) the database at `path` and configure it.
    ///
    /// `":memory:"` opens a private in-memory database.
    pub fn connect(path: impl AsRef<Path>) -> AppResult<Self> {
        let path = path.as_ref().to_path_buf();

        let conn = open_connection(&path).map_err(|source| {
            error!(path = %path.display(), error = %source, "cannot open database");
            AppError::Connection {
                path: path.display().to_string(),
                source,
            }
        })?;

        info!(path = %path.display(), "database connection established");

        Ok(Self {
            path,
            conn: Some(conn),
            depth: Cell::new(0),
            outer_mode: Cell::new(TxMode::Read),
        })
    }

    pub fn connect_in_memory() -> AppResult<Self> {
        Self::connect(crate::utils::path::IN_MEMORY)
    }

    /// Release the connection. Calling it again is a no-op.
    pub fn close(&mut self) -> AppResult<()> {
        if let Some(conn) = self.conn.take() {
            conn.close().map_err(|(_, e)| AppError::Db(e))?;
            info!(path = %self.path.display(), "database connection closed");
        }
        Ok(())
    }

    pub fn is_open(&self) -> bool {
        self.conn.is_some()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of `with_transaction` scopes currently open on this connection.
    pub fn transaction_depth(&self) -> u32 {
        self.depth.get()
    }

    /// Raw access for statements that must run outside a transaction
    /// (`VACUUM`, integrity checks, pragmas).
    pub fn connection(&self) -> AppResult<&Connection> {
        self.conn.as_ref().ok_or(AppError::NotConnected)
    }

    /// Run `body` atomically.
    ///
    /// At depth 0 this begins a transaction (DEFERRED for `Read`, IMMEDIATE
    /// for `Write`), commits when `body` returns `Ok` and rolls back when it
    /// returns `Err`. When a transaction is already open, `body` runs inside
    /// it and the outer scope decides the outcome; the inner error still
    /// propagates so the outer body aborts with it.
    pub fn with_transaction<T, F>(&self, mode: TxMode, body: F) -> AppResult<T>
    where
        F: FnOnce(&Tx<'_>) -> AppResult<T>,
    {
        let conn = self.connection()?;

        if self.depth.get() > 0 {
            if mode == TxMode::Write && self.outer_mode.get() == TxMode::Read {
                return Err(AppError::Transaction(
                    "write requested inside a read-only transaction".to_string(),
                ));
            }
            let _scope = DepthGuard::enter(&self.depth);
            debug!(depth = self.depth.get(), "joining open transaction");
            return body(&Tx { conn, mode });
        }

        let behavior = match mode {
            TxMode::Read => TransactionBehavior::Deferred,
            TxMode::Write => TransactionBehavior::Immediate,
        };
        let tx = Transaction::new_unchecked(conn, behavior)?;
        self.outer_mode.set(mode);

        let result = {
            let _scope = DepthGuard::enter(&self.depth);
            body(&Tx { conn: &tx, mode })
        };

        match result {
            Ok(value) => {
                tx.commit()?;
                Ok(value)
            }
            Err(e) => {
                error!(error = %e, "transaction failed, rolling back");
                if let Err(rb) = tx.rollback() {
                    error!(error = %rb, "rollback failed");
                }
                Err(e)
            }
        }
    }
}

/// Statement executor handed to a transaction body.
pub struct Tx<'a> {
    conn: &'a Connection,
    mode: TxMode,
}

impl Tx<'_> {
    pub fn mode(&self) -> TxMode {
        self.mode
    }
}

impl Deref for Tx<'_> {
    type Target = Connection;

    fn deref(&self) -> &Connection {
        self.conn
    }
}

struct DepthGuard<'a>(&'a Cell<u32>);

impl<'a> DepthGuard<'a> {
    fn enter(depth: &'a Cell<u32>) -> Self {
        depth.set(depth.get() + 1);
        Self(depth)
    }
}

impl Drop for DepthGuard<'_> {
    fn drop(&mut self) {
        self.0.set(self.0.get().saturating_sub(1));
    }
}

type OpenError = Box<dyn std::error::Error + Send + Sync>;

fn open_connection(path: &Path) -> Result<Connection, OpenError> {
    let conn = if is_in_memory(path) {
        Connection::open_in_memory()?
    } else {
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir)?;
        }
        Connection::open(path)?
    };

    // Pragmas touch the file header, so a corrupt file fails here.
    configure(&conn)?;
    Ok(conn)
}

/// Foreign keys on, WAL journaling, NORMAL sync: single writer, local data.
fn configure(conn: &Connection) -> rusqlite::Result<()> {
    conn.pragma_update(None, "foreign_keys", "ON")?;
    let mode: String =
        conn.pragma_update_and_check(None, "journal_mode", "WAL", |row| row.get(0))?;
    conn.pragma_update(None, "synchronous", "NORMAL")?;
    debug!(journal_mode = %mode, "connection configured");
    Ok(())
}
