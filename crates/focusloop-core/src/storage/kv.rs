//! SQLite-backed key-value store.

use std::path::Path;

use rusqlite::{params, Connection, OptionalExtension};

use super::{data_dir, Storage};
use crate::error::PersistenceError;

pub const DB_FILE: &str = "focusloop.db";

/// Key-value store in a single SQLite table.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Open the store at `<data dir>/focusloop.db`.
    ///
    /// # Errors
    /// Returns an error if the data directory or the database cannot be opened.
    pub fn open_default() -> Result<Self, PersistenceError> {
        Self::open(data_dir()?.join(DB_FILE))
    }

    /// Open (or create) the store at `path`.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, PersistenceError> {
        let path = path.as_ref();
        let conn = Connection::open(path).map_err(|source| PersistenceError::OpenFailed {
            path: path.to_path_buf(),
            source,
        })?;
        let store = Self { conn };
        store.migrate()?;
        Ok(store)
    }

    /// Open an in-memory database.
    pub fn open_memory() -> Result<Self, PersistenceError> {
        let conn = Connection::open_in_memory().map_err(PersistenceError::from_sqlite)?;
        let store = Self { conn };
        store.migrate()?;
        Ok(store)
    }

    fn migrate(&self) -> Result<(), PersistenceError> {
        self.conn
            .execute_batch(
                "CREATE TABLE IF NOT EXISTS kv (
                    key   TEXT PRIMARY KEY,
                    value BLOB NOT NULL
                );",
            )
            .map_err(PersistenceError::from_sqlite)
    }
}

impl Storage for SqliteStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, PersistenceError> {
        self.conn
            .query_row("SELECT value FROM kv WHERE key = ?1", params![key], |row| {
                row.get::<_, Vec<u8>>(0)
            })
            .optional()
            .map_err(PersistenceError::from_sqlite)
    }

    fn set(&self, key: &str, value: &[u8]) -> Result<(), PersistenceError> {
        self.conn
            .execute(
                "INSERT OR REPLACE INTO kv (key, value) VALUES (?1, ?2)",
                params![key, value],
            )
            .map_err(PersistenceError::from_sqlite)?;
        Ok(())
    }
}
