//! SQLite-backed key-value storage.
//!
//! Schema:
//! - `kv` table: key (TEXT PRIMARY KEY), value (TEXT)
//!
//! Every value is an opaque string; the journal stores its whole history as
//! one JSON blob under a single key.

use std::path::{Path, PathBuf};

use rusqlite::{params, Connection, OptionalExtension};
use tracing::debug;

use super::error::{Result, StoreError};

const SCHEMA: &str = "CREATE TABLE IF NOT EXISTS kv (
    key   TEXT PRIMARY KEY NOT NULL,
    value TEXT NOT NULL
)";

/// Key-value storage interface over a single SQLite database file
pub struct Storage {
    conn: Connection,
    path: Option<PathBuf>,
}

impl Storage {
    /// Open (or create) the database at `path`, creating parent directories as needed
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            // A missing directory surfaces as an open error below
            let _ = std::fs::create_dir_all(parent);
        }
        let conn = Connection::open(path).map_err(|source| StoreError::Open {
            path: path.display().to_string(),
            source,
        })?;
        conn.execute(SCHEMA, []).map_err(StoreError::Write)?;
        debug!(path = %path.display(), "opened key-value storage");
        Ok(Storage {
            conn,
            path: Some(path.to_path_buf()),
        })
    }

    /// In-memory storage, used by tests
    #[allow(dead_code)] // Used in tests
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(|source| StoreError::Open {
            path: ":memory:".to_string(),
            source,
        })?;
        conn.execute(SCHEMA, []).map_err(StoreError::Write)?;
        Ok(Storage { conn, path: None })
    }

    /// Location of the database file, if file-backed
    #[allow(dead_code)] // Used in tests
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn get(&self, key: &str) -> Result<Option<String>> {
        self.conn
            .query_row("SELECT value FROM kv WHERE key = ?1", [key], |row| row.get(0))
            .optional()
            .map_err(StoreError::Read)
    }

    /// Insert or fully overwrite the value stored under `key`
    pub fn set(&self, key: &str, value: &str) -> Result<()> {
        self.conn
            .execute(
                "INSERT INTO kv (key, value) VALUES (?1, ?2)
                 ON CONFLICT(key) DO UPDATE SET value = excluded.value",
                params![key, value],
            )
            .map_err(StoreError::Write)?;
        Ok(())
    }

    pub fn remove(&self, key: &str) -> Result<()> {
        self.conn
            .execute("DELETE FROM kv WHERE key = ?1", [key])
            .map_err(StoreError::Write)?;
        Ok(())
    }
}
