use std::path::Path;

use contracts::{LogEntry, Location};
use rusqlite::{params, Connection, OptionalExtension};
use serde::Serialize;
use serde_json::Value;

const CALCULATIONS_RUN_KEY: &str = "calculations_run";
const USER_LOCATION_KEY: &str = "user_location";

#[derive(Debug, thiserror::Error)]
pub enum PersistenceError {
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("serde error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("sqlite store is not attached")]
    NotAttached,
}

/// Append-only calculation log plus a small key-value settings table.
#[derive(Debug)]
pub struct SqliteLogStore {
    conn: Connection,
}

impl SqliteLogStore {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, PersistenceError> {
        let conn = Connection::open(path)?;
        let mut store = Self { conn };
        store.configure()?;
        store.migrate()?;
        Ok(store)
    }

    pub fn open_in_memory() -> Result<Self, PersistenceError> {
        let mut store = Self {
            conn: Connection::open_in_memory()?,
        };
        store.migrate()?;
        Ok(store)
    }

    /// Appends one calculation and returns its row id.
    pub fn record<T: Serialize + ?Sized>(
        &mut self,
        module: &str,
        query: &str,
        result: &T,
    ) -> Result<i64, PersistenceError> {
        let result_json = serde_json::to_string(result)?;
        self.conn.execute(
            "INSERT INTO logs (module, query, result_json) VALUES (?1, ?2, ?3)",
            params![module, query, result_json],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    /// Entries newest first, optionally restricted to one module tag.
    pub fn list(&self, module: Option<&str>) -> Result<Vec<LogEntry>, PersistenceError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, module, query, result_json, timestamp
             FROM logs
             WHERE ?1 IS NULL OR module = ?1
             ORDER BY timestamp DESC, id DESC",
        )?;

        let rows = stmt.query_map(params![module], |row| {
            Ok((
                row.get::<_, i64>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, String>(3)?,
                row.get::<_, String>(4)?,
            ))
        })?;

        let mut entries = Vec::new();
        for row in rows {
            let (id, module, query, result_json, timestamp) = row?;
            entries.push(LogEntry {
                id,
                module,
                query,
                result: serde_json::from_str::<Value>(&result_json)?,
                timestamp,
            });
        }

        Ok(entries)
    }

    pub fn calculations_run(&self) -> Result<u64, PersistenceError> {
        Ok(self
            .load_setting::<u64>(CALCULATIONS_RUN_KEY)?
            .unwrap_or(0))
    }

    pub fn increment_calculations_run(&mut self) -> Result<u64, PersistenceError> {
        let next = self.calculations_run()? + 1;
        self.store_setting(CALCULATIONS_RUN_KEY, &next)?;
        Ok(next)
    }

    pub fn load_location(&self) -> Result<Option<Location>, PersistenceError> {
        self.load_setting(USER_LOCATION_KEY)
    }

    pub fn store_location(&mut self, location: &Location) -> Result<(), PersistenceError> {
        self.store_setting(USER_LOCATION_KEY, location)
    }

    fn load_setting<T: serde::de::DeserializeOwned>(
        &self,
        key: &str,
    ) -> Result<Option<T>, PersistenceError> {
        let raw: Option<String> = self
            .conn
            .query_row(
                "SELECT value_json FROM settings WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()?;

        match raw {
            Some(raw) => Ok(Some(serde_json::from_str::<T>(&raw)?)),
            None => Ok(None),
        }
    }

    fn store_setting<T: Serialize + ?Sized>(
        &mut self,
        key: &str,
        value: &T,
    ) -> Result<(), PersistenceError> {
        let value_json = serde_json::to_string(value)?;
        self.conn.execute(
            "INSERT INTO settings (key, value_json, updated_at)
             VALUES (?1, ?2, CURRENT_TIMESTAMP)
             ON CONFLICT(key) DO UPDATE SET
                value_json = excluded.value_json,
                updated_at = excluded.updated_at",
            params![key, value_json],
        )?;
        Ok(())
    }

    fn configure(&mut self) -> Result<(), PersistenceError> {
        self.conn.pragma_update(None, "journal_mode", "WAL")?;
        Ok(())
    }

    fn migrate(&mut self) -> Result<(), PersistenceError> {
        self.conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS schema_migrations (
                version INTEGER PRIMARY KEY,
                name TEXT NOT NULL,
                applied_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
            );

            CREATE TABLE IF NOT EXISTS logs (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                module TEXT NOT NULL,
                query TEXT NOT NULL,
                result_json TEXT NOT NULL,
                timestamp TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
            );

            CREATE TABLE IF NOT EXISTS settings (
                key TEXT PRIMARY KEY,
                value_json TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_logs_module_timestamp ON logs(module, timestamp);
            ",
        )?;

        self.conn.execute(
            "INSERT OR IGNORE INTO schema_migrations(version, name) VALUES(1, 'initial_v1')",
            [],
        )?;

        Ok(())
    }
}
