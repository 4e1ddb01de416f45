//! Key-value persistence with per-key expiry
//!
//! A single SQLite table stands in for the cache the sessions live in.
//! Every write replaces both the value and its expiry; expired rows read
//! as absent and are deleted by `purge_expired`.

use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use thiserror::Error;

/// SQL schema for initialization
const SCHEMA: &str = r"
CREATE TABLE IF NOT EXISTS kv (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL,
    expires_at INTEGER NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_kv_expires ON kv(expires_at);
";

#[derive(Error, Debug)]
pub enum DbError {
    #[error("Database error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("Database lock poisoned")]
    Poisoned,
}

pub type DbResult<T> = Result<T, DbError>;

/// Thread-safe database handle
#[derive(Clone)]
pub struct Database {
    conn: Arc<Mutex<Connection>>,
}

impl Database {
    /// Open or create database at the given path
    pub fn open<P: AsRef<Path>>(path: P) -> DbResult<Self> {
        let conn = Connection::open(path)?;
        Self::init(conn)
    }

    /// Open an in-memory database (for testing)
    #[allow(dead_code)] // Used in tests
    pub fn open_in_memory() -> DbResult<Self> {
        let conn = Connection::open_in_memory()?;
        Self::init(conn)
    }

    fn init(conn: Connection) -> DbResult<Self> {
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    fn lock(&self) -> DbResult<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| DbError::Poisoned)
    }

    /// Get a live value, ignoring expired rows
    pub fn get(&self, key: &str) -> DbResult<Option<String>> {
        let conn = self.lock()?;
        let value = conn
            .query_row(
                "SELECT value FROM kv WHERE key = ?1 AND expires_at > ?2",
                params![key, now_millis()],
                |row| row.get(0),
            )
            .optional()?;
        Ok(value)
    }

    /// Write a value, replacing any previous value and expiry
    pub fn set(&self, key: &str, value: &str, ttl: Duration) -> DbResult<()> {
        let ttl_millis = i64::try_from(ttl.as_millis()).unwrap_or(i64::MAX);
        let expires_at = now_millis().saturating_add(ttl_millis);
        let conn = self.lock()?;
        conn.execute(
            "INSERT INTO kv (key, value, expires_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value, expires_at = excluded.expires_at",
            params![key, value, expires_at],
        )?;
        Ok(())
    }

    /// Delete every expired row, returning how many were removed
    pub fn purge_expired(&self) -> DbResult<usize> {
        let conn = self.lock()?;
        let removed = conn.execute("DELETE FROM kv WHERE expires_at <= ?1", params![now_millis()])?;
        Ok(removed)
    }

    /// Remaining lifetime of a live key
    #[allow(dead_code)] // Used in tests
    pub fn ttl(&self, key: &str) -> DbResult<Option<Duration>> {
        let conn = self.lock()?;
        let now = now_millis();
        let expires_at: Option<i64> = conn
            .query_row(
                "SELECT expires_at FROM kv WHERE key = ?1 AND expires_at > ?2",
                params![key, now],
                |row| row.get(0),
            )
            .optional()?;
        Ok(expires_at.map(|at| Duration::from_millis(u64::try_from(at - now).unwrap_or(0))))
    }
}

fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}
