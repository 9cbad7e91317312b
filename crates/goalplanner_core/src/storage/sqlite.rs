//! SQLite-backed key-value store over the `kv_records` table.
//!
//! # Invariants
//! - Construction rejects connections whose schema is not fully migrated.
//! - `set` is an upsert; `updated_at` is refreshed on every write.

use super::{KvError, KvResult, KvStore};
use crate::db::migrations::{current_user_version, latest_version};
use rusqlite::{params, Connection, OptionalExtension};
use std::borrow::Borrow;

/// Holds either an owned `Connection` or a borrowed `&Connection`.
pub struct SqliteKvStore<C: Borrow<Connection>> {
    conn: C,
}

impl<C: Borrow<Connection>> SqliteKvStore<C> {
    /// Wraps a connection returned by `open_db`/`open_db_in_memory`.
    ///
    /// # Errors
    /// - `UninitializedConnection` when `PRAGMA user_version` is not the
    ///   latest migration.
    pub fn try_new(conn: C) -> KvResult<Self> {
        let expected_version = latest_version();
        let actual_version = current_user_version(conn.borrow())?;
        if actual_version != expected_version {
            return Err(KvError::UninitializedConnection {
                expected_version,
                actual_version,
            });
        }
        Ok(Self { conn })
    }

    /// Lists stored keys in ascending order.
    pub fn keys(&self) -> KvResult<Vec<String>> {
        let mut stmt = self
            .connection()
            .prepare("SELECT key FROM kv_records ORDER BY key ASC;")?;
        let keys = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(keys)
    }

    pub fn connection(&self) -> &Connection {
        self.conn.borrow()
    }
}

impl<C: Borrow<Connection>> KvStore for SqliteKvStore<C> {
    fn get(&self, key: &str) -> KvResult<Option<Vec<u8>>> {
        let value = self
            .connection()
            .query_row(
                "SELECT value FROM kv_records WHERE key = ?1;",
                [key],
                |row| row.get::<_, Vec<u8>>(0),
            )
            .optional()?;
        Ok(value)
    }

    fn set(&self, key: &str, value: &[u8]) -> KvResult<()> {
        self.connection().execute(
            "INSERT INTO kv_records (key, value, updated_at)
             VALUES (?1, ?2, (strftime('%s', 'now') * 1000))
             ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at;",
            params![key, value],
        )?;
        Ok(())
    }
}
