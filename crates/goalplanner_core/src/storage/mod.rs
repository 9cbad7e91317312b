//! Key-value byte store contract and implementations.
//!
//! # Responsibility
//! - Define the `get`/`set` boundary the persistence adapter writes through.
//! - Provide a SQLite-backed store and an in-memory store.
//!
//! # Invariants
//! - Stores hold opaque bytes; they never interpret record payloads.
//! - Every failure is reported as `KvError`; stores never panic.

use crate::db::DbError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod memory;
pub mod sqlite;

pub use memory::MemoryKvStore;
pub use sqlite::SqliteKvStore;

pub type KvResult<T> = Result<T, KvError>;

/// Failure raised by a key-value store.
#[derive(Debug)]
pub enum KvError {
    /// Storage is disabled, full, or otherwise refusing the call.
    Unavailable(String),
    Db(DbError),
    /// Connection schema is not at the version this binary expects.
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
}

impl Display for KvError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unavailable(reason) => write!(f, "key-value store unavailable: {reason}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "connection schema version {actual_version} does not match expected {expected_version}"
            ),
        }
    }
}

impl Error for KvError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Unavailable(_) | Self::UninitializedConnection { .. } => None,
        }
    }
}

impl From<DbError> for KvError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for KvError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// External byte-oriented key-value store.
///
/// Calls are synchronous from the caller's perspective.
pub trait KvStore {
    /// Returns the bytes stored under `key`, or `None` when absent.
    fn get(&self, key: &str) -> KvResult<Option<Vec<u8>>>;
    /// Stores `value` under `key`, replacing any previous bytes.
    fn set(&self, key: &str, value: &[u8]) -> KvResult<()>;
}

impl<T: KvStore + ?Sized> KvStore for &T {
    fn get(&self, key: &str) -> KvResult<Option<Vec<u8>>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &[u8]) -> KvResult<()> {
        (**self).set(key, value)
    }
}
