//! Connection layer under `SqliteKvStore`.
//!
//! The database holds a single `kv_records` table; everything the app
//! stores is a JSON blob keyed by `<namespace>:<record>`.
//!
//! # Invariants
//! - Every returned connection is migrated to `latest_version()`.
//! - A database written by a newer build is refused, never downgraded.

use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub mod migrations;
mod open;

pub use open::{open_db, open_db_in_memory, open_existing_db};

pub type DbResult<T> = Result<T, DbError>;

#[derive(Debug)]
pub enum DbError {
    /// Connect, pragma or migration statement failed.
    Sqlite(rusqlite::Error),
    /// `PRAGMA user_version` is ahead of the bundled migrations.
    UnsupportedSchemaVersion {
        db_version: u32,
        latest_supported: u32,
    },
    /// `open_existing_db` was pointed at a path with no file.
    Missing(PathBuf),
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "sqlite error: {err}"),
            Self::UnsupportedSchemaVersion {
                db_version,
                latest_supported,
            } => write!(
                f,
                "kv database is at schema version {db_version}; this build only knows up to {latest_supported}"
            ),
            Self::Missing(path) => write!(f, "no kv database at {}", path.display()),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) => Some(err),
            Self::UnsupportedSchemaVersion { .. } | Self::Missing(_) => None,
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}
