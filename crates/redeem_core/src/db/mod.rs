//! SQLite file holding the registry's key-value slots.
//!
//! # Responsibility
//! - Open the slot database (a file or a private in-memory store) and bring
//!   its `kv_slots` table up to date before `SqliteSlotRepository` sees it.
//! - Report storage failures as [`DbError`] so the repository layer can wrap
//!   them in `RepoError::Db`.
//!
//! # Invariants
//! - Schema version is tracked via `PRAGMA user_version`.
//! - A connection is only returned once `kv_slots` exists; a slot read never
//!   meets a missing table.
//! - A file written by a newer build is refused instead of being downgraded,
//!   so its snapshot stays intact.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod migrations;
mod open;

pub use open::{open_db, open_db_in_memory};

pub type DbResult<T> = Result<T, DbError>;

/// Failure while opening or migrating the slot database.
#[derive(Debug)]
pub enum DbError {
    /// Opening the file, setting the busy timeout or running a migration failed.
    Sqlite(rusqlite::Error),
    /// The file's `user_version` is ahead of the bundled migrations.
    UnsupportedSchemaVersion {
        db_version: u32,
        latest_supported: u32,
    },
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "{err}"),
            Self::UnsupportedSchemaVersion {
                db_version,
                latest_supported,
            } => write!(
                f,
                "slot database schema version {db_version} is newer than supported {latest_supported}"
            ),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) => Some(err),
            Self::UnsupportedSchemaVersion { .. } => None,
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}
