//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the key-value slot contract the registry persists through.
//! - Keep SQLite and JSON encoding details out of the registry service.
//!
//! # Invariants
//! - A slot value is always a complete snapshot; there are no partial writes.
//! - Decoded snapshots satisfy `CodeRecord::validate()` and have unique ids.

use crate::db::DbError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod slot_repo;
pub mod snapshot;

use snapshot::SnapshotError;

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for slot storage and snapshot encoding.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    Snapshot(SnapshotError),
    InvalidKey(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::Snapshot(err) => write!(f, "{err}"),
            Self::InvalidKey(key) => write!(f, "invalid slot key `{key}`"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Snapshot(err) => Some(err),
            Self::InvalidKey(_) => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

impl From<SnapshotError> for RepoError {
    fn from(value: SnapshotError) -> Self {
        Self::Snapshot(value)
    }
}
