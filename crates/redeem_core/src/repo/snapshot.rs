//! Code collection snapshot encoding.
//!
//! # Responsibility
//! - Encode the full ordered record list as one JSON array.
//! - Decode and validate a stored array back into records.
//!
//! # Invariants
//! - Order is preserved in both directions.
//! - Absent optional fields are omitted on write; `null` and `""` are read
//!   as absent.
//! - Decoding rejects invariant violations instead of masking them.

use super::slot_repo::SlotRepository;
use super::RepoResult;
use crate::model::code::{CodeId, CodeRecord, CodeValidationError};
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Snapshot encode/decode failure.
#[derive(Debug)]
pub enum SnapshotError {
    Json(serde_json::Error),
    Validation(CodeValidationError),
    DuplicateId(CodeId),
}

impl Display for SnapshotError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Json(err) => write!(f, "invalid code snapshot json: {err}"),
            Self::Validation(err) => write!(f, "invalid code record in snapshot: {err}"),
            Self::DuplicateId(id) => write!(f, "duplicate code id `{id}` in snapshot"),
        }
    }
}

impl Error for SnapshotError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Json(err) => Some(err),
            Self::Validation(err) => Some(err),
            Self::DuplicateId(_) => None,
        }
    }
}

impl From<serde_json::Error> for SnapshotError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

impl From<CodeValidationError> for SnapshotError {
    fn from(value: CodeValidationError) -> Self {
        Self::Validation(value)
    }
}

/// Serializes records into the slot value format.
pub fn encode_snapshot(records: &[CodeRecord]) -> Result<String, SnapshotError> {
    Ok(serde_json::to_string(records)?)
}

/// Parses and validates a slot value.
///
/// # Errors
/// - `Json` for malformed text or a wrong shape.
/// - `Validation` when a record breaks `CodeRecord::validate()`.
/// - `DuplicateId` when two records share an id.
pub fn decode_snapshot(raw: &str) -> Result<Vec<CodeRecord>, SnapshotError> {
    let records: Vec<CodeRecord> = serde_json::from_str(raw)?;
    let mut seen = HashSet::with_capacity(records.len());
    for record in &records {
        record.validate()?;
        if !seen.insert(&record.id) {
            return Err(SnapshotError::DuplicateId(record.id.clone()));
        }
    }
    Ok(records)
}

/// Reads the snapshot stored under `key`. `Ok(None)` when the slot is empty.
pub fn read_snapshot<R: SlotRepository>(
    repo: &R,
    key: &str,
) -> RepoResult<Option<Vec<CodeRecord>>> {
    match repo.get(key)? {
        Some(raw) => Ok(Some(decode_snapshot(&raw)?)),
        None => Ok(None),
    }
}

/// Replaces the snapshot stored under `key`.
pub fn write_snapshot<R: SlotRepository>(
    repo: &R,
    key: &str,
    records: &[CodeRecord],
) -> RepoResult<()> {
    let raw = encode_snapshot(records)?;
    repo.set(key, &raw)
}
