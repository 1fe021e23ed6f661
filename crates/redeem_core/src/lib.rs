//! Core domain logic for the redemption code registry.
//! This crate is the single source of truth for code lifecycle invariants.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use logging::{default_log_level, init_logging, logging_status};
pub use model::code::{CodeId, CodeRecord, CodeStatus, CodeValidationError};
pub use repo::slot_repo::{MemorySlotRepository, SlotRepository, SqliteSlotRepository};
pub use repo::snapshot::{decode_snapshot, encode_snapshot, SnapshotError};
pub use repo::{RepoError, RepoResult};
pub use service::clock::{Clock, FixedClock, SystemClock};
pub use service::registry::{
    CodeCounts, CodeFilter, CodeRegistry, EmptyState, MutationOutcome, ParseFilterError,
    RegistryError, RegistryResult, Rejection, DEFAULT_SLOT_KEY,
};
