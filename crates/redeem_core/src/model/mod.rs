//! Domain model for redemption codes.
//!
//! # Responsibility
//! - Define the canonical record shape shared by registry and storage.
//!
//! # Invariants
//! - Every record is identified by a stable `CodeId`.
//! - Deletion is a hard removal from the collection; there are no tombstones.

pub mod code;
