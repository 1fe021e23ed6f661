//! Core use-case services.
//!
//! # Responsibility
//! - Own the in-memory code collection and its view state.
//! - Keep presentation callers decoupled from slot storage details.

pub mod clock;
pub mod registry;
