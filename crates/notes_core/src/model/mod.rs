//! Domain model for notes.
//!
//! # Responsibility
//! - Define canonical data structures used by core business logic.
//! - Keep boundary payload checks next to the types they guard.
//!
//! # Invariants
//! - Every persisted note is identified by a storage-assigned `NoteId`.
//! - Deletion is a hard delete; there are no tombstones.

pub mod note;
