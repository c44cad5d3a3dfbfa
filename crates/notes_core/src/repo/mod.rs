//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define use-case oriented data access contracts.
//! - Isolate SQLite query details from service/business orchestration.
//!
//! # Invariants
//! - Repositories perform no business validation.
//! - Driver errors never cross the repository API unwrapped.

pub mod note_repo;
