//! Core domain logic for the notes backend.
//! This crate is the single source of truth for note business invariants.

pub mod clock;
pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::CoreConfig;
pub use db::{
    open_db, open_db_temporary, ConnectionProvider, DbError, DbResult, SqliteFileProvider,
    SqliteTempProvider,
};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::note::{
    Note, NoteId, NoteInput, NoteSortKey, NoteValidationError, Timestamp, NOTE_TITLE_MAX_CHARS,
};
pub use repo::note_repo::{
    NoteListQuery, NoteRepository, RepoError, RepoResult, SqliteNoteRepository,
};
pub use service::note_service::{
    DeleteOutcome, NoteListRequest, NoteService, NoteServiceError, DEFAULT_SORT_BY,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
