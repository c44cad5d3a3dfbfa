//! Note use-case service.
//!
//! # Responsibility
//! - Enforce note domain rules (ids, titles, sort keys) before storage access.
//! - Translate repository results into use-case outcomes.
//!
//! # Invariants
//! - Validation failures never reach the repository.
//! - Update/delete trust only the affected-row count, with no pre-read.
//! - Delete never returns persistence failures as `Err`; they are reported
//!   through `DeleteOutcome::Failed`.

use crate::model::note::{validate_title_present, Note, NoteId, NoteInput, NoteSortKey};
use crate::repo::note_repo::{NoteListQuery, NoteRepository, RepoError};
use log::{debug, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Sort key applied when callers do not choose one.
pub const DEFAULT_SORT_BY: &str = "createdAt";

/// Service error for note use-cases.
#[derive(Debug)]
pub enum NoteServiceError {
    /// Caller-supplied value violates a precondition.
    InvalidArgument(String),
    /// Target note does not exist at write time.
    NotFound(NoteId),
    /// Persistence-layer failure.
    Persistence(RepoError),
}

impl NoteServiceError {
    /// HTTP-equivalent status code for boundary layers.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::InvalidArgument(_) => 400,
            Self::NotFound(_) => 404,
            Self::Persistence(_) => 500,
        }
    }
}

impl Display for NoteServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidArgument(message) => write!(f, "invalid argument: {message}"),
            Self::NotFound(id) => write!(f, "note with id {id} not found"),
            Self::Persistence(err) => write!(f, "{err}"),
        }
    }
}

impl Error for NoteServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Persistence(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for NoteServiceError {
    fn from(value: RepoError) -> Self {
        Self::Persistence(value)
    }
}

/// Result of a delete request.
#[derive(Debug)]
pub enum DeleteOutcome {
    /// The row existed and was removed.
    Deleted,
    /// No row had this id; nothing to do.
    NotFound,
    /// Storage failed while deleting.
    Failed(RepoError),
}

impl DeleteOutcome {
    /// Collapsed boolean view: `true` only when a row was removed.
    pub fn is_deleted(&self) -> bool {
        matches!(self, Self::Deleted)
    }

    pub fn status_code(&self) -> u16 {
        match self {
            Self::Deleted => 204,
            Self::NotFound => 404,
            Self::Failed(_) => 500,
        }
    }
}

/// List parameters as received from a boundary layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteListRequest {
    /// Substring filter; `None` or empty lists every note.
    pub search: Option<String>,
    /// Sort key text; must name a [`NoteSortKey`].
    pub sort_by: Option<String>,
    pub ascending: bool,
}

impl Default for NoteListRequest {
    fn default() -> Self {
        Self {
            search: None,
            sort_by: Some(DEFAULT_SORT_BY.to_string()),
            ascending: false,
        }
    }
}

/// Note service facade over repository implementations.
pub struct NoteService<R: NoteRepository> {
    repo: R,
}

impl<R: NoteRepository> NoteService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Lists notes filtered by `search` and ordered by `sort_by`.
    ///
    /// # Errors
    /// - `InvalidArgument` when `sort_by` is absent, empty or unknown; no
    ///   storage access happens in that case.
    pub fn list_notes(&self, request: &NoteListRequest) -> Result<Vec<Note>, NoteServiceError> {
        let sort_key = parse_sort_key(request.sort_by.as_deref())?;
        let query = NoteListQuery {
            search: request.search.clone().filter(|value| !value.is_empty()),
            sort_key,
            ascending: request.ascending,
        };
        let notes = self.repo.list_notes(&query)?;
        debug!(
            "event=notes_list module=service status=ok sort_by={} ascending={} filtered={} count={}",
            sort_key,
            query.ascending,
            query.search.is_some(),
            notes.len()
        );
        Ok(notes)
    }

    /// Gets one note by id.
    pub fn get_note(&self, id: NoteId) -> Result<Option<Note>, NoteServiceError> {
        ensure_valid_id(id)?;
        Ok(self.repo.get_note(id)?)
    }

    /// Creates one note and returns its storage-assigned id.
    ///
    /// Only title presence is checked here; length limits belong to the
    /// boundary (`NoteInput::validate`).
    pub fn create_note(&self, input: &NoteInput) -> Result<NoteId, NoteServiceError> {
        ensure_title_present(input)?;
        Ok(self.repo.create_note(input)?)
    }

    /// Replaces title/content of an existing note.
    ///
    /// Returns `Ok(true)` once the row was rewritten. A row missing at write
    /// time surfaces as `NotFound`.
    pub fn update_note(&self, id: NoteId, input: &NoteInput) -> Result<bool, NoteServiceError> {
        ensure_title_present(input)?;
        if !self.repo.update_note(id, input)? {
            return Err(NoteServiceError::NotFound(id));
        }
        Ok(true)
    }

    /// Deletes one note.
    ///
    /// # Errors
    /// - `InvalidArgument` when `id <= 0`. Every other result, including
    ///   storage failure, is an `Ok(DeleteOutcome)`.
    pub fn delete_note(&self, id: NoteId) -> Result<DeleteOutcome, NoteServiceError> {
        ensure_valid_id(id)?;
        let outcome = match self.repo.delete_note(id) {
            Ok(true) => DeleteOutcome::Deleted,
            Ok(false) => DeleteOutcome::NotFound,
            Err(err) => {
                warn!(
                    "event=note_delete module=service status=error note_id={} error={}",
                    id, err
                );
                DeleteOutcome::Failed(err)
            }
        };
        Ok(outcome)
    }
}

fn parse_sort_key(sort_by: Option<&str>) -> Result<NoteSortKey, NoteServiceError> {
    match sort_by {
        None | Some("") => Err(NoteServiceError::InvalidArgument(
            "sort column is required".to_string(),
        )),
        Some(value) => value
            .parse::<NoteSortKey>()
            .map_err(|err| NoteServiceError::InvalidArgument(err.to_string())),
    }
}

fn ensure_valid_id(id: NoteId) -> Result<(), NoteServiceError> {
    if id <= 0 {
        return Err(NoteServiceError::InvalidArgument(format!(
            "invalid note id {id}"
        )));
    }
    Ok(())
}

fn ensure_title_present(input: &NoteInput) -> Result<(), NoteServiceError> {
    validate_title_present(&input.title)
        .map_err(|err| NoteServiceError::InvalidArgument(err.to_string()))
}
