//! Note repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Own all SQL text and row mapping for the `Notes` table.
//! - Wrap driver and connectivity failures into `RepoError::Persistence`.
//!
//! # Invariants
//! - Each operation acquires one connection and runs one statement (create
//!   also reads back the generated rowid); the connection drops on every path.
//! - `ORDER BY` identifiers come only from `NoteSortKey::column`.
//! - Affected-row count is the only not-found signal on update/delete.
//! - Read paths reject rows that break note invariants.

use crate::clock::{Clock, SystemClock};
use crate::db::schema::ensure_notes_table;
use crate::db::{ConnectionProvider, DbError};
use crate::model::note::{Note, NoteId, NoteInput, NoteSortKey, NoteValidationError};
use log::{debug, error, info, warn};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Instant;

const NOTE_SELECT_SQL: &str = "SELECT
    Id,
    Title,
    Content,
    CreatedAt,
    UpdatedAt
FROM Notes";

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for note persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    /// Connection acquisition or statement execution failed.
    Persistence(DbError),
    /// A stored row breaks note invariants.
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Persistence(err) => write!(f, "persistence failure: {err}"),
            Self::InvalidData(message) => write!(f, "invalid persisted note data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Persistence(err) => Some(err),
            Self::InvalidData(_) => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Persistence(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Persistence(DbError::Sqlite(value))
    }
}

/// Query options for note listings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NoteListQuery {
    /// Substring matched against title or content; `None` matches all rows.
    pub search: Option<String>,
    pub sort_key: NoteSortKey,
    pub ascending: bool,
}

/// Repository interface for note CRUD operations.
pub trait NoteRepository {
    /// Lists notes matching the optional search, in the requested order.
    fn list_notes(&self, query: &NoteListQuery) -> RepoResult<Vec<Note>>;
    /// Gets one note by id.
    fn get_note(&self, id: NoteId) -> RepoResult<Option<Note>>;
    /// Inserts a note stamped with the current time; returns the new id.
    fn create_note(&self, input: &NoteInput) -> RepoResult<NoteId>;
    /// Replaces title/content and refreshes `updated_at`.
    /// Returns `false` when no row has this id.
    fn update_note(&self, id: NoteId, input: &NoteInput) -> RepoResult<bool>;
    /// Hard-deletes one note. Returns `false` when no row has this id.
    fn delete_note(&self, id: NoteId) -> RepoResult<bool>;
}

/// SQLite-backed note repository.
pub struct SqliteNoteRepository<P, C = SystemClock> {
    provider: P,
    clock: C,
}

impl<P: ConnectionProvider> SqliteNoteRepository<P> {
    /// Constructs a repository on the system clock.
    pub fn try_new(provider: P) -> RepoResult<Self> {
        Self::try_with_clock(provider, SystemClock)
    }
}

impl<P: ConnectionProvider, C: Clock> SqliteNoteRepository<P, C> {
    /// Constructs a repository after checking the `Notes` table shape.
    pub fn try_with_clock(provider: P, clock: C) -> RepoResult<Self> {
        {
            let conn = provider.acquire()?;
            ensure_notes_table(&conn)?;
        }
        Ok(Self { provider, clock })
    }

    /// Runs `op` on a freshly acquired connection.
    ///
    /// The connection is owned by this frame and drops before returning,
    /// whether `op` succeeds or fails.
    fn with_connection<T>(
        &self,
        event: &'static str,
        op: impl FnOnce(&Connection) -> RepoResult<T>,
    ) -> RepoResult<T> {
        let started_at = Instant::now();
        let result = self
            .provider
            .acquire()
            .map_err(RepoError::from)
            .and_then(|conn| op(&conn));

        if let Err(err) = &result {
            error!(
                "event={} module=repo status=error duration_ms={} error={}",
                event,
                started_at.elapsed().as_millis(),
                err
            );
        } else {
            debug!(
                "event={} module=repo status=ok duration_ms={}",
                event,
                started_at.elapsed().as_millis()
            );
        }
        result
    }
}

impl<P: ConnectionProvider, C: Clock> NoteRepository for SqliteNoteRepository<P, C> {
    fn list_notes(&self, query: &NoteListQuery) -> RepoResult<Vec<Note>> {
        let sql = build_list_sql(query);
        let mut bind_values: Vec<Value> = Vec::new();
        if let Some(search) = query.search.as_ref() {
            bind_values.push(Value::Text(search.clone()));
        }

        self.with_connection("note_list", |conn| {
            let mut stmt = conn.prepare(&sql)?;
            let mut rows = stmt.query(params_from_iter(bind_values))?;
            let mut notes = Vec::new();
            while let Some(row) = rows.next()? {
                notes.push(parse_note_row(row)?);
            }
            Ok(notes)
        })
    }

    fn get_note(&self, id: NoteId) -> RepoResult<Option<Note>> {
        self.with_connection("note_get", |conn| {
            let mut stmt = conn.prepare(&format!("{NOTE_SELECT_SQL} WHERE Id = ?1;"))?;
            let mut rows = stmt.query([id])?;
            if let Some(row) = rows.next()? {
                return Ok(Some(parse_note_row(row)?));
            }
            Ok(None)
        })
    }

    fn create_note(&self, input: &NoteInput) -> RepoResult<NoteId> {
        let created_at = self.clock.now_epoch_ms();
        let id = self.with_connection("note_create", |conn| {
            conn.execute(
                "INSERT INTO Notes (Title, Content, CreatedAt) VALUES (?1, ?2, ?3);",
                params![input.title.as_str(), input.content.as_deref(), created_at],
            )?;
            Ok(conn.last_insert_rowid())
        })?;

        info!("event=note_create module=repo status=ok note_id={id}");
        Ok(id)
    }

    fn update_note(&self, id: NoteId, input: &NoteInput) -> RepoResult<bool> {
        let now = self.clock.now_epoch_ms();
        // max() keeps UpdatedAt monotonic and never before CreatedAt.
        let changed = self.with_connection("note_update", |conn| {
            Ok(conn.execute(
                "UPDATE Notes
                 SET
                    Title = ?2,
                    Content = ?3,
                    UpdatedAt = max(?4, CreatedAt, coalesce(UpdatedAt, CreatedAt))
                 WHERE Id = ?1;",
                params![id, input.title.as_str(), input.content.as_deref(), now],
            )?)
        })?;

        if changed == 0 {
            warn!("event=note_update module=repo status=noop note_id={id} rows_affected=0");
            return Ok(false);
        }

        info!("event=note_update module=repo status=ok note_id={id}");
        Ok(true)
    }

    fn delete_note(&self, id: NoteId) -> RepoResult<bool> {
        let changed = self.with_connection("note_delete", |conn| {
            Ok(conn.execute("DELETE FROM Notes WHERE Id = ?1;", [id])?)
        })?;

        if changed == 0 {
            warn!("event=note_delete module=repo status=noop note_id={id} rows_affected=0");
            return Ok(false);
        }

        info!("event=note_delete module=repo status=ok note_id={id}");
        Ok(true)
    }
}

/// Builds the listing statement.
///
/// The search value is bound as a parameter; `instr` keeps matching
/// case-sensitive and free of `LIKE` wildcard interpretation.
pub fn build_list_sql(query: &NoteListQuery) -> String {
    let mut sql = String::from(NOTE_SELECT_SQL);
    if query.search.is_some() {
        sql.push_str(" WHERE (instr(Title, ?1) > 0 OR instr(Content, ?1) > 0)");
    }

    let direction = if query.ascending { "ASC" } else { "DESC" };
    sql.push_str(&format!(
        " ORDER BY {column} {direction}, Id {direction};",
        column = query.sort_key.column()
    ));
    sql
}

fn parse_note_row(row: &Row<'_>) -> RepoResult<Note> {
    let note = Note {
        id: row.get("Id")?,
        title: row.get("Title")?,
        content: row.get("Content")?,
        created_at: row.get("CreatedAt")?,
        updated_at: row.get("UpdatedAt")?,
    };
    note.validate().map_err(|err| invalid_row(note.id, &err))?;
    Ok(note)
}

fn invalid_row(id: NoteId, err: &NoteValidationError) -> RepoError {
    RepoError::InvalidData(format!("note {id}: {err}"))
}
