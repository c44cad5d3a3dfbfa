//! SQLite storage bootstrap and connection provisioning.
//!
//! # Responsibility
//! - Hand out one SQLite connection per repository operation.
//! - Create the `Notes` table idempotently before any data access.
//!
//! # Invariants
//! - Connections returned by a provider see a fully bootstrapped schema.
//! - A connection is released when the value returned by `acquire` drops.

use rusqlite::Connection;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::Arc;

mod open;
pub mod schema;

pub use open::{open_db, open_db_temporary, SqliteFileProvider, SqliteTempProvider};

pub type DbResult<T> = Result<T, DbError>;

#[derive(Debug)]
pub enum DbError {
    Sqlite(rusqlite::Error),
    Io(std::io::Error),
    MissingRequiredTable(&'static str),
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "{err}"),
            Self::Io(err) => write!(f, "database storage io error: {err}"),
            Self::MissingRequiredTable(table) => write!(f, "missing required table `{table}`"),
            Self::MissingRequiredColumn { table, column } => {
                write!(f, "missing required column `{table}.{column}`")
            }
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) => Some(err),
            Self::Io(err) => Some(err),
            Self::MissingRequiredTable(_) | Self::MissingRequiredColumn { .. } => None,
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}

impl From<std::io::Error> for DbError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

/// Source of ready-to-use SQLite connections.
///
/// Each call yields an owned connection; dropping it closes the handle, so
/// callers release it on every exit path without explicit cleanup.
pub trait ConnectionProvider {
    fn acquire(&self) -> DbResult<Connection>;
}

impl<P: ConnectionProvider + ?Sized> ConnectionProvider for Arc<P> {
    fn acquire(&self) -> DbResult<Connection> {
        (**self).acquire()
    }
}

impl<P: ConnectionProvider + ?Sized> ConnectionProvider for &P {
    fn acquire(&self) -> DbResult<Connection> {
        (**self).acquire()
    }
}
