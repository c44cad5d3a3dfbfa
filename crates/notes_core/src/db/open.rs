//! SQLite connection providers.
//!
//! # Responsibility
//! - Open file-backed SQLite databases and bootstrap the schema once.
//! - Open a fresh, configured connection for every `acquire` call.
//!
//! # Invariants
//! - Returned connections have a 5 second busy timeout.
//! - A temporary database lives as long as its provider.

use super::schema::apply_schema;
use super::{ConnectionProvider, DbResult};
use log::{debug, error, info};
use rusqlite::Connection;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tempfile::TempDir;

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Provider that opens one connection per acquire on a database file.
#[derive(Debug, Clone)]
pub struct SqliteFileProvider {
    path: PathBuf,
}

impl SqliteFileProvider {
    /// Database file backing this provider.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ConnectionProvider for SqliteFileProvider {
    fn acquire(&self) -> DbResult<Connection> {
        let conn = Connection::open(&self.path)?;
        configure_connection(&conn)?;
        Ok(conn)
    }
}

/// Provider over a private database file that is removed on drop.
///
/// Concurrent connections wait on file locks for up to the busy timeout.
#[derive(Debug)]
pub struct SqliteTempProvider {
    inner: SqliteFileProvider,
    _dir: TempDir,
}

impl SqliteTempProvider {
    /// Database file backing this provider, unique per provider.
    pub fn path(&self) -> &Path {
        self.inner.path()
    }
}

impl ConnectionProvider for SqliteTempProvider {
    fn acquire(&self) -> DbResult<Connection> {
        self.inner.acquire()
    }
}

/// Opens (or creates) a SQLite database file and bootstraps the schema.
///
/// # Side effects
/// - Creates the `Notes` table when absent.
/// - Emits `db_open` logging events with duration and status.
pub fn open_db(path: impl AsRef<Path>) -> DbResult<SqliteFileProvider> {
    let path = path.as_ref().to_path_buf();
    let conn = open_logged("file", || Connection::open(&path))?;
    drop(conn);
    Ok(SqliteFileProvider { path })
}

/// Opens a fresh database in a private temporary directory and bootstraps
/// the schema.
///
/// # Side effects
/// - Creates a temporary directory, deleted when the provider drops.
/// - Emits `db_open` logging events with duration and status.
pub fn open_db_temporary() -> DbResult<SqliteTempProvider> {
    let dir = tempfile::Builder::new().prefix("notes-").tempdir()?;
    let path = dir.path().join("notes.db");
    let conn = open_logged("temporary", || Connection::open(&path))?;
    // Persistent per file; readers then never block the writer.
    let journal_mode: String =
        conn.pragma_update_and_check(None, "journal_mode", "WAL", |row| row.get(0))?;
    debug!("event=db_journal_mode module=db status=ok mode=temporary journal_mode={journal_mode}");
    drop(conn);
    Ok(SqliteTempProvider {
        inner: SqliteFileProvider { path },
        _dir: dir,
    })
}

fn open_logged(
    mode: &str,
    open: impl FnOnce() -> rusqlite::Result<Connection>,
) -> DbResult<Connection> {
    let started_at = Instant::now();
    info!("event=db_open module=db status=start mode={mode}");

    let conn = match open() {
        Ok(conn) => conn,
        Err(err) => {
            error!(
                "event=db_open module=db status=error mode={} duration_ms={} error_code=db_open_failed error={}",
                mode,
                started_at.elapsed().as_millis(),
                err
            );
            return Err(err.into());
        }
    };

    match bootstrap_connection(&conn) {
        Ok(()) => {
            info!(
                "event=db_open module=db status=ok mode={} duration_ms={}",
                mode,
                started_at.elapsed().as_millis()
            );
            Ok(conn)
        }
        Err(err) => {
            error!(
                "event=db_open module=db status=error mode={} duration_ms={} error_code=db_bootstrap_failed error={}",
                mode,
                started_at.elapsed().as_millis(),
                err
            );
            Err(err)
        }
    }
}

fn bootstrap_connection(conn: &Connection) -> DbResult<()> {
    configure_connection(conn)?;
    apply_schema(conn)?;
    debug!("event=schema_ready module=db status=ok");
    Ok(())
}

fn configure_connection(conn: &Connection) -> DbResult<()> {
    conn.busy_timeout(BUSY_TIMEOUT)?;
    Ok(())
}
