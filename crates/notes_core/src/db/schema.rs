//! `Notes` table bootstrap and shape checks.
//!
//! # Invariants
//! - `apply_schema` is idempotent; it never alters or drops existing tables.
//! - There is no version tracking: the schema is a single flat table.

use super::{DbError, DbResult};
use rusqlite::Connection;

pub const NOTES_TABLE: &str = "Notes";

pub const NOTES_COLUMNS: [&str; 5] = ["Id", "Title", "Content", "CreatedAt", "UpdatedAt"];

const SCHEMA_SQL: &str = include_str!("schema.sql");

/// Creates the `Notes` table and its indexes when absent.
pub fn apply_schema(conn: &Connection) -> DbResult<()> {
    conn.execute_batch(SCHEMA_SQL)?;
    Ok(())
}

/// Verifies the `Notes` table exists with every column the repository reads.
pub fn ensure_notes_table(conn: &Connection) -> DbResult<()> {
    if !table_exists(conn, NOTES_TABLE)? {
        return Err(DbError::MissingRequiredTable(NOTES_TABLE));
    }

    for column in NOTES_COLUMNS {
        if !table_has_column(conn, NOTES_TABLE, column)? {
            return Err(DbError::MissingRequiredColumn {
                table: NOTES_TABLE,
                column,
            });
        }
    }

    Ok(())
}

fn table_exists(conn: &Connection, table: &str) -> DbResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn table_has_column(conn: &Connection, table: &str, column: &str) -> DbResult<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table});"))?;
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let current: String = row.get(1)?;
        if current == column {
            return Ok(true);
        }
    }
    Ok(false)
}

#[cfg(test)]
mod tests {
    use super::{apply_schema, ensure_notes_table};
    use crate::db::DbError;
    use rusqlite::{params, Connection, ErrorCode};

    fn insert_title(conn: &Connection, title: &str) -> rusqlite::Result<usize> {
        conn.execute(
            "INSERT INTO Notes (Title, Content, CreatedAt) VALUES (?1, NULL, 1);",
            params![title],
        )
    }

    #[test]
    fn apply_schema_is_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        apply_schema(&conn).unwrap();
        apply_schema(&conn).unwrap();
        ensure_notes_table(&conn).unwrap();
    }

    #[test]
    fn ensure_notes_table_reports_missing_table() {
        let conn = Connection::open_in_memory().unwrap();
        let err = ensure_notes_table(&conn).unwrap_err();
        assert!(matches!(err, DbError::MissingRequiredTable("Notes")));
    }

    #[test]
    fn ensure_notes_table_reports_missing_column() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(
            "CREATE TABLE Notes (Id INTEGER PRIMARY KEY, Title TEXT, Content TEXT, CreatedAt INTEGER);",
        )
        .unwrap();
        let err = ensure_notes_table(&conn).unwrap_err();
        assert!(matches!(
            err,
            DbError::MissingRequiredColumn {
                table: "Notes",
                column: "UpdatedAt"
            }
        ));
    }

    #[test]
    fn title_check_rejects_every_whitespace_only_title() {
        let conn = Connection::open_in_memory().unwrap();
        apply_schema(&conn).unwrap();

        let whitespace: Vec<char> = (0..=0x3000)
            .filter_map(char::from_u32)
            .filter(|c| c.is_whitespace())
            .collect();
        assert_eq!(whitespace.len(), 25);

        for c in whitespace {
            let err = insert_title(&conn, &format!("{c}{c}")).unwrap_err();
            let code = err.sqlite_error().map(|e| e.code);
            assert_eq!(
                code,
                Some(ErrorCode::ConstraintViolation),
                "U+{:04X} passed the title check",
                c as u32
            );
        }

        insert_title(&conn, "\tindented").unwrap();
        insert_title(&conn, "\u{3000}wide\u{3000}").unwrap();
    }
}
