//! Command-line boundary for the notes core.
//!
//! # Responsibility
//! - Parse and shape-check caller input before invoking `NoteService`.
//! - Map service results and errors onto printed output and exit codes.

use clap::{Parser, Subcommand};
use log::{error, info};
use notes_core::{
    init_logging, open_db, ConnectionProvider, CoreConfig, DeleteOutcome, NoteId, NoteInput,
    NoteListRequest, NoteRepository, NoteService, NoteServiceError, SqliteFileProvider,
    SqliteNoteRepository, DEFAULT_SORT_BY,
};
use serde::Serialize;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(name = "notes", version, about = "Create, read, update and delete notes")]
struct Cli {
    /// SQLite database file (overrides NOTES_DB_PATH; one of the two is required)
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// Log level (overrides NOTES_LOG_LEVEL)
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Absolute directory for rolling log files (overrides NOTES_LOG_DIR)
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List notes, optionally filtered and sorted
    List {
        #[arg(long)]
        search: Option<String>,
        /// One of title, createdAt, updatedAt
        #[arg(long, default_value = DEFAULT_SORT_BY)]
        sort_by: String,
        #[arg(long)]
        ascending: bool,
    },
    /// Show one note
    Get {
        #[arg(allow_negative_numbers = true)]
        id: NoteId,
    },
    /// Create a note and print it
    Create {
        #[arg(long)]
        title: String,
        #[arg(long)]
        content: Option<String>,
    },
    /// Replace the title and content of a note
    Update {
        #[arg(allow_negative_numbers = true)]
        id: NoteId,
        #[arg(long)]
        title: String,
        #[arg(long)]
        content: Option<String>,
    },
    /// Delete a note
    Delete {
        #[arg(allow_negative_numbers = true)]
        id: NoteId,
    },
}

/// Failed command with its HTTP-equivalent status.
#[derive(Debug, PartialEq, Eq)]
struct Failure {
    status: u16,
    message: String,
}

impl Failure {
    fn new(status: u16, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    fn exit_code(&self) -> u8 {
        match self.status {
            400 => 2,
            404 => 3,
            _ => 1,
        }
    }
}

impl From<NoteServiceError> for Failure {
    fn from(value: NoteServiceError) -> Self {
        Self::new(value.status_code(), value.to_string())
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(output) => {
            println!("{output}");
            ExitCode::SUCCESS
        }
        Err(failure) => {
            eprintln!("error ({}): {}", failure.status, failure.message);
            ExitCode::from(failure.exit_code())
        }
    }
}

fn run(cli: Cli) -> Result<String, Failure> {
    let config = resolve_config(&cli)?;

    if let Some(log_dir) = config.log_dir.as_ref() {
        init_logging(config.log_level, log_dir).map_err(|err| Failure::new(500, err.to_string()))?;
    }

    let provider = open_storage(&config)?;
    execute(provider, cli.command)
}

/// Opens the configured database, failing when no path is configured.
fn open_storage(config: &CoreConfig) -> Result<SqliteFileProvider, Failure> {
    let Some(path) = config.db_path.as_ref() else {
        error!("event=cli_storage module=cli status=error error_code=db_path_missing");
        return Err(Failure::new(
            500,
            "database path is not configured; pass --db or set NOTES_DB_PATH",
        ));
    };
    open_db(path).map_err(|err| Failure::new(500, err.to_string()))
}

fn resolve_config(cli: &Cli) -> Result<CoreConfig, Failure> {
    let mut config = CoreConfig::from_env().map_err(|err| Failure::new(400, err.to_string()))?;
    if let Some(db) = cli.db.clone() {
        config.db_path = Some(db);
    }
    if let Some(level) = cli.log_level.as_deref() {
        config.log_level = notes_core::logging::normalize_level(level)
            .map_err(|err| Failure::new(400, err.to_string()))?;
    }
    if let Some(log_dir) = cli.log_dir.clone() {
        config.log_dir = Some(log_dir);
    }
    Ok(config)
}

fn execute<P: ConnectionProvider>(provider: P, command: Command) -> Result<String, Failure> {
    let repo =
        SqliteNoteRepository::try_new(provider).map_err(|err| Failure::new(500, err.to_string()))?;
    dispatch(&NoteService::new(repo), command)
}

fn dispatch<R: NoteRepository>(service: &NoteService<R>, command: Command) -> Result<String, Failure> {
    match command {
        Command::List {
            search,
            sort_by,
            ascending,
        } => {
            let request = NoteListRequest {
                search,
                sort_by: Some(sort_by),
                ascending,
            };
            to_json(&service.list_notes(&request)?)
        }
        Command::Get { id } => match service.get_note(id)? {
            Some(note) => to_json(&note),
            None => Err(Failure::new(404, format!("note with id {id} not found"))),
        },
        Command::Create { title, content } => {
            let input = checked_input(title, content)?;
            let id = service.create_note(&input)?;
            info!("event=cli_create module=cli status=ok note_id={id}");
            fetch_json(service, id)
        }
        Command::Update { id, title, content } => {
            let input = checked_input(title, content)?;
            if !service.update_note(id, &input)? {
                return Err(Failure::new(500, "an error occurred while updating the note"));
            }
            fetch_json(service, id)
        }
        Command::Delete { id } => match service.delete_note(id)? {
            DeleteOutcome::Deleted => Ok(format!("deleted note {id}")),
            DeleteOutcome::NotFound => {
                Err(Failure::new(404, format!("note with id {id} not found")))
            }
            DeleteOutcome::Failed(err) => Err(Failure::new(
                500,
                format!("an error occurred while deleting the note: {err}"),
            )),
        },
    }
}

fn checked_input(title: String, content: Option<String>) -> Result<NoteInput, Failure> {
    let input = NoteInput::new(title, content);
    input
        .validate()
        .map_err(|err| Failure::new(400, err.to_string()))?;
    Ok(input)
}

fn fetch_json<R: NoteRepository>(service: &NoteService<R>, id: NoteId) -> Result<String, Failure> {
    match service.get_note(id)? {
        Some(note) => to_json(&note),
        None => Err(Failure::new(404, format!("note with id {id} not found"))),
    }
}

fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String, Failure> {
    serde_json::to_string_pretty(value).map_err(|err| Failure::new(500, err.to_string()))
}

#[cfg(test)]
mod tests {
    use super::{dispatch, open_storage, Cli, Command, Failure};
    use clap::Parser;
    use notes_core::{
        open_db_temporary, CoreConfig, Note, NoteService, SqliteNoteRepository, SqliteTempProvider,
    };

    fn temp_service() -> NoteService<SqliteNoteRepository<SqliteTempProvider>> {
        let provider = open_db_temporary().unwrap();
        NoteService::new(SqliteNoteRepository::try_new(provider).unwrap())
    }

    fn create(title: &str) -> Command {
        Command::Create {
            title: title.to_string(),
            content: None,
        }
    }

    #[test]
    fn parses_list_defaults_and_negative_ids() {
        let cli = Cli::try_parse_from(["notes", "list"]).unwrap();
        assert!(matches!(
            cli.command,
            Command::List { ref sort_by, ascending: false, search: None } if sort_by == "createdAt"
        ));

        let cli = Cli::try_parse_from(["notes", "get", "-3"]).unwrap();
        assert!(matches!(cli.command, Command::Get { id: -3 }));
    }

    #[test]
    fn create_prints_note_and_delete_twice_reports_not_found() {
        let service = temp_service();
        let output = dispatch(&service, create("Shopping")).unwrap();
        let note: Note = serde_json::from_str(&output).unwrap();
        assert_eq!(note.title, "Shopping");

        let deleted = dispatch(&service, Command::Delete { id: note.id }).unwrap();
        assert_eq!(deleted, format!("deleted note {}", note.id));

        let failure = dispatch(&service, Command::Delete { id: note.id }).unwrap_err();
        assert_eq!(failure.status, 404);
        assert_eq!(failure.exit_code(), 3);
    }

    #[test]
    fn boundary_rejects_overlong_titles_with_bad_request() {
        let service = temp_service();
        let failure = dispatch(&service, create(&"t".repeat(101))).unwrap_err();
        assert_eq!(failure.status, 400);
        assert_eq!(failure.exit_code(), 2);
    }

    #[test]
    fn service_errors_map_to_status_codes() {
        let service = temp_service();
        let invalid = dispatch(&service, Command::Get { id: 0 }).unwrap_err();
        assert_eq!(invalid.status, 400);

        let missing = dispatch(
            &service,
            Command::Update {
                id: 77,
                title: "t".to_string(),
                content: None,
            },
        )
        .unwrap_err();
        assert_eq!(missing.status, 404);

        let bad_sort = dispatch(
            &service,
            Command::List {
                search: None,
                sort_by: "content".to_string(),
                ascending: false,
            },
        )
        .unwrap_err();
        assert_eq!(bad_sort.status, 400);
    }

    #[test]
    fn missing_database_path_fails_before_running() {
        let failure = open_storage(&CoreConfig::default()).unwrap_err();
        assert_eq!(failure.status, 500);
        assert_eq!(failure.exit_code(), 1);
        assert!(failure.message.contains("NOTES_DB_PATH"));
    }

    #[test]
    fn configured_database_path_keeps_writes_between_runs() {
        let dir = tempfile::tempdir().unwrap();
        let config = CoreConfig {
            db_path: Some(dir.path().join("notes.db")),
            ..CoreConfig::default()
        };

        let first = NoteService::new(
            SqliteNoteRepository::try_new(open_storage(&config).unwrap()).unwrap(),
        );
        let created: Note =
            serde_json::from_str(&dispatch(&first, create("kept")).unwrap()).unwrap();

        let second = NoteService::new(
            SqliteNoteRepository::try_new(open_storage(&config).unwrap()).unwrap(),
        );
        let loaded: Note =
            serde_json::from_str(&dispatch(&second, Command::Get { id: created.id }).unwrap())
                .unwrap();
        assert_eq!(loaded.title, "kept");
    }

    #[test]
    fn unknown_statuses_exit_with_one() {
        assert_eq!(Failure::new(500, "boom").exit_code(), 1);
    }
}
