//! Note domain model.
//!
//! # Responsibility
//! - Define the persisted `Note` record and the caller-supplied `NoteInput`.
//! - Own the closed set of sort keys accepted by list use-cases.
//!
//! # Invariants
//! - `id` is assigned by storage and never reused.
//! - `title` is non-empty after trimming and at most 100 characters.
//! - `updated_at`, when set, is never earlier than `created_at`.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Storage-assigned note identifier.
pub type NoteId = i64;

/// Unix epoch milliseconds.
pub type Timestamp = i64;

/// Maximum title length accepted at the boundary, counted in characters.
pub const NOTE_TITLE_MAX_CHARS: usize = 100;

/// Persisted note as returned by read paths.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    /// Store-assigned identifier.
    pub id: NoteId,
    /// Non-empty title.
    pub title: String,
    /// Free-form body; `None` when never provided.
    pub content: Option<String>,
    /// Creation time, set once by core.
    pub created_at: Timestamp,
    /// Last update time; `None` until the first update.
    pub updated_at: Option<Timestamp>,
}

impl Note {
    /// Checks the invariants every persisted note must satisfy.
    pub fn validate(&self) -> Result<(), NoteValidationError> {
        validate_title_present(&self.title)?;
        if let Some(updated_at) = self.updated_at {
            if updated_at < self.created_at {
                return Err(NoteValidationError::UpdatedBeforeCreated {
                    created_at: self.created_at,
                    updated_at,
                });
            }
        }
        Ok(())
    }
}

/// Caller-supplied fields for create and update use-cases.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteInput {
    pub title: String,
    #[serde(default)]
    pub content: Option<String>,
}

impl NoteInput {
    pub fn new(title: impl Into<String>, content: Option<String>) -> Self {
        Self {
            title: title.into(),
            content,
        }
    }

    /// Validates the boundary contract for create/update payloads.
    ///
    /// # Errors
    /// - `EmptyTitle` when the title is blank after trimming.
    /// - `TitleTooLong` when the title exceeds [`NOTE_TITLE_MAX_CHARS`].
    pub fn validate(&self) -> Result<(), NoteValidationError> {
        validate_title_present(&self.title)?;
        let actual_chars = self.title.chars().count();
        if actual_chars > NOTE_TITLE_MAX_CHARS {
            return Err(NoteValidationError::TitleTooLong {
                max_chars: NOTE_TITLE_MAX_CHARS,
                actual_chars,
            });
        }
        Ok(())
    }
}

/// Checks only the non-blank title rule.
pub fn validate_title_present(title: &str) -> Result<(), NoteValidationError> {
    if title.trim().is_empty() {
        return Err(NoteValidationError::EmptyTitle);
    }
    Ok(())
}

/// Validation failures for note payloads and persisted rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NoteValidationError {
    EmptyTitle,
    TitleTooLong {
        max_chars: usize,
        actual_chars: usize,
    },
    UpdatedBeforeCreated {
        created_at: Timestamp,
        updated_at: Timestamp,
    },
}

impl Display for NoteValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyTitle => write!(f, "title is required"),
            Self::TitleTooLong {
                max_chars,
                actual_chars,
            } => write!(
                f,
                "title must be at most {max_chars} characters, got {actual_chars}"
            ),
            Self::UpdatedBeforeCreated {
                created_at,
                updated_at,
            } => write!(
                f,
                "updated_at {updated_at} is earlier than created_at {created_at}"
            ),
        }
    }
}

impl Error for NoteValidationError {}

/// Column used to order note listings.
///
/// The repository only ever sees this enum, so the `ORDER BY` identifier is
/// always one of the fixed column names below.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum NoteSortKey {
    Title,
    #[default]
    CreatedAt,
    UpdatedAt,
}

impl NoteSortKey {
    /// Canonical external name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::CreatedAt => "createdAt",
            Self::UpdatedAt => "updatedAt",
        }
    }

    /// Column identifier in the `Notes` table.
    pub fn column(self) -> &'static str {
        match self {
            Self::Title => "Title",
            Self::CreatedAt => "CreatedAt",
            Self::UpdatedAt => "UpdatedAt",
        }
    }
}

impl Display for NoteSortKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raised when text does not name a known sort key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownSortKey(pub String);

impl Display for UnknownSortKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "invalid sort column `{}`; expected title|createdAt|updatedAt",
            self.0
        )
    }
}

impl Error for UnknownSortKey {}

impl FromStr for NoteSortKey {
    type Err = UnknownSortKey;

    /// Accepts `title`, `createdAt` and `updatedAt` in camelCase or
    /// PascalCase; any other spelling is rejected.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "title" | "Title" => Ok(Self::Title),
            "createdAt" | "CreatedAt" => Ok(Self::CreatedAt),
            "updatedAt" | "UpdatedAt" => Ok(Self::UpdatedAt),
            _ => Err(UnknownSortKey(value.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sort_key_parses_camel_and_pascal_case() {
        assert_eq!("createdAt".parse::<NoteSortKey>(), Ok(NoteSortKey::CreatedAt));
        assert_eq!("CreatedAt".parse::<NoteSortKey>(), Ok(NoteSortKey::CreatedAt));
        assert_eq!("title".parse::<NoteSortKey>(), Ok(NoteSortKey::Title));
        assert_eq!("UpdatedAt".parse::<NoteSortKey>(), Ok(NoteSortKey::UpdatedAt));
    }

    #[test]
    fn sort_key_rejects_unknown_and_injected_text() {
        assert!("".parse::<NoteSortKey>().is_err());
        assert!("content".parse::<NoteSortKey>().is_err());
        assert!("Title; DROP TABLE Notes".parse::<NoteSortKey>().is_err());
        assert!("created_at".parse::<NoteSortKey>().is_err());
        assert!("TITLE".parse::<NoteSortKey>().is_err());
        assert!("createdat".parse::<NoteSortKey>().is_err());
        assert!("UPDATEDAT".parse::<NoteSortKey>().is_err());
    }

    #[test]
    fn input_validation_checks_blank_and_length() {
        assert_eq!(
            NoteInput::new("   ", None).validate(),
            Err(NoteValidationError::EmptyTitle)
        );

        let exact = "a".repeat(NOTE_TITLE_MAX_CHARS);
        assert!(NoteInput::new(exact, None).validate().is_ok());

        let too_long = "é".repeat(NOTE_TITLE_MAX_CHARS + 1);
        assert_eq!(
            NoteInput::new(too_long, None).validate(),
            Err(NoteValidationError::TitleTooLong {
                max_chars: NOTE_TITLE_MAX_CHARS,
                actual_chars: NOTE_TITLE_MAX_CHARS + 1,
            })
        );
    }

    #[test]
    fn note_validate_rejects_update_before_creation() {
        let note = Note {
            id: 1,
            title: "t".to_string(),
            content: None,
            created_at: 2_000,
            updated_at: Some(1_000),
        };
        assert!(matches!(
            note.validate(),
            Err(NoteValidationError::UpdatedBeforeCreated { .. })
        ));
    }
}
