//! Error types for the storage layer.

use thiserror::Error;

/// Result type alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors that can occur during storage operations.
///
/// Each failure kind gets its own variant so the HTTP layer can choose a
/// status code by matching rather than by sniffing message substrings.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    /// User id was empty or whitespace-only.
    #[error("userID is empty/blank")]
    BlankUserId,

    /// Note id was empty or whitespace-only.
    #[error("noteID is empty/blank")]
    BlankNoteId,

    /// Password hash was empty or whitespace-only.
    #[error("password hash is empty/blank")]
    BlankPasswordHash,

    /// Note text was empty. Notes may not be created or updated empty.
    #[error("note text is empty")]
    EmptyNote,

    /// A user with this id already exists.
    #[error("user '{0}' already exists")]
    UserExists(String),

    /// No user with this id.
    #[error("user '{0}' not found")]
    UserNotFound(String),

    /// No note with this (note id, user id) pair.
    #[error("note '{note_id}' not found for user '{user_id}'")]
    NoteNotFound { note_id: String, user_id: String },

    /// A note was found but its owner does not match the requested user.
    /// The composite index should make this impossible; treated as an
    /// internal invariant breach.
    #[error("note '{note_id}' owner mismatch: expected '{expected}', got '{actual}'")]
    OwnerMismatch {
        note_id: String,
        expected: String,
        actual: String,
    },
}

impl From<notably_core::ValidationError> for StoreError {
    fn from(err: notably_core::ValidationError) -> Self {
        match err {
            notably_core::ValidationError::BlankUserId => StoreError::BlankUserId,
            notably_core::ValidationError::BlankNoteId => StoreError::BlankNoteId,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_are_descriptive() {
        let err = StoreError::UserExists("a@b.com".to_string());
        assert_eq!(err.to_string(), "user 'a@b.com' already exists");

        let err = StoreError::NoteNotFound {
            note_id: "n1".to_string(),
            user_id: "a@b.com".to_string(),
        };
        assert_eq!(err.to_string(), "note 'n1' not found for user 'a@b.com'");
    }

    #[test]
    fn test_validation_error_conversion() {
        let err: StoreError = notably_core::ValidationError::BlankNoteId.into();
        assert_eq!(err, StoreError::BlankNoteId);
    }
}
