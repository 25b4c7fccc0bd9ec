//! Main store implementation for the users and notes tables.
//!
//! The `Store` type provides every CRUD operation the handlers need,
//! each wrapped in a read or write transaction over the shared table
//! set. A read guard observes a consistent snapshot; write guards
//! serialize relative to each other. Operations validate their inputs
//! before touching the tables, so an `Err` return never leaves a
//! partial write behind.

use chrono::Utc;
use parking_lot::RwLock;

use notably_core::{Note, User, non_blank, sortable_id, user_and_note_ids};

use crate::error::{StoreError, StoreResult};
use crate::schema::Tables;

/// Seconds since the Unix epoch, the timestamp convention of every row.
fn epoch_now() -> i64 {
    Utc::now().timestamp()
}

/// Whether `put_note` creates a fresh row or revises an existing one.
enum WriteMode {
    Add,
    Update { note_id: String },
}

/// The in-memory database. One instance is shared by every request
/// handler; it exclusively owns all rows and hands out clones.
#[derive(Debug)]
pub struct Store {
    tables: RwLock<Tables>,
}

impl Store {
    /// Open the store. In real life this would be a connection to an
    /// ACID-compliant database; the `Result` keeps that seam, and a
    /// failure here is fatal to process start.
    pub fn open() -> StoreResult<Self> {
        tracing::info!("Opening in-memory table store");
        Ok(Self {
            tables: RwLock::new(Tables::new()),
        })
    }

    // ------------------------------------------------------------------
    // User operations
    // ------------------------------------------------------------------

    /// Register a user. Fails on a blank id or hash and on a duplicate id.
    pub fn add_user(&self, user_id: &str, password_hash: &str) -> StoreResult<User> {
        let user_id = non_blank(user_id).ok_or(StoreError::BlankUserId)?;
        let password_hash = non_blank(password_hash).ok_or(StoreError::BlankPasswordHash)?;

        let mut tables = self.tables.write();
        if tables.contains_user(user_id) {
            return Err(StoreError::UserExists(user_id.to_string()));
        }

        let user = User {
            user_id: user_id.to_string(),
            password_hash: password_hash.to_string(),
            creation_timestamp: epoch_now(),
        };
        tables.insert_user(user.clone());

        tracing::debug!(user_id = %user.user_id, "User added");
        Ok(user)
    }

    /// Look up a user by id. Fails on a blank or unknown id.
    pub fn get_user(&self, user_id: &str) -> StoreResult<User> {
        let user_id = non_blank(user_id).ok_or(StoreError::BlankUserId)?;

        let tables = self.tables.read();
        tables
            .user(user_id)
            .cloned()
            .ok_or_else(|| StoreError::UserNotFound(user_id.to_string()))
    }

    /// All users, in store iteration order.
    pub fn all_users(&self) -> Vec<User> {
        self.tables.read().all_users().cloned().collect()
    }

    // ------------------------------------------------------------------
    // Note operations
    // ------------------------------------------------------------------

    /// Create a note for a user. The text is stored verbatim and must be
    /// non-empty; the owner must exist.
    pub fn add_note_for_user(&self, user_id: &str, text: &str) -> StoreResult<Note> {
        let user_id = non_blank(user_id).ok_or(StoreError::BlankUserId)?;
        self.put_note(user_id, text, WriteMode::Add)
    }

    /// Revise an existing note's text. The note must already exist; its
    /// creation timestamp is carried forward and the update timestamp is
    /// set to now.
    pub fn update_note_for_user(&self, user_id: &str, note_id: &str, text: &str) -> StoreResult<Note> {
        let (user_id, note_id) = user_and_note_ids(user_id, note_id)?;
        self.put_note(&user_id, text, WriteMode::Update { note_id })
    }

    /// Shared writer behind add and update. One write transaction covers
    /// the owner check, the existing-note lookup, and the upsert.
    fn put_note(&self, user_id: &str, text: &str, mode: WriteMode) -> StoreResult<Note> {
        if text.is_empty() {
            return Err(StoreError::EmptyNote);
        }

        let mut tables = self.tables.write();

        // Every write must reference an existing owner.
        if !tables.contains_user(user_id) {
            return Err(StoreError::UserNotFound(user_id.to_string()));
        }

        let (note_id, creation_timestamp, update_timestamp) = match mode {
            WriteMode::Add => (sortable_id(), epoch_now(), 0),
            WriteMode::Update { note_id } => {
                let existing =
                    tables
                        .note(&note_id, user_id)
                        .ok_or_else(|| StoreError::NoteNotFound {
                            note_id: note_id.clone(),
                            user_id: user_id.to_string(),
                        })?;
                (note_id, existing.creation_timestamp, epoch_now())
            }
        };

        let note = Note {
            note_id,
            note_user_id: user_id.to_string(),
            creation_timestamp,
            update_timestamp,
            note: text.to_string(),
        };
        tables.put_note(note.clone());

        tracing::debug!(user_id = %note.note_user_id, note_id = %note.note_id, "Note written");
        Ok(note)
    }

    /// Fetch one note by its (note id, user id) pair.
    pub fn get_note_for_user(&self, user_id: &str, note_id: &str) -> StoreResult<Note> {
        let (user_id, note_id) = user_and_note_ids(user_id, note_id)?;

        let tables = self.tables.read();
        if !tables.contains_user(&user_id) {
            return Err(StoreError::UserNotFound(user_id));
        }

        let note = tables
            .note(&note_id, &user_id)
            .ok_or_else(|| StoreError::NoteNotFound {
                note_id: note_id.clone(),
                user_id: user_id.clone(),
            })?;

        // The composite index already guarantees this; re-check anyway.
        if note.note_user_id != user_id {
            return Err(StoreError::OwnerMismatch {
                note_id,
                expected: user_id,
                actual: note.note_user_id.clone(),
            });
        }

        Ok(note.clone())
    }

    /// All of one user's notes. The owner must exist; a user with no
    /// notes gets an empty list, not an error.
    pub fn all_notes_for_user(&self, user_id: &str) -> StoreResult<Vec<Note>> {
        let user_id = non_blank(user_id).ok_or(StoreError::BlankUserId)?;

        let tables = self.tables.read();
        if !tables.contains_user(user_id) {
            return Err(StoreError::UserNotFound(user_id.to_string()));
        }

        // Filter defensively on the owner even though the index should
        // already guarantee the match.
        Ok(tables
            .notes_for_user(user_id)
            .filter(|note| note.note_user_id == user_id)
            .cloned()
            .collect())
    }

    /// Delete one note. Returns the number of rows removed; deleting an
    /// already-deleted note succeeds with 0.
    pub fn delete_note_for_user(&self, user_id: &str, note_id: &str) -> StoreResult<usize> {
        let (user_id, note_id) = user_and_note_ids(user_id, note_id)?;

        let removed = self.tables.write().remove_note(&note_id, &user_id);
        tracing::debug!(user_id = %user_id, note_id = %note_id, removed, "Note delete");
        Ok(removed)
    }

    /// Delete all of one user's notes. Returns the number of rows removed.
    pub fn delete_all_notes_for_user(&self, user_id: &str) -> StoreResult<usize> {
        let user_id = non_blank(user_id).ok_or(StoreError::BlankUserId)?;

        let removed = self.tables.write().remove_all_notes(user_id);
        tracing::debug!(user_id = %user_id, removed, "All notes delete");
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const USER_ID: &str = "testuser@testdomain.xyz";

    fn store_with_user() -> Store {
        let store = Store::open().unwrap();
        store.add_user(USER_ID, "cafed00d").unwrap();
        store
    }

    #[test]
    fn test_empty_store_has_no_users() {
        let store = Store::open().unwrap();
        assert!(store.all_users().is_empty());
    }

    #[test]
    fn test_add_user_then_get_round_trip() {
        let store = Store::open().unwrap();
        let added = store.add_user(USER_ID, "cafed00d").unwrap();
        assert_eq!(added.user_id, USER_ID);
        assert_eq!(added.password_hash, "cafed00d");
        assert!(added.creation_timestamp > 0);

        let fetched = store.get_user(USER_ID).unwrap();
        assert_eq!(fetched, added);
    }

    #[test]
    fn test_add_user_trims_inputs() {
        let store = Store::open().unwrap();
        let added = store.add_user("  a@b.com  ", " cafed00d ").unwrap();
        assert_eq!(added.user_id, "a@b.com");
        assert_eq!(added.password_hash, "cafed00d");
    }

    #[test]
    fn test_add_duplicate_user_fails() {
        let store = store_with_user();
        let err = store.add_user(USER_ID, "decafbad").unwrap_err();
        assert_eq!(err, StoreError::UserExists(USER_ID.to_string()));
    }

    #[test]
    fn test_add_user_rejects_blank_fields() {
        let store = Store::open().unwrap();
        assert_eq!(store.add_user("", "hash").unwrap_err(), StoreError::BlankUserId);
        assert_eq!(
            store.add_user(USER_ID, "   ").unwrap_err(),
            StoreError::BlankPasswordHash
        );
    }

    #[test]
    fn test_get_user_blank_or_unknown_fails() {
        let store = store_with_user();
        assert_eq!(store.get_user("").unwrap_err(), StoreError::BlankUserId);
        assert_eq!(store.get_user("   ").unwrap_err(), StoreError::BlankUserId);
        assert_eq!(
            store.get_user("nonexistent@x.com").unwrap_err(),
            StoreError::UserNotFound("nonexistent@x.com".to_string())
        );
    }

    #[test]
    fn test_all_users_lists_every_registration() {
        let store = store_with_user();
        store.add_user("tempuser@x.com", "abcdef").unwrap();
        assert_eq!(store.all_users().len(), 2);
    }

    #[test]
    fn test_add_note_blank_user_fails() {
        let store = store_with_user();
        assert_eq!(
            store.add_note_for_user("", "a note").unwrap_err(),
            StoreError::BlankUserId
        );
    }

    #[test]
    fn test_add_note_unknown_user_fails() {
        let store = store_with_user();
        let err = store.add_note_for_user("nobody@x.com", "a note").unwrap_err();
        assert_eq!(err, StoreError::UserNotFound("nobody@x.com".to_string()));
    }

    #[test]
    fn test_add_note_empty_text_fails() {
        let store = store_with_user();
        assert_eq!(
            store.add_note_for_user(USER_ID, "").unwrap_err(),
            StoreError::EmptyNote
        );
    }

    #[test]
    fn test_add_then_get_note() {
        let store = store_with_user();
        let note = store.add_note_for_user(USER_ID, "a note").unwrap();
        assert_eq!(note.note_user_id, USER_ID);
        assert_eq!(note.update_timestamp, 0);
        assert!(!note.note_id.is_empty());

        let fetched = store.get_note_for_user(USER_ID, &note.note_id).unwrap();
        assert_eq!(fetched, note);
    }

    #[test]
    fn test_note_text_is_stored_verbatim() {
        let store = store_with_user();
        let text = "  leading and trailing spaces kept  ";
        let note = store.add_note_for_user(USER_ID, text).unwrap();
        assert_eq!(note.note, text);
    }

    #[test]
    fn test_update_preserves_creation_timestamp() {
        let store = store_with_user();
        let note = store.add_note_for_user(USER_ID, "a note").unwrap();

        let multiline = "Multiline note text line 1 of 3\n\
                         Multiline note text line 2 of 3\n\
                         Multiline note text line 3 of 3";
        let updated = store
            .update_note_for_user(USER_ID, &note.note_id, multiline)
            .unwrap();

        assert_eq!(updated.note_id, note.note_id);
        assert_eq!(updated.creation_timestamp, note.creation_timestamp);
        assert!(updated.update_timestamp >= updated.creation_timestamp);
        assert_eq!(updated.note, multiline);

        let fetched = store.get_note_for_user(USER_ID, &note.note_id).unwrap();
        assert_eq!(fetched, updated);
    }

    #[test]
    fn test_update_missing_note_fails() {
        let store = store_with_user();
        let err = store
            .update_note_for_user(USER_ID, "bogusNoteID", "new text")
            .unwrap_err();
        assert_eq!(
            err,
            StoreError::NoteNotFound {
                note_id: "bogusNoteID".to_string(),
                user_id: USER_ID.to_string(),
            }
        );
    }

    #[test]
    fn test_update_empty_text_fails() {
        let store = store_with_user();
        let note = store.add_note_for_user(USER_ID, "a note").unwrap();
        assert_eq!(
            store
                .update_note_for_user(USER_ID, &note.note_id, "")
                .unwrap_err(),
            StoreError::EmptyNote
        );
    }

    #[test]
    fn test_get_note_unknown_pair_fails() {
        let store = store_with_user();
        let err = store.get_note_for_user(USER_ID, "bogus").unwrap_err();
        assert!(matches!(err, StoreError::NoteNotFound { .. }));
    }

    #[test]
    fn test_get_note_blank_ids_fail() {
        let store = store_with_user();
        assert_eq!(
            store.get_note_for_user("", "n1").unwrap_err(),
            StoreError::BlankUserId
        );
        assert_eq!(
            store.get_note_for_user(USER_ID, "  ").unwrap_err(),
            StoreError::BlankNoteId
        );
    }

    #[test]
    fn test_delete_note_is_idempotent() {
        let store = store_with_user();
        let note = store.add_note_for_user(USER_ID, "a note").unwrap();

        assert_eq!(store.delete_note_for_user(USER_ID, &note.note_id).unwrap(), 1);
        // Deleting nothing still leaves the store consistent.
        assert_eq!(store.delete_note_for_user(USER_ID, &note.note_id).unwrap(), 0);
        assert!(matches!(
            store.get_note_for_user(USER_ID, &note.note_id).unwrap_err(),
            StoreError::NoteNotFound { .. }
        ));
    }

    #[test]
    fn test_delete_all_removes_exactly_n() {
        let store = store_with_user();
        for i in 0..3 {
            store
                .add_note_for_user(USER_ID, &format!("note {i}"))
                .unwrap();
        }

        assert_eq!(store.delete_all_notes_for_user(USER_ID).unwrap(), 3);
        assert_eq!(store.all_notes_for_user(USER_ID).unwrap().len(), 0);
        assert_eq!(store.delete_all_notes_for_user(USER_ID).unwrap(), 0);
    }

    #[test]
    fn test_all_notes_for_user_without_notes_is_empty_ok() {
        let store = store_with_user();
        assert!(store.all_notes_for_user(USER_ID).unwrap().is_empty());
    }

    #[test]
    fn test_all_notes_for_unknown_or_blank_user_fails() {
        let store = store_with_user();
        assert_eq!(
            store.all_notes_for_user("  ").unwrap_err(),
            StoreError::BlankUserId
        );
        assert_eq!(
            store.all_notes_for_user("nobody@x.com").unwrap_err(),
            StoreError::UserNotFound("nobody@x.com".to_string())
        );
    }

    #[test]
    fn test_notes_are_scoped_per_owner() {
        let store = store_with_user();
        store.add_user("other@x.com", "hash2").unwrap();

        store.add_note_for_user(USER_ID, "mine").unwrap();
        let theirs = store.add_note_for_user("other@x.com", "theirs").unwrap();

        // One user cannot read another's note through their own scope.
        assert!(matches!(
            store.get_note_for_user(USER_ID, &theirs.note_id).unwrap_err(),
            StoreError::NoteNotFound { .. }
        ));

        // Nor delete it.
        assert_eq!(
            store.delete_note_for_user(USER_ID, &theirs.note_id).unwrap(),
            0
        );
        assert_eq!(store.all_notes_for_user("other@x.com").unwrap().len(), 1);
    }

    #[test]
    fn test_note_ids_sort_by_creation_order() {
        let store = store_with_user();
        let first = store.add_note_for_user(USER_ID, "first").unwrap();
        std::thread::sleep(std::time::Duration::from_millis(2));
        let second = store.add_note_for_user(USER_ID, "second").unwrap();

        assert!(first.note_id < second.note_id);
        let listed = store.all_notes_for_user(USER_ID).unwrap();
        assert_eq!(listed[0].note_id, first.note_id);
        assert_eq!(listed[1].note_id, second.note_id);
    }
}
