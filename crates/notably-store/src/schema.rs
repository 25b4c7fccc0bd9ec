//! Table definitions for the in-memory store.
//!
//! This is the "DDL" of the store: which tables exist, what their
//! primary keys are, and which secondary indexes are maintained. The
//! maps are plain `BTreeMap`s so iteration order is the index order;
//! every mutation goes through the methods here so the secondary index
//! can never drift from the primary map.

use std::collections::{BTreeMap, BTreeSet};

use notably_core::{Note, User};

/// Composite primary key for the notes table: `(note_id, note_user_id)`.
pub type NoteKey = (String, String);

/// The full table set held behind the store's lock.
#[derive(Debug, Default)]
pub struct Tables {
    /// Users, uniquely indexed by `user_id`.
    users: BTreeMap<String, User>,
    /// Notes, uniquely indexed by the composite `(note_id, user_id)` key.
    notes: BTreeMap<NoteKey, Note>,
    /// Secondary index: owner id to the set of that owner's note ids.
    notes_by_user: BTreeMap<String, BTreeSet<String>>,
}

impl Tables {
    pub fn new() -> Self {
        Self::default()
    }

    // ------------------------------------------------------------------
    // users table
    // ------------------------------------------------------------------

    pub fn user(&self, user_id: &str) -> Option<&User> {
        self.users.get(user_id)
    }

    pub fn contains_user(&self, user_id: &str) -> bool {
        self.users.contains_key(user_id)
    }

    /// Insert a user row. The caller has already checked uniqueness.
    pub fn insert_user(&mut self, user: User) {
        self.users.insert(user.user_id.clone(), user);
    }

    /// All users in index (id) order.
    pub fn all_users(&self) -> impl Iterator<Item = &User> {
        self.users.values()
    }

    // ------------------------------------------------------------------
    // notes table
    // ------------------------------------------------------------------

    pub fn note(&self, note_id: &str, user_id: &str) -> Option<&Note> {
        self.notes.get(&(note_id.to_string(), user_id.to_string()))
    }

    /// Upsert a note row, keeping the owner index in step.
    pub fn put_note(&mut self, note: Note) {
        self.notes_by_user
            .entry(note.note_user_id.clone())
            .or_default()
            .insert(note.note_id.clone());
        self.notes
            .insert((note.note_id.clone(), note.note_user_id.clone()), note);
    }

    /// All of one owner's notes via the secondary index, in note id
    /// (creation) order.
    pub fn notes_for_user<'a>(&'a self, user_id: &'a str) -> impl Iterator<Item = &'a Note> + 'a {
        self.notes_by_user
            .get(user_id)
            .into_iter()
            .flat_map(|ids| ids.iter())
            .filter_map(move |note_id| self.note(note_id, user_id))
    }

    /// Remove one note. Returns the number of rows removed (0 or 1);
    /// removing an absent row is not an error.
    pub fn remove_note(&mut self, note_id: &str, user_id: &str) -> usize {
        let removed = self
            .notes
            .remove(&(note_id.to_string(), user_id.to_string()));
        if removed.is_some() {
            if let Some(ids) = self.notes_by_user.get_mut(user_id) {
                ids.remove(note_id);
                if ids.is_empty() {
                    self.notes_by_user.remove(user_id);
                }
            }
            1
        } else {
            0
        }
    }

    /// Remove all of one owner's notes. Returns the number removed.
    pub fn remove_all_notes(&mut self, user_id: &str) -> usize {
        let Some(ids) = self.notes_by_user.remove(user_id) else {
            return 0;
        };
        let mut removed = 0;
        for note_id in ids {
            if self.notes.remove(&(note_id, user_id.to_string())).is_some() {
                removed += 1;
            }
        }
        removed
    }

    #[cfg(test)]
    pub fn note_count(&self) -> usize {
        self.notes.len()
    }
}
