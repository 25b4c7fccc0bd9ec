//! The record types shared by the store and the HTTP API.
//!
//! JSON field names are part of the wire contract and must not change
//! without a new API version.

use serde::{Deserialize, Serialize};

/// A registered user.
///
/// The `user_id` is an email-formatted string and doubles as the primary
/// key. Users are immutable after registration; there is no update or
/// delete path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Email address identifying the user. Unique.
    pub user_id: String,
    /// Hex-encoded one-way digest of the password. Never the plaintext.
    pub password_hash: String,
    /// Seconds since the Unix epoch at registration time.
    pub creation_timestamp: i64,
}

impl User {
    /// Copy of this user with the password digest masked, for
    /// serialization in API responses.
    pub fn redacted(&self) -> User {
        User {
            user_id: self.user_id.clone(),
            password_hash: REDACTED.to_string(),
            creation_timestamp: self.creation_timestamp,
        }
    }
}

/// Placeholder written over the password digest before a user record
/// leaves the server.
pub const REDACTED: &str = "REDACTED";

/// A single note belonging to one user.
///
/// `(note_id, note_user_id)` is the composite primary key. The text is
/// stored verbatim, never trimmed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    /// Sortable unique token generated at creation.
    pub note_id: String,
    /// Owning user's id. Must reference an existing user at every write.
    pub note_user_id: String,
    /// Seconds since the Unix epoch at creation. Preserved across updates.
    pub creation_timestamp: i64,
    /// Seconds since the Unix epoch at the most recent update, or 0 if
    /// the note has never been updated.
    pub update_timestamp: i64,
    /// Free-form note text.
    pub note: String,
}
