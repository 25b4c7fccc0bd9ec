//! String and email validation helpers used across the project.

use thiserror::Error;

/// Validation failures for id pairs.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// User id is empty or whitespace-only.
    #[error("userID is empty/blank")]
    BlankUserId,

    /// Note id is empty or whitespace-only.
    #[error("noteID is empty/blank")]
    BlankNoteId,
}

/// Trim `s` and return it if anything is left.
///
/// Returns `None` for empty or whitespace-only input.
pub fn non_blank(s: &str) -> Option<&str> {
    let trimmed = s.trim();
    if trimmed.is_empty() { None } else { Some(trimmed) }
}

/// Syntactic email check for user identities.
///
/// Accepts `local@domain` where both parts are non-empty, the address
/// contains exactly one `@` and no whitespace, and the domain has at
/// least one dot with non-empty labels on both sides. Deliberately
/// permissive beyond that; this gates obviously malformed identities,
/// it does not verify deliverability.
pub fn is_valid_email(s: &str) -> bool {
    if s.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = s.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    !domain.is_empty() && domain.split('.').count() >= 2 && domain.split('.').all(|l| !l.is_empty())
}

/// Validate a (userID, noteID) pair, since the note paths need that a lot.
///
/// On success returns the space-trimmed ids, user id first.
pub fn user_and_note_ids(user_id: &str, note_id: &str) -> Result<(String, String), ValidationError> {
    let user_id = non_blank(user_id).ok_or(ValidationError::BlankUserId)?;
    let note_id = non_blank(note_id).ok_or(ValidationError::BlankNoteId)?;
    Ok((user_id.to_string(), note_id.to_string()))
}
