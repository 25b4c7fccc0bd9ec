//! Sortable note identifier generation.
//!
//! Note ids are UUIDv7 strings. The version-7 layout puts a millisecond
//! timestamp in the high bits, so the hyphenated string form sorts
//! lexically by creation time while staying collision-resistant, and the
//! values are safe to put in URLs and JSON.

use uuid::Uuid;

/// Generate a time-ordered, collision-resistant identifier.
pub fn sortable_id() -> String {
    Uuid::now_v7().to_string()
}
