//! notably-core: domain types and shared utilities for Notably
//!
//! This crate provides:
//! - The `User` and `Note` records shared by the store and the HTTP API
//! - Sortable note identifier generation (UUIDv7)
//! - One-way password digests (hex-encoded SHA-256)
//! - String and email validation helpers used by every layer

pub mod hash;
pub mod ident;
pub mod types;
pub mod validate;

// Re-exports for convenience
pub use hash::sha256_hex;
pub use ident::sortable_id;
pub use types::{Note, User};
pub use validate::{ValidationError, is_valid_email, non_blank, user_and_note_ids};
