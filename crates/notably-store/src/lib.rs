//! notably-store: storage layer for Notably
//!
//! This crate provides an in-memory, schema-indexed table store holding
//! users and notes. It stands in for a real database: there is no
//! durability, but every operation runs under transaction semantics:
//! a read guard observes a consistent snapshot, write guards serialize
//! relative to each other, and a failed write leaves the tables
//! untouched.
//!
//! # Architecture
//!
//! - `schema` defines the table set: the unique primary indexes and the
//!   secondary owner index on notes
//! - `store` wraps the tables in a lock and exposes the typed per-entity
//!   operations
//! - `error` carries one variant per failure kind so callers classify
//!   outcomes by matching, never by inspecting message text
//!
//! # Usage
//!
//! ```rust
//! use notably_store::Store;
//!
//! let store = Store::open().unwrap();
//! let user = store.add_user("a@b.com", "cafed00d").unwrap();
//! let note = store.add_note_for_user(&user.user_id, "hello").unwrap();
//! assert_eq!(note.note_user_id, user.user_id);
//! ```

pub mod error;
pub mod schema;
pub mod store;

pub use error::{StoreError, StoreResult};
pub use store::Store;

// Re-export notably-core for downstream crates
pub use notably_core;
