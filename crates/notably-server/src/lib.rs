//! notably-server: HTTP API server for Notably
//!
//! This crate provides:
//! - REST API endpoints for users and notes under `/api/v1`
//! - Cookie-based session authorization middleware
//! - Configuration from environment variables
//! - JSON error responses with a tagged error taxonomy
//!
//! # Architecture
//!
//! The server is built on Axum with a middleware stack for:
//! - Request tracing and logging
//! - CORS handling
//! - Request ID generation
//! - Session validation on the protected routes

pub mod config;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod session;
pub mod state;

// Re-exports for convenience
pub use config::{ConfigError, ServerConfig};
pub use error::{ApiError, ApiResult};
pub use session::SessionIdentity;
pub use state::AppState;

// Re-export dependent crates
pub use notably_core;
pub use notably_store;
