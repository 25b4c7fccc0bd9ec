//! Tower middleware for the HTTP server.

pub mod request_id;
