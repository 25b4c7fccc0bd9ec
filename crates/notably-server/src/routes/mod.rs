//! Route definitions for the HTTP API.
//!
//! All routes live under the `/api/v1` prefix so future breaking
//! changes can go into a `/api/v2` group.

pub mod health;
pub mod notes;
pub mod users;

use axum::{Router, middleware};

use crate::session;
use crate::state::AppState;

/// Build the complete router with all routes.
pub fn build_router(state: AppState) -> Router {
    // Routes reachable without a session.
    let open = Router::new().merge(health::routes()).merge(users::routes());

    // Routes behind the session gate.
    let gated = Router::new()
        .merge(users::session_routes())
        .merge(notes::routes())
        .route_layer(middleware::from_fn(session::require_session));

    Router::new()
        .nest("/api/v1", open.merge(gated))
        .with_state(state)
}
