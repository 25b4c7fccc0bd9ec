//! Note CRUD routes. Every route here sits behind the session gate.

use axum::{
    Extension, Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::post,
};
use serde::{Deserialize, Serialize};

use notably_core::{Note, non_blank};
use notably_store::StoreError;

use crate::error::{ApiError, ApiResult};
use crate::session::SessionIdentity;
use crate::state::AppState;

// ============================================================================
// Request/Response Types
// ============================================================================

/// Body of POST /note.
#[derive(Debug, Deserialize)]
pub struct AddNoteRequest {
    /// The email id of the logged-in owner.
    pub user_id: String,
    /// The note contents. Stored verbatim.
    pub note: String,
}

/// Body of POST /note/{id}.
#[derive(Debug, Deserialize)]
pub struct UpdateNoteRequest {
    /// The note id. Must match the path parameter.
    pub id: String,
    /// The email id of the logged-in owner.
    pub user_id: String,
    /// The new note contents.
    pub note: String,
}

/// Response for the delete routes. Zero is a valid, non-error count.
#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    /// Number of rows removed.
    pub deleted: usize,
}

// ============================================================================
// Route Handlers
// ============================================================================

/// POST /note - Add a note for the logged-in user.
///
/// Body: `{"user_id": "...", "note": "..."}`. Returns 201 with the
/// stored note. An unregistered owner is a 400: the request referenced
/// a user this system does not have.
async fn add_note(
    State(state): State<AppState>,
    Json(body): Json<AddNoteRequest>,
) -> ApiResult<(StatusCode, Json<Note>)> {
    let user_id = non_blank(&body.user_id).ok_or_else(|| {
        ApiError::BadRequest("request 'user_id' field is empty or blank".to_string())
    })?;
    if body.note.is_empty() {
        return Err(ApiError::BadRequest(format!(
            "request 'note' field is empty for user '{user_id}'"
        )));
    }

    let note = state
        .store()
        .add_note_for_user(user_id, &body.note)
        .map_err(|e| match e {
            StoreError::UserNotFound(id) => {
                ApiError::BadRequest(format!("cannot add note for user '{id}', user was not found"))
            }
            other => ApiError::Store(other),
        })?;

    tracing::info!(user_id = %note.note_user_id, note_id = %note.note_id, "Note added");
    Ok((StatusCode::CREATED, Json(note)))
}

/// POST /note/{id} - Update an existing note.
///
/// The note id appears in the path as well as the body; the two must
/// agree. A missing note or owner is a 400 here, not a 404: the body
/// named a row this system does not have.
async fn update_note(
    State(state): State<AppState>,
    Path(path_id): Path<String>,
    Json(body): Json<UpdateNoteRequest>,
) -> ApiResult<Json<Note>> {
    let note_id = non_blank(&body.id)
        .ok_or_else(|| ApiError::BadRequest("request 'id' field is empty or blank".to_string()))?;
    if note_id != path_id.trim() {
        return Err(ApiError::BadRequest(format!(
            "note id in path ('{path_id}') does not match note id in body ('{note_id}')"
        )));
    }
    if body.note.is_empty() {
        return Err(ApiError::BadRequest(
            "request 'note' field is empty".to_string(),
        ));
    }

    let note = state
        .store()
        .update_note_for_user(&body.user_id, note_id, &body.note)
        .map_err(|e| match e {
            StoreError::UserNotFound(_) | StoreError::NoteNotFound { .. } => {
                ApiError::BadRequest(e.to_string())
            }
            other => ApiError::Store(other),
        })?;

    tracing::info!(user_id = %note.note_user_id, note_id = %note.note_id, "Note updated");
    Ok(Json(note))
}

/// GET /note/{id}?userid=... - Fetch one of the logged-in user's notes.
async fn get_note(
    State(state): State<AppState>,
    Extension(identity): Extension<SessionIdentity>,
    Path(note_id): Path<String>,
) -> ApiResult<Json<Note>> {
    let note = state.store().get_note_for_user(&identity.0, &note_id)?;
    Ok(Json(note))
}

/// DELETE /note/{id}?userid=... - Delete one note.
///
/// Deleting an already-deleted note succeeds with a zero count.
async fn delete_note(
    State(state): State<AppState>,
    Extension(identity): Extension<SessionIdentity>,
    Path(note_id): Path<String>,
) -> ApiResult<Json<DeleteResponse>> {
    let deleted = state.store().delete_note_for_user(&identity.0, &note_id)?;
    tracing::info!(user_id = %identity.0, note_id = %note_id, deleted, "Note deleted");
    Ok(Json(DeleteResponse { deleted }))
}

/// GET /note?userid=... - All of the logged-in user's notes.
///
/// A user with no notes gets an empty list. Store failures here are
/// client errors: the request named an owner this system does not have.
async fn get_all_notes(
    State(state): State<AppState>,
    Extension(identity): Extension<SessionIdentity>,
) -> ApiResult<Json<Vec<Note>>> {
    let notes = state
        .store()
        .all_notes_for_user(&identity.0)
        .map_err(|e| ApiError::BadRequest(e.to_string()))?;
    Ok(Json(notes))
}

/// DELETE /note?userid=... - Delete all of the logged-in user's notes.
async fn delete_all_notes(
    State(state): State<AppState>,
    Extension(identity): Extension<SessionIdentity>,
) -> ApiResult<Json<DeleteResponse>> {
    let deleted = state
        .store()
        .delete_all_notes_for_user(&identity.0)
        .map_err(|e| ApiError::BadRequest(e.to_string()))?;
    tracing::info!(user_id = %identity.0, deleted, "All notes deleted");
    Ok(Json(DeleteResponse { deleted }))
}

/// Build the note routes. The session gate is layered on by the caller.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/note",
            post(add_note).get(get_all_notes).delete(delete_all_notes),
        )
        .route(
            "/note/{id}",
            post(update_note).get(get_note).delete(delete_note),
        )
}
