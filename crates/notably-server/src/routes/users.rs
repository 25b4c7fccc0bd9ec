//! User routes: register, login, logout, and self lookup.

use axum::{
    Extension, Json, Router,
    extract::State,
    http::StatusCode,
    routing::{get, post, put},
};
use axum_extra::extract::cookie::{Cookie, CookieJar};
use serde::{Deserialize, Serialize};

use notably_core::{User, is_valid_email, non_blank, sha256_hex};

use crate::error::{ApiError, ApiResult};
use crate::session::{SESSION_COOKIE, SessionIdentity};
use crate::state::AppState;

// ============================================================================
// Request/Response Types
// ============================================================================

/// Body of POST /register and POST /login.
#[derive(Debug, Deserialize)]
pub struct UserCredentials {
    /// The user id as an email address.
    pub id: String,
    /// The plaintext password. Hashed immediately; never stored.
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Validate credentials and return the trimmed id plus the password
/// digest. Shared by register and login.
fn checked_credentials(body: &UserCredentials) -> ApiResult<(String, String)> {
    let user_id = non_blank(&body.id)
        .ok_or_else(|| ApiError::BadRequest("request 'id' field is empty or blank".to_string()))?;

    if !is_valid_email(user_id) {
        return Err(ApiError::BadRequest(
            "request 'id' field does not appear to be a valid email address".to_string(),
        ));
    }

    let password = non_blank(&body.password).ok_or_else(|| {
        ApiError::BadRequest("request 'password' field is empty or blank".to_string())
    })?;

    let digest = sha256_hex(password);
    if non_blank(&digest).is_none() {
        // Cannot happen with the current digest, but a blank hash must
        // never reach the store.
        return Err(ApiError::Unprocessable(
            "failed to hash request 'password' field".to_string(),
        ));
    }

    Ok((user_id.to_string(), digest))
}

// ============================================================================
// Route Handlers
// ============================================================================

/// POST /register - Register a new user.
///
/// Body: `{"id": "user@example.com", "password": "..."}`.
/// Returns 201 with the stored user, password hash redacted; 409 when
/// the id is already registered.
async fn register(
    State(state): State<AppState>,
    Json(body): Json<UserCredentials>,
) -> ApiResult<(StatusCode, Json<User>)> {
    let (user_id, digest) = checked_credentials(&body)?;

    let user = state.store().add_user(&user_id, &digest)?;

    tracing::info!(user_id = %user.user_id, "User registered");
    Ok((StatusCode::CREATED, Json(user.redacted())))
}

/// POST /login - Log in an already registered user.
///
/// On success sets the session cookie carrying the user id, with the
/// configured max age. A wrong password or mismatched id is 403.
async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(body): Json<UserCredentials>,
) -> ApiResult<(CookieJar, Json<MessageResponse>)> {
    let (user_id, digest) = checked_credentials(&body)?;

    let user = state.store().get_user(&user_id)?;

    if user.user_id != user_id || user.password_hash != digest {
        tracing::warn!(user_id = %user_id, "Login verification failed");
        return Err(ApiError::Forbidden(format!(
            "terminating login due to user verification failure for user '{user_id}'"
        )));
    }

    let cookie = Cookie::build((SESSION_COOKIE, user.user_id.clone()))
        .path("/")
        .http_only(true)
        .max_age(time::Duration::seconds(state.config().cookie_max_age_secs))
        .build();

    tracing::info!(user_id = %user_id, "User logged in");
    Ok((
        jar.add(cookie),
        Json(MessageResponse {
            message: format!("OK, user '{user_id}' logged in"),
        }),
    ))
}

/// PUT /logout - Log out the current user.
///
/// Idempotent: an empty cookie value means the session already ended
/// and is reported as success, so a client seeing that response can
/// simply log in again. Only a wholly absent cookie is 401.
async fn logout(jar: CookieJar) -> ApiResult<(CookieJar, Json<MessageResponse>)> {
    let Some(cookie) = jar.get(SESSION_COOKIE) else {
        return Err(ApiError::Unauthorized(
            "no valid logged-in user found".to_string(),
        ));
    };

    if cookie.value().is_empty() {
        return Ok((
            jar,
            Json(MessageResponse {
                message: "already logged out or session has expired".to_string(),
            }),
        ));
    }

    let user_id = cookie.value().to_string();
    let jar = jar.remove(Cookie::build((SESSION_COOKIE, "")).path("/"));

    tracing::info!(user_id = %user_id, "User logged out");
    Ok((
        jar,
        Json(MessageResponse {
            message: format!("user '{user_id}' has been logged out"),
        }),
    ))
}

/// GET /user?userid=... - A logged-in user's own details.
///
/// The session gate has already checked that the `userid` parameter is
/// a valid email equal to the cookie identity; users can only view
/// themselves. The password hash is redacted in the response.
async fn get_user(
    State(state): State<AppState>,
    Extension(identity): Extension<SessionIdentity>,
) -> ApiResult<Json<User>> {
    let user = state.store().get_user(&identity.0)?;

    if user.user_id != identity.0 {
        // The id index should make this impossible.
        return Err(ApiError::NotFound(format!(
            "user '{}' not found",
            identity.0
        )));
    }

    Ok(Json(user.redacted()))
}

/// Build the open user routes (no session required).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/logout", put(logout))
}

/// Build the user routes that sit behind the session gate.
pub fn session_routes() -> Router<AppState> {
    Router::new().route("/user", get(get_user))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn credentials(id: &str, password: &str) -> UserCredentials {
        UserCredentials {
            id: id.to_string(),
            password: password.to_string(),
        }
    }

    #[test]
    fn test_credentials_deserialize() {
        let json = r#"{"id": "a@b.com", "password": "pw1"}"#;
        let body: UserCredentials = serde_json::from_str(json).unwrap();
        assert_eq!(body.id, "a@b.com");
        assert_eq!(body.password, "pw1");
    }

    #[test]
    fn test_checked_credentials_hashes_the_password() {
        let (user_id, digest) = checked_credentials(&credentials(" a@b.com ", "pw1")).unwrap();
        assert_eq!(user_id, "a@b.com");
        assert_eq!(digest, sha256_hex("pw1"));
    }

    #[test]
    fn test_checked_credentials_rejects_blank_id() {
        let err = checked_credentials(&credentials("   ", "pw1")).unwrap_err();
        assert!(matches!(err, ApiError::BadRequest(_)));
    }

    #[test]
    fn test_checked_credentials_rejects_non_email_id() {
        let err = checked_credentials(&credentials("notanemail", "pw1")).unwrap_err();
        assert!(matches!(err, ApiError::BadRequest(_)));
    }

    #[test]
    fn test_checked_credentials_rejects_blank_password() {
        let err = checked_credentials(&credentials("a@b.com", "  ")).unwrap_err();
        assert!(matches!(err, ApiError::BadRequest(_)));
    }
}
