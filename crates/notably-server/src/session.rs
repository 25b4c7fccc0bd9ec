//! Cookie-based session authorization.
//!
//! Sessions are deliberately simple: a successful login sets a cookie
//! whose value is the user's email identity, and every protected route
//! requires that the identity claimed by the request equals that cookie
//! value. The gate is stateless; there is no server-side session table.
//!
//! Identity extraction is per-endpoint, not inferred: POST bodies carry
//! the owner in their `user_id` field, and GET/DELETE requests carry it
//! in the `userid` query parameter. When the middleware reads a body it
//! restores the bytes afterwards so the handler parses the request
//! unchanged.

use axum::{
    body::{Body, to_bytes},
    extract::Request,
    middleware::Next,
    response::Response,
};
use axum_extra::extract::cookie::CookieJar;
use http::Method;
use serde::Deserialize;

use notably_core::{is_valid_email, non_blank};

use crate::error::ApiError;

/// Name of the session cookie set on successful login.
pub const SESSION_COOKIE: &str = "lcmas";

/// Query parameter key carrying the user id on GET/DELETE requests.
pub const USER_ID_PARAM: &str = "userid";

/// The validated identity of the logged-in user, inserted into request
/// extensions for the downstream handler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionIdentity(pub String);

/// Just enough of a POST body to find the claimed identity. The handler
/// re-parses the full body against its own schema.
#[derive(Debug, Deserialize)]
struct IdentityProbe {
    user_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct UserIdParam {
    userid: Option<String>,
}

/// Session gate applied to all note routes and `GET /user`.
///
/// Rejects with 401 when the session cookie is missing or empty, 400
/// when the claimed identity is absent or malformed, and 403 when it
/// does not match the cookie. On success the handler runs with the
/// validated identity available as a [`SessionIdentity`] extension.
pub async fn require_session(request: Request, next: Next) -> Result<Response, ApiError> {
    let jar = CookieJar::from_headers(request.headers());
    let cookie_value = jar
        .get(SESSION_COOKIE)
        .map(|c| c.value().to_string())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| ApiError::Unauthorized("you are not logged in".to_string()))?;

    let (mut request, claimed) = if request.method() == Method::POST {
        extract_identity_from_body(request).await?
    } else {
        let claimed = extract_identity_from_query(&request)?;
        (request, claimed)
    };

    let claimed = non_blank(&claimed)
        .ok_or_else(|| {
            ApiError::BadRequest("did not find an auth value we expected".to_string())
        })?
        .to_string();

    if !is_valid_email(&claimed) {
        return Err(ApiError::BadRequest(
            "an auth value we wanted was in an unexpected format".to_string(),
        ));
    }

    if claimed != cookie_value {
        tracing::warn!(claimed = %claimed, "Session identity mismatch");
        return Err(ApiError::Forbidden(format!("{claimed} not logged in")));
    }

    request.extensions_mut().insert(SessionIdentity(claimed));
    Ok(next.run(request).await)
}

/// Read the claimed identity from a POST body's `user_id` field,
/// restoring the body bytes for the handler.
async fn extract_identity_from_body(request: Request) -> Result<(Request, String), ApiError> {
    let (parts, body) = request.into_parts();
    let bytes = to_bytes(body, usize::MAX)
        .await
        .map_err(|e| ApiError::Internal(format!("failed reading request body: {e}")))?;

    let probe: IdentityProbe = serde_json::from_slice(&bytes)
        .map_err(|e| ApiError::BadRequest(format!("request body is not valid JSON: {e}")))?;
    let claimed = probe.user_id.unwrap_or_default();

    // Without this, the request EOFs when the handler parses the body.
    let request = Request::from_parts(parts, Body::from(bytes));
    Ok((request, claimed))
}

/// Read the claimed identity from the `userid` query parameter.
fn extract_identity_from_query(request: &Request) -> Result<String, ApiError> {
    let query = request.uri().query().unwrap_or("");
    let params: UserIdParam = serde_urlencoded::from_str(query)
        .map_err(|e| ApiError::BadRequest(format!("malformed query string: {e}")))?;
    params.userid.ok_or_else(|| {
        ApiError::BadRequest(format!(
            "did not find the '{USER_ID_PARAM}' key in the query params"
        ))
    })
}
