//! Session management and route gates
//!
//! The session middleware is the single writer of per-request identity
//! state: it resolves the `session` cookie to a [`SessionUser`] once and
//! attaches it as a request extension. Gates and handlers only read it.
//!
//! Login and signup additionally fire a best-effort analytics event; a
//! failed analytics write is logged and never surfaced.

use axum::{
    extract::{Request, State},
    http::{header, HeaderMap, StatusCode},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
    Json,
};
use riskwatch_common::db::models::SessionUser;
use serde::Deserialize;
use serde_json::json;
use tracing::warn;

use crate::api::ApiError;
use crate::{db, AppState};

const SESSION_COOKIE: &str = "session";

/// The identity resolved for the current request, if any
///
/// Inserted by [`session_loader`]; absent identity means not signed in.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub Option<SessionUser>);

/// Login / signup request body
#[derive(Debug, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

// ========================================
// Session middleware and gates
// ========================================

/// Resolve the session cookie into request identity state
///
/// Runs on every request. A database failure during lookup degrades to
/// "not signed in" rather than failing the request.
pub async fn session_loader(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let user = match session_token(request.headers()) {
        Some(token) => match db::sessions::lookup(&state.db, &token).await {
            Ok(user) => user,
            Err(e) => {
                warn!("Session lookup failed: {}", e);
                None
            }
        },
        None => None,
    };

    request.extensions_mut().insert(CurrentUser(user));
    next.run(request).await
}

/// Authenticated gate: render the page only for signed-in users
///
/// Anonymous requests are redirected to the login route; no protected
/// content is produced.
pub async fn require_auth(request: Request, next: Next) -> Response {
    let signed_in = request
        .extensions()
        .get::<CurrentUser>()
        .map(|current| current.0.is_some())
        .unwrap_or(false);

    if signed_in {
        next.run(request).await
    } else {
        Redirect::to("/login").into_response()
    }
}

/// Privileged gate: require the configured administrator account
///
/// Applies the authenticated check first. A signed-in non-admin is
/// authenticated but not authorized, so the redirect goes to the dashboard
/// rather than the login page. Email comparison is case-insensitive.
pub async fn require_admin(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let email = request
        .extensions()
        .get::<CurrentUser>()
        .and_then(|current| current.0.as_ref())
        .map(|user| user.email.clone());

    match email {
        None => Redirect::to("/login").into_response(),
        Some(email) if email.eq_ignore_ascii_case(&state.config.admin_email) => {
            next.run(request).await
        }
        Some(_) => Redirect::to("/dashboard").into_response(),
    }
}

// ========================================
// Auth API handlers
// ========================================

/// POST /api/auth/signup
pub async fn signup(
    State(state): State<AppState>,
    Json(credentials): Json<Credentials>,
) -> Result<Response, ApiError> {
    validate_credentials(&credentials)?;

    let user = db::users::create_user(&state.db, &credentials.email, &credentials.password).await?;
    let token = db::sessions::create_session(&state.db, &user).await?;

    record_analytics(&state, &user.email, "signup").await;

    Ok(signed_in_response(&user.email, &token))
}

/// POST /api/auth/login
pub async fn login(
    State(state): State<AppState>,
    Json(credentials): Json<Credentials>,
) -> Result<Response, ApiError> {
    let user = db::users::find_by_email(&state.db, &credentials.email)
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))?;

    let user = match user {
        Some(user)
            if riskwatch_common::auth::verify_password(
                &credentials.password,
                &user.salt,
                &user.password_hash,
            ) =>
        {
            user
        }
        // Same message for unknown email and wrong password
        _ => return Err(ApiError::BadRequest("Invalid email or password".to_string())),
    };

    let token = db::sessions::create_session(&state.db, &user).await?;

    record_analytics(&state, &user.email, "login").await;

    Ok(signed_in_response(&user.email, &token))
}

/// POST /api/auth/logout
///
/// Deletes the session row and clears the cookie. Safe to call without a
/// session.
pub async fn logout(State(state): State<AppState>, headers: HeaderMap) -> Result<Response, ApiError> {
    if let Some(token) = session_token(&headers) {
        db::sessions::delete_session(&state.db, &token).await?;
    }

    let clear = format!(
        "{}=; Path=/; Max-Age=0; HttpOnly; SameSite=Lax",
        SESSION_COOKIE
    );
    Ok((
        StatusCode::OK,
        [(header::SET_COOKIE, clear)],
        Json(json!({ "status": "signed_out" })),
    )
        .into_response())
}

// ========================================
// Helpers
// ========================================

fn validate_credentials(credentials: &Credentials) -> Result<(), ApiError> {
    let email = credentials.email.trim();
    if email.is_empty() || !email.contains('@') {
        return Err(ApiError::BadRequest("Invalid email address".to_string()));
    }
    if credentials.password.len() < riskwatch_common::auth::MIN_PASSWORD_LEN {
        return Err(ApiError::BadRequest(format!(
            "Password must be at least {} characters",
            riskwatch_common::auth::MIN_PASSWORD_LEN
        )));
    }
    Ok(())
}

/// Best-effort analytics write; failure is logged and swallowed
async fn record_analytics(state: &AppState, email: &str, action: &str) {
    if let Err(e) = db::analytics::record_event(&state.db, email, action).await {
        warn!("Analytics write failed for {}: {}", action, e);
    }
}

fn signed_in_response(email: &str, token: &str) -> Response {
    let cookie = format!(
        "{}={}; Path=/; HttpOnly; SameSite=Lax",
        SESSION_COOKIE, token
    );
    (
        StatusCode::OK,
        [(header::SET_COOKIE, cookie)],
        Json(json!({ "email": email })),
    )
        .into_response()
}

/// Extract the session token from the Cookie header, if present
fn session_token(headers: &HeaderMap) -> Option<String> {
    let cookies = headers.get(header::COOKIE)?.to_str().ok()?;
    cookies.split(';').find_map(|pair| {
        let (name, value) = pair.trim().split_once('=')?;
        (name == SESSION_COOKIE && !value.is_empty()).then(|| value.to_string())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers_with_cookie(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn test_session_token_extraction() {
        let headers = headers_with_cookie("session=abc123");
        assert_eq!(session_token(&headers), Some("abc123".to_string()));
    }

    #[test]
    fn test_session_token_among_other_cookies() {
        let headers = headers_with_cookie("theme=dark; session=tok; lang=en");
        assert_eq!(session_token(&headers), Some("tok".to_string()));
    }

    #[test]
    fn test_session_token_absent() {
        let headers = headers_with_cookie("theme=dark");
        assert_eq!(session_token(&headers), None);
        assert_eq!(session_token(&HeaderMap::new()), None);
    }

    #[test]
    fn test_empty_session_token_ignored() {
        let headers = headers_with_cookie("session=");
        assert_eq!(session_token(&headers), None);
    }

    #[test]
    fn test_credential_validation() {
        let ok = Credentials {
            email: "user@example.com".to_string(),
            password: "secret1".to_string(),
        };
        assert!(validate_credentials(&ok).is_ok());

        let bad_email = Credentials {
            email: "nope".to_string(),
            password: "secret1".to_string(),
        };
        assert!(validate_credentials(&bad_email).is_err());

        let short_password = Credentials {
            email: "user@example.com".to_string(),
            password: "abc".to_string(),
        };
        assert!(validate_credentials(&short_password).is_err());
    }
}
