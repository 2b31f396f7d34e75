//! Session authentication middleware for Axum.
//!
//! Resolves the session cookie into a [`CurrentUser`] request extension:
//! cookie token → SHA-256 hash → unexpired session row → user. Handlers on
//! protected routes extract the user with `Extension<CurrentUser>`; the
//! authenticated context is always an explicit per-request value, never
//! process-wide state.
//!
//! Requests without a valid session are redirected to `/login`, matching
//! the browser flow of the board.

use axum::{
    extract::Request,
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use sqlx::PgPool;
use tower_cookies::Cookies;

use crate::models::session::Session;

/// Name of the session cookie.
pub const SESSION_COOKIE: &str = "taskboard_session";

/// Authenticated user attached to request extensions by
/// [`session_auth_middleware`].
#[derive(Debug, Clone)]
pub struct CurrentUser {
    /// User ID
    pub id: i64,

    /// Login name
    pub username: String,
}

/// Error type for the session middleware
#[derive(Debug)]
pub enum AuthError {
    /// No session cookie was presented
    MissingSession,

    /// The cookie does not resolve to a live session
    InvalidSession,

    /// Database error during session lookup
    DatabaseError(String),
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        match self {
            // Unauthenticated browser requests land on the login page
            AuthError::MissingSession | AuthError::InvalidSession => {
                Redirect::to("/login").into_response()
            }
            AuthError::DatabaseError(msg) => {
                tracing::error!("Session lookup failed: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error").into_response()
            }
        }
    }
}

/// Session authentication middleware.
///
/// Expects the `tower_cookies::CookieManagerLayer` to be installed on the
/// router so the [`Cookies`] extractor is available.
pub async fn session_auth_middleware(
    pool: PgPool,
    cookies: Cookies,
    mut req: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let token = cookies
        .get(SESSION_COOKIE)
        .map(|c| c.value().to_string())
        .ok_or(AuthError::MissingSession)?;

    // Reject garbage cookies before touching the database
    if !super::session::validate_token_format(&token) {
        return Err(AuthError::InvalidSession);
    }

    let token_hash = super::session::hash_session_token(&token);

    let user = Session::find_user(&pool, &token_hash)
        .await
        .map_err(|e| AuthError::DatabaseError(e.to_string()))?
        .ok_or(AuthError::InvalidSession)?;

    req.extensions_mut().insert(CurrentUser {
        id: user.id,
        username: user.username,
    });

    Ok(next.run(req).await)
}
