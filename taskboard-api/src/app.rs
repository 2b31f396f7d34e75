//! Application state and router builder.
//!
//! # Routes
//!
//! ```text
//! /
//! ├── GET/POST /           # redirect to /login
//! ├── GET/POST /register   # registration form / submit
//! ├── GET/POST /login      # login form / submit (sets session cookie)
//! ├── GET/POST /logout     # clear session (idempotent)
//! ├── GET      /health     # liveness + database connectivity
//! ├── GET/POST /main       # board listing / task creation  (session)
//! ├── POST     /update     # move a task between columns    (session)
//! └── POST     /delete     # remove a task                  (session)
//! ```
//!
//! # Middleware Stack
//!
//! Applied outside-in: security headers, cookie manager, request tracing;
//! the board routes additionally carry the session-auth middleware that
//! injects `CurrentUser`.

use crate::config::Config;
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
    routing::{get, post},
    Router,
};
use sqlx::PgPool;
use std::sync::Arc;
use taskboard_shared::auth::middleware::{session_auth_middleware, AuthError};
use tower_cookies::{CookieManagerLayer, Cookies};
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

/// Shared application state
///
/// Cloned for each request handler via Axum's `State` extractor. Uses Arc
/// internally for cheap cloning.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: PgPool,

    /// Application configuration
    pub config: Arc<Config>,
}

impl AppState {
    /// Creates new application state
    pub fn new(db: PgPool, config: Config) -> Self {
        Self {
            db,
            config: Arc::new(config),
        }
    }
}

/// Builds the complete Axum router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    use crate::routes;

    // Public routes (no session required). Logout is public on purpose:
    // clearing a session that does not exist is a no-op.
    let public_routes = Router::new()
        .route("/", get(routes::auth::welcome).post(routes::auth::welcome))
        .route(
            "/register",
            get(routes::auth::register_page).post(routes::auth::register),
        )
        .route(
            "/login",
            get(routes::auth::login_page).post(routes::auth::login),
        )
        .route(
            "/logout",
            get(routes::auth::logout).post(routes::auth::logout),
        )
        .route("/health", get(routes::health::health_check));

    // Board routes require a live session
    let board_routes = Router::new()
        .route(
            "/main",
            get(routes::board::show_board).post(routes::board::create_task),
        )
        .route("/update", post(routes::board::update_task))
        .route("/delete", post(routes::board::delete_task))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            session_auth_layer,
        ));

    Router::new()
        .merge(public_routes)
        .merge(board_routes)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(CookieManagerLayer::new())
        .layer(axum::middleware::from_fn(
            crate::middleware::security::security_headers,
        ))
        .with_state(state)
}

/// Session authentication middleware layer.
///
/// Resolves the session cookie to a user and injects `CurrentUser` into
/// request extensions; unauthenticated requests are redirected to `/login`.
async fn session_auth_layer(
    State(state): State<AppState>,
    cookies: Cookies,
    req: Request,
    next: Next,
) -> Result<Response, AuthError> {
    session_auth_middleware(state.db.clone(), cookies, req, next).await
}
