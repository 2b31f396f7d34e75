//! Common test utilities for integration tests.
//!
//! Requires a running PostgreSQL instance reachable via `DATABASE_URL`
//! (a `.env` file works). Names are randomized per test so the global
//! uniqueness constraints don't collide across tests or runs.

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::response::Response;
use sqlx::PgPool;
use taskboard_api::app::{build_router, AppState};
use taskboard_api::config::Config;
use tower::Service as _;

/// Test context: a database pool and the built router.
pub struct TestContext {
    pub db: PgPool,
    pub app: axum::Router,
}

impl TestContext {
    /// Connects to the test database, applies migrations, builds the app.
    pub async fn new() -> anyhow::Result<Self> {
        let config = Config::from_env()?;

        taskboard_shared::db::migrations::ensure_database_exists(&config.database.url).await?;

        let db = PgPool::connect(&config.database.url).await?;

        // Path relative to this crate's Cargo.toml
        sqlx::migrate!("../migrations").run(&db).await?;

        let state = AppState::new(db.clone(), config);
        let app = build_router(state);

        Ok(TestContext { db, app })
    }
}

/// Produces a name that won't collide with other tests or earlier runs.
pub fn unique(prefix: &str) -> String {
    format!(
        "{}-{:08x}{:08x}",
        prefix,
        rand::random::<u32>(),
        rand::random::<u32>()
    )
}

fn encode_component(value: &str) -> String {
    value
        .chars()
        .map(|c| match c {
            ' ' => "+".to_string(),
            '&' => "%26".to_string(),
            '=' => "%3D".to_string(),
            '%' => "%25".to_string(),
            '+' => "%2B".to_string(),
            c => c.to_string(),
        })
        .collect()
}

/// Builds an `application/x-www-form-urlencoded` body.
pub fn form_body(pairs: &[(&str, &str)]) -> String {
    pairs
        .iter()
        .map(|(k, v)| format!("{}={}", k, encode_component(v)))
        .collect::<Vec<_>>()
        .join("&")
}

/// Sends a GET request, optionally with a session cookie.
pub async fn get(ctx: &TestContext, uri: &str, cookie: Option<&str>) -> Response {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    let request = builder.body(Body::empty()).unwrap();

    ctx.app.clone().call(request).await.unwrap()
}

/// POSTs a form, optionally with a session cookie.
pub async fn post_form(
    ctx: &TestContext,
    uri: &str,
    pairs: &[(&str, &str)],
    cookie: Option<&str>,
) -> Response {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    let request = builder.body(Body::from(form_body(pairs))).unwrap();

    ctx.app.clone().call(request).await.unwrap()
}

/// Submits the registration form.
pub async fn register(
    ctx: &TestContext,
    username: &str,
    password: &str,
    repeat: &str,
) -> Response {
    post_form(
        ctx,
        "/register",
        &[
            ("username", username),
            ("password", password),
            ("repeat", repeat),
        ],
        None,
    )
    .await
}

/// Submits the login form.
pub async fn login(ctx: &TestContext, username: &str, password: &str) -> Response {
    post_form(
        ctx,
        "/login",
        &[("username", username), ("password", password)],
        None,
    )
    .await
}

/// Extracts the `name=value` pair of the session cookie from a response.
pub fn session_cookie(response: &Response) -> Option<String> {
    let set_cookie = response.headers().get(header::SET_COOKIE)?.to_str().ok()?;
    set_cookie.split(';').next().map(|s| s.to_string())
}

/// Registers a user and logs them in, returning the session cookie.
pub async fn register_and_login(ctx: &TestContext, username: &str, password: &str) -> String {
    let response = register(ctx, username, password, password).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let response = login(ctx, username, password).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    session_cookie(&response).expect("login should set a session cookie")
}

/// Reads a response body as JSON.
pub async fn json_body(response: Response) -> serde_json::Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}

/// Counts users with the given username.
pub async fn count_users(db: &PgPool, username: &str) -> i64 {
    let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users WHERE username = $1")
        .bind(username)
        .fetch_one(db)
        .await
        .unwrap();
    count
}

/// Counts tasks with the given title.
pub async fn count_tasks(db: &PgPool, title: &str) -> i64 {
    let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM tasks WHERE title = $1")
        .bind(title)
        .fetch_one(db)
        .await
        .unwrap();
    count
}

/// Counts live sessions belonging to the given username.
pub async fn count_sessions(db: &PgPool, username: &str) -> i64 {
    let (count,): (i64,) = sqlx::query_as(
        r#"
        SELECT COUNT(*)
        FROM sessions s
        JOIN users u ON u.id = s.user_id
        WHERE u.username = $1 AND s.expires_at > NOW()
        "#,
    )
    .bind(username)
    .fetch_one(db)
    .await
    .unwrap();
    count
}

/// Fetches the stored status of a task, if it exists.
pub async fn task_status(db: &PgPool, title: &str) -> Option<String> {
    sqlx::query_as::<_, (String,)>("SELECT status::text FROM tasks WHERE title = $1")
        .bind(title)
        .fetch_optional(db)
        .await
        .unwrap()
        .map(|(status,)| status)
}
