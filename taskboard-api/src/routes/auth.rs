//! Authentication endpoints.
//!
//! - `GET/POST /` - redirect to the login page
//! - `GET  /register` - registration form
//! - `POST /register` - create an account, redirect to `/login`
//! - `GET  /login` - login form
//! - `POST /login` - verify credentials, set the session cookie, redirect
//!   to `/main`
//! - `GET/POST /logout` - drop the session (idempotent), redirect to
//!   `/login`
//!
//! Form bodies are `application/x-www-form-urlencoded`; successful
//! mutations answer with redirects, failures with a JSON error body.

use crate::{
    app::AppState,
    error::{ApiError, ApiResult, ValidationErrorDetail},
};
use axum::{
    extract::State,
    response::{Html, Redirect},
    Form,
};
use serde::Deserialize;
use taskboard_shared::{
    auth::{middleware::SESSION_COOKIE, password, session},
    models::{
        session::Session,
        user::{CreateUser, User},
    },
};
use tower_cookies::{
    cookie::{time::Duration, SameSite},
    Cookie, Cookies,
};
use validator::Validate;

/// Registration form fields
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterForm {
    /// Desired login name
    #[validate(length(min = 1, max = 200, message = "Username must be between 1 and 200 characters"))]
    pub username: String,

    /// Password (length policy checked separately)
    pub password: String,

    /// Password repeated, must match
    pub repeat: String,
}

/// Login form fields
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    /// Login name
    pub username: String,

    /// Password
    pub password: String,
}

const REGISTER_PAGE: &str = r#"<!doctype html>
<html>
  <head><title>Taskboard &mdash; Register</title></head>
  <body>
    <h1>Register</h1>
    <form method="post" action="/register">
      <input name="username" placeholder="Username" required>
      <input name="password" type="password" placeholder="Password" required>
      <input name="repeat" type="password" placeholder="Repeat password" required>
      <button type="submit">Register</button>
    </form>
    <p><a href="/login">Already registered? Log in</a></p>
  </body>
</html>
"#;

const LOGIN_PAGE: &str = r#"<!doctype html>
<html>
  <head><title>Taskboard &mdash; Login</title></head>
  <body>
    <h1>Login</h1>
    <form method="post" action="/login">
      <input name="username" placeholder="Username" required>
      <input name="password" type="password" placeholder="Password" required>
      <button type="submit">Login</button>
    </form>
    <p><a href="/register">New here? Register</a></p>
  </body>
</html>
"#;

/// Landing page: everything starts at the login form.
pub async fn welcome() -> Redirect {
    Redirect::to("/login")
}

/// Serves the registration form.
pub async fn register_page() -> Html<&'static str> {
    Html(REGISTER_PAGE)
}

/// Serves the login form.
pub async fn login_page() -> Html<&'static str> {
    Html(LOGIN_PAGE)
}

/// Registers a new user.
///
/// Checks run in a fixed order: username validity, duplicate username,
/// password length, password/repeat match. No row is written when any check
/// fails. The insert itself re-checks uniqueness atomically, so two
/// concurrent registrations of the same name cannot both succeed.
///
/// # Errors
///
/// - `422` validation / weak password / password mismatch
/// - `409` username already exists
pub async fn register(
    State(state): State<AppState>,
    Form(form): Form<RegisterForm>,
) -> ApiResult<Redirect> {
    form.validate().map_err(|e| {
        let errors: Vec<ValidationErrorDetail> = e
            .field_errors()
            .iter()
            .flat_map(|(field, errors)| {
                errors.iter().map(move |error| ValidationErrorDetail {
                    field: field.to_string(),
                    message: error
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| "Validation failed".to_string()),
                })
            })
            .collect();
        ApiError::ValidationError(errors)
    })?;

    if User::username_exists(&state.db, &form.username).await? {
        return Err(ApiError::DuplicateUsername);
    }

    password::validate_password(&form.password).map_err(ApiError::WeakPassword)?;

    if form.password != form.repeat {
        return Err(ApiError::PasswordMismatch);
    }

    let password_hash = password::hash_password(&form.password)?;

    let user = User::create(
        &state.db,
        CreateUser {
            username: form.username,
            password_hash,
        },
    )
    .await?
    .ok_or(ApiError::DuplicateUsername)?;

    tracing::info!(user_id = user.id, username = %user.username, "User registered");

    Ok(Redirect::to("/login"))
}

/// Logs a user in and establishes a session.
///
/// An unknown username and a wrong password both produce the same
/// `invalid_credentials` answer; callers cannot tell which field was wrong.
///
/// # Errors
///
/// - `401` invalid credentials
pub async fn login(
    State(state): State<AppState>,
    cookies: Cookies,
    Form(form): Form<LoginForm>,
) -> ApiResult<Redirect> {
    let user = User::find_by_username(&state.db, &form.username)
        .await?
        .ok_or(ApiError::InvalidCredentials)?;

    if !password::verify_password(&form.password, &user.password_hash)? {
        return Err(ApiError::InvalidCredentials);
    }

    let (token, token_hash) = session::generate_session_token();
    Session::create(
        &state.db,
        &token_hash,
        user.id,
        state.config.session.ttl_hours,
    )
    .await?;

    User::update_last_login(&state.db, user.id).await?;

    cookies.add(session_cookie(
        token,
        state.config.session.ttl_hours,
        state.config.session.cookie_secure,
    ));

    tracing::info!(user_id = user.id, username = %user.username, "User logged in");

    Ok(Redirect::to("/main"))
}

/// Ends the current session, if any.
///
/// Idempotent: a request without a session cookie (or with a stale one)
/// still answers with the redirect to `/login`.
pub async fn logout(State(state): State<AppState>, cookies: Cookies) -> ApiResult<Redirect> {
    if let Some(cookie) = cookies.get(SESSION_COOKIE) {
        let token_hash = session::hash_session_token(cookie.value());
        Session::delete(&state.db, &token_hash).await?;

        cookies.remove(Cookie::build(SESSION_COOKIE).path("/").build());
    }

    Ok(Redirect::to("/login"))
}

/// Builds the session cookie: HttpOnly, same-site Lax, lifetime matching
/// the server-side session row.
fn session_cookie(token: String, ttl_hours: i64, secure: bool) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, token))
        .path("/")
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Lax)
        .max_age(Duration::hours(ttl_hours))
        .build()
}
