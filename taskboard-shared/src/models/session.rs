//! Session model and database operations.
//!
//! A session row binds a hashed cookie token to a user for a limited time.
//! Only the SHA-256 hash of the token is stored; the plaintext token lives
//! exclusively in the client's cookie. Expired rows are treated as absent
//! and can be purged lazily.
//!
//! # Schema
//!
//! ```sql
//! CREATE TABLE sessions (
//!     token_hash VARCHAR(64) PRIMARY KEY,
//!     user_id BIGINT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
//!     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
//!     expires_at TIMESTAMPTZ NOT NULL
//! );
//! ```

use chrono::{DateTime, Duration, Utc};
use sqlx::PgPool;

use super::user::User;

/// A server-side login session.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Session {
    /// SHA-256 hex digest of the cookie token
    pub token_hash: String,

    /// The logged-in user
    pub user_id: i64,

    /// When the session was established
    pub created_at: DateTime<Utc>,

    /// After this instant the session no longer authenticates
    pub expires_at: DateTime<Utc>,
}

impl Session {
    /// Creates a session for a user with the given time-to-live.
    pub async fn create(
        pool: &PgPool,
        token_hash: &str,
        user_id: i64,
        ttl_hours: i64,
    ) -> Result<Self, sqlx::Error> {
        let expires_at = Utc::now() + Duration::hours(ttl_hours);

        let session = sqlx::query_as::<_, Session>(
            r#"
            INSERT INTO sessions (token_hash, user_id, expires_at)
            VALUES ($1, $2, $3)
            RETURNING token_hash, user_id, created_at, expires_at
            "#,
        )
        .bind(token_hash)
        .bind(user_id)
        .bind(expires_at)
        .fetch_one(pool)
        .await?;

        Ok(session)
    }

    /// Resolves an unexpired session to its user.
    ///
    /// Returns `None` for an unknown or expired token hash.
    pub async fn find_user(pool: &PgPool, token_hash: &str) -> Result<Option<User>, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT u.id, u.username, u.password_hash, u.created_at, u.last_login_at
            FROM sessions s
            JOIN users u ON u.id = s.user_id
            WHERE s.token_hash = $1 AND s.expires_at > NOW()
            "#,
        )
        .bind(token_hash)
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }

    /// Deletes a session (logout). Safe to call when no such session exists.
    pub async fn delete(pool: &PgPool, token_hash: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM sessions WHERE token_hash = $1")
            .bind(token_hash)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Removes expired session rows. Returns how many were purged.
    pub async fn purge_expired(pool: &PgPool) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM sessions WHERE expires_at <= NOW()")
            .execute(pool)
            .await?;

        Ok(result.rows_affected())
    }

    /// Whether this session has passed its expiry instant.
    pub fn is_expired(&self) -> bool {
        self.expires_at <= Utc::now()
    }
}
