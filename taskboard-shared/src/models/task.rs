//! Task model and database operations.
//!
//! # State machine
//!
//! Tasks carry one of three statuses: `todo`, `doing`, `done`. Transitions
//! are unrestricted (any status may move to any other), the entry status is
//! supplied at creation, and there is no terminal status.
//!
//! # Schema
//!
//! ```sql
//! CREATE TYPE task_status AS ENUM ('todo', 'doing', 'done');
//!
//! CREATE TABLE tasks (
//!     id BIGSERIAL PRIMARY KEY,
//!     title VARCHAR(80) NOT NULL UNIQUE CHECK (title <> ''),
//!     status task_status NOT NULL,
//!     user_id BIGINT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
//!     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
//! );
//! ```
//!
//! Titles are unique across the whole board, not per owner — duplicate
//! prevention at creation matches that constraint. Mutations and lookups,
//! however, are always scoped to the owning user.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use std::fmt;
use std::str::FromStr;

/// Task board column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "task_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    /// Not started
    Todo,

    /// In progress
    Doing,

    /// Finished
    Done,
}

impl TaskStatus {
    /// All statuses, in board order.
    pub const ALL: [TaskStatus; 3] = [TaskStatus::Todo, TaskStatus::Doing, TaskStatus::Done];

    /// Converts the status to its wire/database form.
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Todo => "todo",
            TaskStatus::Doing => "doing",
            TaskStatus::Done => "done",
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing a status value that is not one of the three
/// board columns.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid task status: {0:?}")]
pub struct InvalidStatus(pub String);

impl FromStr for TaskStatus {
    type Err = InvalidStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "todo" => Ok(TaskStatus::Todo),
            "doing" => Ok(TaskStatus::Doing),
            "done" => Ok(TaskStatus::Done),
            other => Err(InvalidStatus(other.to_string())),
        }
    }
}

/// A task on the board.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Task {
    /// Surrogate key
    pub id: i64,

    /// Human-readable title, unique across the board
    pub title: String,

    /// Current board column
    pub status: TaskStatus,

    /// Owning user
    pub user_id: i64,

    /// When the task was created
    pub created_at: DateTime<Utc>,
}

/// Input for creating a new task.
#[derive(Debug, Clone)]
pub struct CreateTask {
    /// Title (must be unique across the board)
    pub title: String,

    /// Entry status
    pub status: TaskStatus,

    /// Owning user
    pub user_id: i64,
}

impl Task {
    /// Inserts a task.
    ///
    /// Returns `None` when a task with the same title already exists (owned
    /// by anyone). Check and insert are a single statement, so concurrent
    /// creations of the same title cannot both succeed.
    pub async fn create(pool: &PgPool, data: CreateTask) -> Result<Option<Self>, sqlx::Error> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            INSERT INTO tasks (title, status, user_id)
            VALUES ($1, $2, $3)
            ON CONFLICT (title) DO NOTHING
            RETURNING id, title, status, user_id, created_at
            "#,
        )
        .bind(data.title)
        .bind(data.status)
        .bind(data.user_id)
        .fetch_optional(pool)
        .await?;

        Ok(task)
    }

    /// Checks whether any task (regardless of owner) already uses a title.
    pub async fn title_exists(pool: &PgPool, title: &str) -> Result<bool, sqlx::Error> {
        let (exists,): (bool,) =
            sqlx::query_as("SELECT EXISTS (SELECT 1 FROM tasks WHERE title = $1)")
                .bind(title)
                .fetch_one(pool)
                .await?;

        Ok(exists)
    }

    /// Lists all tasks owned by a user, in insertion order.
    pub async fn list_by_owner(pool: &PgPool, user_id: i64) -> Result<Vec<Self>, sqlx::Error> {
        let tasks = sqlx::query_as::<_, Task>(
            r#"
            SELECT id, title, status, user_id, created_at
            FROM tasks
            WHERE user_id = $1
            ORDER BY id
            "#,
        )
        .bind(user_id)
        .fetch_all(pool)
        .await?;

        Ok(tasks)
    }

    /// Lists a user's tasks in one board column, in insertion order.
    pub async fn list_by_owner_and_status(
        pool: &PgPool,
        user_id: i64,
        status: TaskStatus,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let tasks = sqlx::query_as::<_, Task>(
            r#"
            SELECT id, title, status, user_id, created_at
            FROM tasks
            WHERE user_id = $1 AND status = $2
            ORDER BY id
            "#,
        )
        .bind(user_id)
        .bind(status)
        .fetch_all(pool)
        .await?;

        Ok(tasks)
    }

    /// Moves an owned task to a new status.
    ///
    /// The lookup is scoped to the owner: a title held by another user is
    /// indistinguishable from a missing one. Returns the updated task, or
    /// `None` when no owned task matches. Read-modify-write is a single
    /// statement, so it needs no explicit transaction.
    pub async fn update_status(
        pool: &PgPool,
        user_id: i64,
        title: &str,
        status: TaskStatus,
    ) -> Result<Option<Self>, sqlx::Error> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            UPDATE tasks
            SET status = $3
            WHERE user_id = $1 AND title = $2
            RETURNING id, title, status, user_id, created_at
            "#,
        )
        .bind(user_id)
        .bind(title)
        .bind(status)
        .fetch_optional(pool)
        .await?;

        Ok(task)
    }

    /// Deletes an owned task by title.
    ///
    /// Owner-scoped like [`Task::update_status`]. Returns whether a row was
    /// removed.
    pub async fn delete_by_title(
        pool: &PgPool,
        user_id: i64,
        title: &str,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM tasks WHERE user_id = $1 AND title = $2")
            .bind(user_id)
            .bind(title)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
