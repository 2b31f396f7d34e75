//! Task board endpoints.
//!
//! All handlers here run behind the session middleware and receive the
//! authenticated owner as an `Extension<CurrentUser>`. Every lookup and
//! mutation is scoped to that owner; the only system-wide rule is title
//! uniqueness at creation.
//!
//! - `GET  /main` - the board: all tasks plus the three status columns
//! - `POST /main` - create a task (fields: `title`, `status`)
//! - `POST /update` - move a task (fields: `name`, `newstatus`)
//! - `POST /delete` - remove a task (fields: `title`)

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{extract::State, response::Redirect, Extension, Form, Json};
use serde::{Deserialize, Serialize};
use taskboard_shared::{
    auth::middleware::CurrentUser,
    models::task::{CreateTask, Task, TaskStatus},
};

/// The board as seen by one user.
#[derive(Debug, Serialize)]
pub struct BoardResponse {
    /// Owner's login name
    pub username: String,

    /// All tasks, insertion order
    pub tasks: Vec<Task>,

    /// Tasks in the todo column
    pub todo: Vec<Task>,

    /// Tasks in the doing column
    pub doing: Vec<Task>,

    /// Tasks in the done column
    pub done: Vec<Task>,
}

/// Task creation form fields
#[derive(Debug, Deserialize)]
pub struct CreateTaskForm {
    /// Title (unique across the board)
    pub title: String,

    /// Entry status: todo, doing or done
    pub status: String,
}

/// Status update form fields
#[derive(Debug, Deserialize)]
pub struct UpdateTaskForm {
    /// Title of the task to move
    pub name: String,

    /// Target status: todo, doing or done
    pub newstatus: String,
}

/// Deletion form fields
#[derive(Debug, Deserialize)]
pub struct DeleteTaskForm {
    /// Title of the task to remove
    pub title: String,
}

/// Lists the caller's board.
pub async fn show_board(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
) -> ApiResult<Json<BoardResponse>> {
    let tasks = Task::list_by_owner(&state.db, user.id).await?;
    let todo = Task::list_by_owner_and_status(&state.db, user.id, TaskStatus::Todo).await?;
    let doing = Task::list_by_owner_and_status(&state.db, user.id, TaskStatus::Doing).await?;
    let done = Task::list_by_owner_and_status(&state.db, user.id, TaskStatus::Done).await?;

    Ok(Json(BoardResponse {
        username: user.username,
        tasks,
        todo,
        doing,
        done,
    }))
}

/// Creates a task owned by the caller.
///
/// # Errors
///
/// - `409` a task with this title already exists (owned by anyone)
/// - `422` empty title or a status outside todo/doing/done
pub async fn create_task(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Form(form): Form<CreateTaskForm>,
) -> ApiResult<Redirect> {
    let status: TaskStatus = form.status.parse()?;

    if form.title.is_empty() {
        return Err(ApiError::ValidationError(vec![
            crate::error::ValidationErrorDetail {
                field: "title".to_string(),
                message: "Title must not be empty".to_string(),
            },
        ]));
    }

    if Task::title_exists(&state.db, &form.title).await? {
        return Err(ApiError::DuplicateTask);
    }

    // The unique constraint backstops the pre-check under concurrent writers
    let task = Task::create(
        &state.db,
        CreateTask {
            title: form.title,
            status,
            user_id: user.id,
        },
    )
    .await?
    .ok_or(ApiError::DuplicateTask)?;

    tracing::info!(task_id = task.id, title = %task.title, user_id = user.id, "Task created");

    Ok(Redirect::to("/main"))
}

/// Moves one of the caller's tasks to a new status.
///
/// # Errors
///
/// - `404` the caller owns no task with this title
/// - `422` a status outside todo/doing/done
pub async fn update_task(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Form(form): Form<UpdateTaskForm>,
) -> ApiResult<Redirect> {
    let status: TaskStatus = form.newstatus.parse()?;

    let task = Task::update_status(&state.db, user.id, &form.name, status)
        .await?
        .ok_or_else(|| ApiError::TaskNotFound(form.name.clone()))?;

    tracing::info!(task_id = task.id, title = %task.title, status = %task.status, "Task moved");

    Ok(Redirect::to("/main"))
}

/// Deletes one of the caller's tasks.
///
/// # Errors
///
/// - `404` the caller owns no task with this title
pub async fn delete_task(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Form(form): Form<DeleteTaskForm>,
) -> ApiResult<Redirect> {
    let deleted = Task::delete_by_title(&state.db, user.id, &form.title).await?;

    if !deleted {
        return Err(ApiError::TaskNotFound(form.title));
    }

    tracing::info!(title = %form.title, user_id = user.id, "Task deleted");

    Ok(Redirect::to("/main"))
}
