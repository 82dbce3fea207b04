//! Handlers for the `/tasks` and `/task-steps` resources.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use lawmox_core::error::CoreError;
use lawmox_core::types::DbId;
use lawmox_db::models::task::{CreateTask, TaskFilter, TaskWithSteps, UpdateTask};
use lawmox_db::models::task_step::TaskStep;
use lawmox_db::repositories::{TaskRepo, TaskStepRepo};

use crate::error::{AppError, AppResult};
use crate::query::TaskListParams;
use crate::state::AppState;

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound { entity: "Task", id })
}

/// POST /tasks
pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<CreateTask>,
) -> AppResult<(StatusCode, Json<TaskWithSteps>)> {
    let task = TaskRepo::create(&state.pool, &input).await?;
    tracing::info!(task_id = %task.task.id, steps = task.steps.len(), "Task created");
    Ok((StatusCode::CREATED, Json(task)))
}

/// GET /tasks
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<TaskListParams>,
) -> AppResult<Json<Vec<TaskWithSteps>>> {
    let filter: TaskFilter = params.into();
    let tasks = TaskRepo::list(&state.pool, &filter).await?;
    Ok(Json(tasks))
}

/// GET /tasks/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<TaskWithSteps>> {
    let task = TaskRepo::find_by_id_with_steps(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(task))
}

/// PUT /tasks/{id}
///
/// A `steps` array replaces the whole step list; omitting it keeps the
/// existing steps.
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateTask>,
) -> AppResult<Json<TaskWithSteps>> {
    let task = TaskRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(task))
}

/// DELETE /tasks/{id}
pub async fn delete(State(state): State<AppState>, Path(id): Path<DbId>) -> AppResult<StatusCode> {
    if TaskRepo::delete(&state.pool, id).await? {
        tracing::info!(task_id = %id, "Task deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(not_found(id))
    }
}

/// GET /tasks/{id}/steps
pub async fn list_steps(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<Vec<TaskStep>>> {
    if TaskRepo::find_by_id(&state.pool, id).await?.is_none() {
        return Err(not_found(id));
    }
    let steps = TaskStepRepo::list_by_task(&state.pool, id).await?;
    Ok(Json(steps))
}

/// GET /task-steps
pub async fn list_all_steps(State(state): State<AppState>) -> AppResult<Json<Vec<TaskStep>>> {
    let steps = TaskStepRepo::list_all(&state.pool).await?;
    Ok(Json(steps))
}
