//! Handlers for the `/entities` resource.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use lawmox_core::error::CoreError;
use lawmox_core::types::DbId;
use lawmox_db::models::entity::{CreateEntity, Entity, UpdateEntity};
use lawmox_db::repositories::EntityRepo;

use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// POST /entities
pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<CreateEntity>,
) -> AppResult<(StatusCode, Json<Entity>)> {
    let entity = EntityRepo::create(&state.pool, &input).await?;
    tracing::info!(entity_id = %entity.id, "Entity created");
    Ok((StatusCode::CREATED, Json(entity)))
}

/// GET /entities
pub async fn list(State(state): State<AppState>) -> AppResult<Json<Vec<Entity>>> {
    let entities = EntityRepo::list(&state.pool).await?;
    Ok(Json(entities))
}

/// GET /entities/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<Entity>> {
    let entity = EntityRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Entity",
            id,
        }))?;
    Ok(Json(entity))
}

/// PUT /entities/{id}
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateEntity>,
) -> AppResult<Json<Entity>> {
    let entity = EntityRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Entity",
            id,
        }))?;
    Ok(Json(entity))
}

/// DELETE /entities/{id}
pub async fn delete(State(state): State<AppState>, Path(id): Path<DbId>) -> AppResult<StatusCode> {
    if EntityRepo::delete(&state.pool, id).await? {
        tracing::info!(entity_id = %id, "Entity deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::NotFound {
            entity: "Entity",
            id,
        }))
    }
}
