//! Handlers for the `/accounts` resource.
//!
//! Responses carry [`Account`] rows, which have no password field.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use lawmox_core::error::CoreError;
use lawmox_core::types::DbId;
use lawmox_db::models::account::{Account, CreateAccount, UpdateAccount};
use lawmox_db::repositories::AccountRepo;

use crate::error::{AppError, AppResult};
use crate::query::AccountListParams;
use crate::state::AppState;

/// POST /accounts
pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<CreateAccount>,
) -> AppResult<(StatusCode, Json<Account>)> {
    let account = AccountRepo::create(&state.pool, &state.cipher, &input).await?;
    tracing::info!(account_id = %account.id, entity_id = %account.entity_id, "Account created");
    Ok((StatusCode::CREATED, Json(account)))
}

/// GET /accounts
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<AccountListParams>,
) -> AppResult<Json<Vec<Account>>> {
    let accounts = AccountRepo::list(&state.pool, params.entity_id).await?;
    Ok(Json(accounts))
}

/// GET /accounts/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<Account>> {
    let account = AccountRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Account",
            id,
        }))?;
    Ok(Json(account))
}

/// PUT /accounts/{id}
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateAccount>,
) -> AppResult<Json<Account>> {
    let account = AccountRepo::update(&state.pool, &state.cipher, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Account",
            id,
        }))?;
    Ok(Json(account))
}

/// DELETE /accounts/{id}
pub async fn delete(State(state): State<AppState>, Path(id): Path<DbId>) -> AppResult<StatusCode> {
    if AccountRepo::delete(&state.pool, id).await? {
        tracing::info!(account_id = %id, "Account deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::NotFound {
            entity: "Account",
            id,
        }))
    }
}
