pub mod accounts;
pub mod entities;
pub mod health;
pub mod tasks;

use axum::routing::get;
use axum::Router;

use crate::handlers;
use crate::state::AppState;

/// Build the resource route tree.
///
/// Mounted under `/api/v1` and, for existing clients, at the root.
///
/// ```text
/// /entities                  list, create
/// /entities/{id}             get, update, delete
///
/// /accounts                  list (?entity_id=), create
/// /accounts/{id}             get, update, delete
///
/// /tasks                     list (?entity_id=&status=), create
/// /tasks/{id}                get, update, delete
/// /tasks/{id}/steps          ordered steps of one task
///
/// /task-steps                every step of every task
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/entities", entities::router())
        .nest("/accounts", accounts::router())
        .nest("/tasks", tasks::router())
        .route("/task-steps", get(handlers::task::list_all_steps))
}
