use axum::routing::get;
use axum::Router;

use crate::handlers::entity;
use crate::state::AppState;

/// Routes mounted at `/entities`.
///
/// ```text
/// GET    /        -> list
/// POST   /        -> create
/// GET    /{id}    -> get_by_id
/// PUT    /{id}    -> update
/// DELETE /{id}    -> delete
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(entity::list).post(entity::create))
        .route(
            "/{id}",
            get(entity::get_by_id)
                .put(entity::update)
                .delete(entity::delete),
        )
}
