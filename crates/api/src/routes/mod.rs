pub mod builds;
pub mod health;
pub mod pieces;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// ```text
/// /builds                 list, create
/// /builds/stats           per-status and upcoming counts
/// /builds/{id}            get, update, delete
///
/// /pieces                 list, create
/// /pieces/categories      suggested and used categories
/// /pieces/{id}            get, update, delete
/// ```
///
/// Every route requires a Bearer token.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/builds", builds::router())
        .nest("/pieces", pieces::router())
}
