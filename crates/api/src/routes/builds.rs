use axum::routing::get;
use axum::Router;

use crate::handlers::builds;
use crate::state::AppState;

/// Build routes mounted at `/builds`.
///
/// ```text
/// GET    /          -> list_builds
/// POST   /          -> create_build
/// GET    /stats     -> build_stats
/// GET    /{id}      -> get_build
/// PUT    /{id}      -> update_build
/// DELETE /{id}      -> delete_build
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(builds::list_builds).post(builds::create_build))
        .route("/stats", get(builds::build_stats))
        .route(
            "/{id}",
            get(builds::get_build)
                .put(builds::update_build)
                .delete(builds::delete_build),
        )
}
