use axum::routing::get;
use axum::Router;

use crate::handlers::pieces;
use crate::state::AppState;

/// Piece routes mounted at `/pieces`.
///
/// ```text
/// GET    /              -> list_pieces
/// POST   /              -> create_piece
/// GET    /categories    -> list_categories
/// GET    /{id}          -> get_piece
/// PUT    /{id}          -> update_piece
/// DELETE /{id}          -> delete_piece
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(pieces::list_pieces).post(pieces::create_piece))
        .route("/categories", get(pieces::list_categories))
        .route(
            "/{id}",
            get(pieces::get_piece)
                .put(pieces::update_piece)
                .delete(pieces::delete_piece),
        )
}
