//! Handlers for the `/pieces` resource.

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use chrono::Utc;

use kyarafit_core::error::CoreError;
use kyarafit_core::ownership::{ensure_owner, Access};
use kyarafit_core::piece::SUGGESTED_CATEGORIES;
use kyarafit_core::search::{clamp_limit, clamp_offset, DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT};
use kyarafit_core::types::RecordId;
use kyarafit_db::models::piece::{
    CreatePieceRequest, Piece, PieceCategories, PieceListParams, UpdatePieceRequest,
};
use kyarafit_db::repositories::PieceRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::{DataResponse, PageResponse};
use crate::state::AppState;

const ENTITY: &str = "Piece";

fn not_found(id: RecordId) -> AppError {
    AppError::Core(CoreError::NotFound { entity: ENTITY, id })
}

/// POST /pieces
pub async fn create_piece(
    auth: AuthUser,
    State(state): State<AppState>,
    payload: Result<Json<CreatePieceRequest>, JsonRejection>,
) -> AppResult<impl IntoResponse> {
    let Json(input) = payload?;
    let piece = input.into_piece(&auth.user_id, Utc::now())?;

    let created = PieceRepo::new(&state.pool).create(&piece).await?;

    tracing::info!(piece_id = %created.id, user_id = %auth.user_id, "Piece created");

    Ok((StatusCode::CREATED, Json(DataResponse { data: created })))
}

/// GET /pieces
pub async fn list_pieces(
    auth: AuthUser,
    State(state): State<AppState>,
    params: Result<Query<PieceListParams>, QueryRejection>,
) -> AppResult<Json<PageResponse<Piece>>> {
    let Query(params) = params?;
    let filter = params.filter();
    let limit = clamp_limit(params.limit, DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT);
    let offset = clamp_offset(params.offset);

    let repo = PieceRepo::new(&state.pool);
    let pieces = repo
        .list_by_owner(&auth.user_id, &filter, limit, offset)
        .await?;
    let total_count = repo.count(&auth.user_id).await?;

    Ok(Json(PageResponse {
        data: pieces,
        total_count,
        limit,
        offset,
    }))
}

/// GET /pieces/categories
///
/// The fixed suggestions plus whatever categories the caller has used.
pub async fn list_categories(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<PieceCategories>>> {
    let used = PieceRepo::new(&state.pool)
        .distinct_categories(&auth.user_id)
        .await?;

    Ok(Json(DataResponse {
        data: PieceCategories {
            suggested: SUGGESTED_CATEGORIES.to_vec(),
            used,
        },
    }))
}

/// GET /pieces/{id}
pub async fn get_piece(
    auth: AuthUser,
    State(state): State<AppState>,
    id: Result<Path<RecordId>, PathRejection>,
) -> AppResult<Json<DataResponse<Piece>>> {
    let Path(id) = id?;
    let piece = PieceRepo::new(&state.pool)
        .find_by_id(id)
        .await?
        .ok_or_else(|| not_found(id))?;

    ensure_owner(ENTITY, id, &piece.user_id, &auth.user_id, Access::Read)?;

    Ok(Json(DataResponse { data: piece }))
}

/// PUT /pieces/{id}
pub async fn update_piece(
    auth: AuthUser,
    State(state): State<AppState>,
    id: Result<Path<RecordId>, PathRejection>,
    payload: Result<Json<UpdatePieceRequest>, JsonRejection>,
) -> AppResult<Json<DataResponse<Piece>>> {
    let Path(id) = id?;
    let Json(input) = payload?;
    let repo = PieceRepo::new(&state.pool);

    let existing = repo.find_by_id(id).await?.ok_or_else(|| not_found(id))?;
    ensure_owner(ENTITY, id, &existing.user_id, &auth.user_id, Access::Mutate)?;

    let merged = input.apply_to(existing, Utc::now())?;
    let updated = repo.update(&merged).await?.ok_or_else(|| not_found(id))?;

    tracing::info!(piece_id = %id, user_id = %auth.user_id, "Piece updated");

    Ok(Json(DataResponse { data: updated }))
}

/// DELETE /pieces/{id}
pub async fn delete_piece(
    auth: AuthUser,
    State(state): State<AppState>,
    id: Result<Path<RecordId>, PathRejection>,
) -> AppResult<StatusCode> {
    let Path(id) = id?;
    let deleted = PieceRepo::new(&state.pool).delete(id, &auth.user_id).await?;
    if !deleted {
        return Err(not_found(id));
    }

    tracing::info!(piece_id = %id, user_id = %auth.user_id, "Piece deleted");

    Ok(StatusCode::NO_CONTENT)
}
