//! Handlers for the `/builds` resource.
//!
//! Every endpoint requires authentication and only ever touches the
//! caller's own builds.

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use chrono::Utc;

use kyarafit_core::build::DEFAULT_UPCOMING_DAYS;
use kyarafit_core::error::CoreError;
use kyarafit_core::ownership::{ensure_owner, Access};
use kyarafit_core::search::{clamp_limit, clamp_offset, DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT};
use kyarafit_core::types::RecordId;
use kyarafit_db::models::build::{
    Build, BuildListParams, BuildStats, CreateBuildRequest, UpdateBuildRequest,
};
use kyarafit_db::repositories::BuildRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::{DataResponse, PageResponse};
use crate::state::AppState;

const ENTITY: &str = "Build";

fn not_found(id: RecordId) -> AppError {
    AppError::Core(CoreError::NotFound { entity: ENTITY, id })
}

// ---------------------------------------------------------------------------
// POST /builds
// ---------------------------------------------------------------------------

/// Create a build owned by the caller.
pub async fn create_build(
    auth: AuthUser,
    State(state): State<AppState>,
    payload: Result<Json<CreateBuildRequest>, JsonRejection>,
) -> AppResult<impl IntoResponse> {
    let Json(input) = payload?;
    let build = input.into_build(&auth.user_id, Utc::now())?;

    let created = BuildRepo::new(&state.pool).create(&build).await?;

    tracing::info!(build_id = %created.id, user_id = %auth.user_id, "Build created");

    Ok((StatusCode::CREATED, Json(DataResponse { data: created })))
}

// ---------------------------------------------------------------------------
// GET /builds
// ---------------------------------------------------------------------------

/// List the caller's builds, optionally narrowed by one filter.
pub async fn list_builds(
    auth: AuthUser,
    State(state): State<AppState>,
    params: Result<Query<BuildListParams>, QueryRejection>,
) -> AppResult<Json<PageResponse<Build>>> {
    let Query(params) = params?;
    let filter = params.filter()?;
    let limit = clamp_limit(params.limit, DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT);
    let offset = clamp_offset(params.offset);

    let repo = BuildRepo::new(&state.pool);
    let builds = repo
        .list_by_owner(&auth.user_id, &filter, limit, offset)
        .await?;
    let total_count = repo.count(&auth.user_id).await?;

    Ok(Json(PageResponse {
        data: builds,
        total_count,
        limit,
        offset,
    }))
}

// ---------------------------------------------------------------------------
// GET /builds/stats
// ---------------------------------------------------------------------------

/// Totals, per-status counts, and upcoming count for the caller's builds.
pub async fn build_stats(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<BuildStats>>> {
    let repo = BuildRepo::new(&state.pool);
    let total = repo.count(&auth.user_id).await?;
    let by_status = repo.count_by_status(&auth.user_id).await?;
    let upcoming = repo
        .count_upcoming(&auth.user_id, DEFAULT_UPCOMING_DAYS)
        .await?;

    Ok(Json(DataResponse {
        data: BuildStats::new(total, by_status, upcoming),
    }))
}

// ---------------------------------------------------------------------------
// GET /builds/{id}
// ---------------------------------------------------------------------------

/// Fetch one build. Another user's build is reported as forbidden.
pub async fn get_build(
    auth: AuthUser,
    State(state): State<AppState>,
    id: Result<Path<RecordId>, PathRejection>,
) -> AppResult<Json<DataResponse<Build>>> {
    let Path(id) = id?;
    let build = BuildRepo::new(&state.pool)
        .find_by_id(id)
        .await?
        .ok_or_else(|| not_found(id))?;

    ensure_owner(ENTITY, id, &build.user_id, &auth.user_id, Access::Read)?;

    Ok(Json(DataResponse { data: build }))
}

// ---------------------------------------------------------------------------
// PUT /builds/{id}
// ---------------------------------------------------------------------------

/// Apply a partial update. Missing and foreign builds both yield 404.
pub async fn update_build(
    auth: AuthUser,
    State(state): State<AppState>,
    id: Result<Path<RecordId>, PathRejection>,
    payload: Result<Json<UpdateBuildRequest>, JsonRejection>,
) -> AppResult<Json<DataResponse<Build>>> {
    let Path(id) = id?;
    let Json(input) = payload?;
    let repo = BuildRepo::new(&state.pool);

    let existing = repo.find_by_id(id).await?.ok_or_else(|| not_found(id))?;
    ensure_owner(ENTITY, id, &existing.user_id, &auth.user_id, Access::Mutate)?;

    let merged = input.apply_to(existing, Utc::now())?;
    // The row can vanish between the read and the write.
    let updated = repo.update(&merged).await?.ok_or_else(|| not_found(id))?;

    tracing::info!(build_id = %id, user_id = %auth.user_id, "Build updated");

    Ok(Json(DataResponse { data: updated }))
}

// ---------------------------------------------------------------------------
// DELETE /builds/{id}
// ---------------------------------------------------------------------------

/// Delete a build. Missing and foreign builds both yield 404.
pub async fn delete_build(
    auth: AuthUser,
    State(state): State<AppState>,
    id: Result<Path<RecordId>, PathRejection>,
) -> AppResult<StatusCode> {
    let Path(id) = id?;
    let deleted = BuildRepo::new(&state.pool).delete(id, &auth.user_id).await?;
    if !deleted {
        return Err(not_found(id));
    }

    tracing::info!(build_id = %id, user_id = %auth.user_id, "Build deleted");

    Ok(StatusCode::NO_CONTENT)
}
