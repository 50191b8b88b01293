//! JWT-based authentication extractor for Axum handlers.

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use kyarafit_core::error::CoreError;
use kyarafit_core::types::UserId;

use crate::auth::jwt::validate_token;
use crate::error::AppError;
use crate::state::AppState;

/// Message returned for every authentication failure. The concrete reason
/// is only logged.
pub const UNAUTHENTICATED_MESSAGE: &str = "Authentication required";

/// Authenticated caller extracted from the `Authorization: Bearer` header.
///
/// ```ignore
/// async fn my_handler(auth: AuthUser) -> AppResult<Json<()>> {
///     tracing::info!(user_id = %auth.user_id, "handling request");
///     Ok(Json(()))
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AuthUser {
    /// The caller's opaque identifier (from `claims.sub`).
    pub user_id: UserId,
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| unauthenticated("missing Authorization header"))?;

        let token = header
            .strip_prefix("Bearer ")
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| unauthenticated("Authorization header is not a Bearer token"))?;

        let claims = validate_token(token, &state.config.jwt).map_err(|e| {
            tracing::debug!(error = %e, "Rejected access token");
            unauthenticated_error()
        })?;

        if claims.sub.trim().is_empty() {
            return Err(unauthenticated("token has an empty subject"));
        }

        Ok(AuthUser {
            user_id: claims.sub,
        })
    }
}

fn unauthenticated(reason: &str) -> AppError {
    tracing::debug!(reason, "Rejected unauthenticated request");
    unauthenticated_error()
}

fn unauthenticated_error() -> AppError {
    AppError::Core(CoreError::Unauthorized(UNAUTHENTICATED_MESSAGE.into()))
}
