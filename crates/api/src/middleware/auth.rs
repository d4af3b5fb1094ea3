//! Bearer-token principal for the admin surface.

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use quill_core::error::CoreError;
use quill_core::types::DbId;

use crate::auth::jwt::validate_token;
use crate::error::AppError;
use crate::state::AppState;

/// Caller identity decoded from `Authorization: Bearer <access token>`.
///
/// Handlers take it (or [`RequireAdmin`](super::rbac::RequireAdmin)) as an
/// argument; ownership checks compare `user_id` with an article's
/// `created_by`.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: DbId,
    /// Role names as issued at login; not re-read from the database.
    pub roles: Vec<String>,
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let unauthorized = |msg: &str| AppError::Core(CoreError::Unauthorized(msg.into()));

        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| unauthorized("Missing Authorization header"))?;

        let token = header
            .strip_prefix("Bearer ")
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| unauthorized("Expected 'Bearer <token>'"))?;

        match validate_token(token, &state.config.jwt) {
            Ok(claims) => Ok(AuthUser {
                user_id: claims.sub,
                roles: claims.roles,
            }),
            Err(e) => {
                tracing::debug!(error = %e, "Rejected bearer token");
                Err(unauthorized("Invalid or expired token"))
            }
        }
    }
}
