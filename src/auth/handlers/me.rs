/**
 * Current User Handler
 *
 * Implements GET /api/auth/me, returning the authenticated caller's
 * account information. Requires a valid bearer token.
 */

use axum::{extract::State, response::Json};
use sqlx::PgPool;

use crate::auth::handlers::types::UserResponse;
use crate::auth::users::get_user_by_id;
use crate::error::ApiError;
use crate::middleware::auth::AuthUser;

/// Get current user handler
///
/// # Errors
///
/// * `401` - missing or invalid token
/// * `404` - token valid but account no longer exists
/// * `503` - database not configured
pub async fn get_me(
    State(pool): State<Option<PgPool>>,
    AuthUser(user): AuthUser,
) -> Result<Json<UserResponse>, ApiError> {
    let pool = pool.ok_or(ApiError::DatabaseUnavailable)?;

    let record = get_user_by_id(&pool, user.user_id)
        .await?
        .ok_or_else(|| ApiError::not_found("کاربر یافت نشد"))?;

    Ok(Json(UserResponse {
        id: record.id.to_string(),
        username: record.username,
        email: record.email,
    }))
}
