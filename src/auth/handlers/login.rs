/**
 * Login Handler
 *
 * Implements user authentication for POST /api/auth/login.
 *
 * # Security
 *
 * - Passwords are verified with bcrypt (constant-time comparison)
 * - Unknown user and wrong password return the same 401, so login
 *   cannot be used to enumerate accounts
 */

use axum::{extract::State, response::Json};
use bcrypt::verify;
use sqlx::PgPool;

use crate::auth::handlers::types::{AuthResponse, LoginRequest, UserResponse};
use crate::auth::sessions::create_token;
use crate::auth::users::{get_user_by_email, get_user_by_username};
use crate::error::ApiError;

/// Login handler
///
/// Accepts a username or an email in the `username` field.
///
/// # Errors
///
/// * `401` - unknown user or wrong password
/// * `503` - database not configured
pub async fn login(
    State(pool): State<Option<PgPool>>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    let pool = pool.ok_or(ApiError::DatabaseUnavailable)?;
    tracing::info!("Login request for: {}", request.username);

    let user = if request.username.contains('@') {
        get_user_by_email(&pool, &request.username).await?
    } else {
        get_user_by_username(&pool, &request.username).await?
    };

    let user = user.ok_or_else(|| {
        tracing::warn!("User not found: {}", request.username);
        ApiError::Unauthorized
    })?;

    let valid = verify(&request.password, &user.password_hash).unwrap_or(false);
    if !valid {
        tracing::warn!("Invalid password for user: {}", request.username);
        return Err(ApiError::Unauthorized);
    }

    let token = create_token(user.id, user.username.clone())
        .map_err(|e| ApiError::Internal(format!("token creation failed: {e}")))?;

    tracing::info!("User logged in successfully: {}", user.username);

    Ok(Json(AuthResponse {
        token,
        user: UserResponse {
            id: user.id.to_string(),
            username: user.username,
            email: user.email,
        },
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_login_no_database() {
        let request = LoginRequest {
            username: "sara".to_string(),
            password: "password123".to_string(),
        };

        let result = login(State(None), Json(request)).await;
        assert!(matches!(result.unwrap_err(), ApiError::DatabaseUnavailable));
    }
}
