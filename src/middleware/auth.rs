/**
 * Authentication Middleware
 *
 * Middleware for protecting routes that require authentication. It
 * extracts and verifies JWT tokens from the Authorization header and
 * attaches the caller's identity to the request so handlers receive an
 * explicit session value instead of reading global state.
 */

use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, StatusCode},
    middleware::Next,
    response::Response,
};
use sqlx::PgPool;
use uuid::Uuid;

use crate::auth::sessions::verify_token;
use crate::auth::users::get_user_by_id;
use crate::server::state::AppState;

/// Authenticated user data extracted from a JWT token
#[derive(Clone, Debug)]
pub struct AuthenticatedUser {
    pub user_id: Uuid,
    pub username: String,
}

/// Authentication middleware
///
/// 1. Extracts the JWT token from the Authorization header
/// 2. Verifies the token
/// 3. Confirms the account still exists
/// 4. Attaches `AuthenticatedUser` to request extensions
///
/// Returns 401 Unauthorized if the token is missing or invalid.
pub async fn auth_middleware(
    State(app_state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    let auth_header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| {
            tracing::warn!("Missing Authorization header");
            StatusCode::UNAUTHORIZED
        })?;

    let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
        tracing::warn!("Invalid Authorization header format");
        StatusCode::UNAUTHORIZED
    })?;

    let claims = verify_token(token).map_err(|e| {
        tracing::warn!("Invalid token: {:?}", e);
        StatusCode::UNAUTHORIZED
    })?;

    let user_id = Uuid::parse_str(&claims.sub).map_err(|e| {
        tracing::error!("Invalid user ID in token: {:?}", e);
        StatusCode::UNAUTHORIZED
    })?;

    // Tokens outlive accounts; reject tokens for deleted users
    if let Some(pool) = &app_state.db_pool {
        if !user_exists(pool, user_id).await {
            tracing::warn!("Token for unknown user {}", user_id);
            return Err(StatusCode::UNAUTHORIZED);
        }
    }

    request.extensions_mut().insert(AuthenticatedUser {
        user_id,
        username: claims.username,
    });

    Ok(next.run(request).await)
}

async fn user_exists(pool: &PgPool, user_id: Uuid) -> bool {
    matches!(get_user_by_id(pool, user_id).await, Ok(Some(_)))
}

/// Axum extractor for the authenticated user
///
/// Use as a handler parameter to receive the identity attached by
/// `auth_middleware`.
#[derive(Clone, Debug)]
pub struct AuthUser(pub AuthenticatedUser);

impl axum::extract::FromRequestParts<AppState> for AuthUser {
    type Rejection = StatusCode;

    async fn from_request_parts(
        parts: &mut axum::http::request::Parts,
        _state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = parts
            .extensions
            .get::<AuthenticatedUser>()
            .cloned()
            .ok_or_else(|| {
                tracing::warn!("AuthenticatedUser not found in request extensions");
                StatusCode::UNAUTHORIZED
            })?;

        Ok(AuthUser(user))
    }
}
