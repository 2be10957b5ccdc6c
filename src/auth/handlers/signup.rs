/**
 * Signup Handler
 *
 * Implements user registration for POST /api/auth/signup.
 *
 * # Registration Process
 *
 * 1. Validate username, email, and password
 * 2. Check that username and email are unused
 * 3. Hash the password with bcrypt
 * 4. Create the user and their profile row in one transaction
 * 5. Return a JWT token for immediate authentication
 */

use axum::{extract::State, response::Json};
use bcrypt::{hash, DEFAULT_COST};
use sqlx::PgPool;

use crate::auth::handlers::types::{AuthResponse, SignupRequest, UserResponse};
use crate::auth::sessions::create_token;
use crate::auth::users::{create_user, get_user_by_email, get_user_by_username};
use crate::error::ApiError;

/// Validate username format
///
/// Usernames must be 3-30 characters, start with a letter, and contain
/// only alphanumeric characters and underscores.
pub fn is_valid_username(username: &str) -> bool {
    if username.len() < 3 || username.len() > 30 {
        return false;
    }

    let mut chars = username.chars();

    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() => {}
        _ => return false,
    }

    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Sign up handler
///
/// # Errors
///
/// * `400` - invalid username, email, or password
/// * `409` - username or email already registered
/// * `503` - database not configured
pub async fn signup(
    State(pool): State<Option<PgPool>>,
    Json(request): Json<SignupRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    let pool = pool.ok_or(ApiError::DatabaseUnavailable)?;
    tracing::info!("Signup request for username: {}", request.username);

    if !is_valid_username(&request.username) {
        return Err(ApiError::validation(
            "نام کاربری باید ۳ تا ۳۰ کاراکتر باشد و فقط شامل حروف، اعداد و _ باشد",
        ));
    }

    // Basic email check
    if !request.email.contains('@') {
        return Err(ApiError::validation("ایمیل نامعتبر است"));
    }

    if request.password.len() < 8 {
        return Err(ApiError::validation("رمز عبور حداقل ۸ کاراکتر است"));
    }

    if get_user_by_username(&pool, &request.username).await?.is_some() {
        return Err(ApiError::conflict("این نام کاربری قبلا ثبت شده است"));
    }

    if get_user_by_email(&pool, &request.email).await?.is_some() {
        return Err(ApiError::conflict("این ایمیل قبلا ثبت شده است"));
    }

    let password_hash = hash(&request.password, DEFAULT_COST)
        .map_err(|e| ApiError::Internal(format!("password hashing failed: {e}")))?;

    let full_name = if request.full_name.trim().is_empty() {
        request.username.clone()
    } else {
        request.full_name.trim().to_string()
    };

    let user = create_user(
        &pool,
        request.username.clone(),
        request.email.clone(),
        password_hash,
        full_name,
    )
    .await
    .map_err(|e| ApiError::from_db(e, "این نام کاربری یا ایمیل قبلا ثبت شده است"))?;

    let token = create_token(user.id, user.username.clone())
        .map_err(|e| ApiError::Internal(format!("token creation failed: {e}")))?;

    tracing::info!("User created successfully: {}", user.username);

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

    #[test]
    fn test_valid_usernames() {
        assert!(is_valid_username("sara"));
        assert!(is_valid_username("a_b_c_123"));
        assert!(is_valid_username("Reza2024"));
    }

    #[test]
    fn test_invalid_usernames() {
        assert!(!is_valid_username("ab")); // too short
        assert!(!is_valid_username(&"a".repeat(31))); // too long
        assert!(!is_valid_username("1starts_with_digit"));
        assert!(!is_valid_username("_underscore_first"));
        assert!(!is_valid_username("has space"));
        assert!(!is_valid_username("emoji🙂"));
    }

    #[tokio::test]
    async fn test_signup_no_database() {
        let request = SignupRequest {
            username: "sara".to_string(),
            email: "sara@example.com".to_string(),
            password: "password123".to_string(),
            full_name: String::new(),
        };

        let result = signup(State(None), Json(request)).await;
        assert!(matches!(result.unwrap_err(), ApiError::DatabaseUnavailable));
    }
}
