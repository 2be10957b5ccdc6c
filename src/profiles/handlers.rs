/**
 * Profile Handlers
 *
 * Get/edit the caller's profile, record page views, and serve the
 * admin stats dashboard. Profile edits accept only the descriptive
 * fields; a request body cannot move points or the exam counter no
 * matter what it contains, because those fields are never read from
 * it.
 */

use axum::{extract::State, response::Json};
use serde::Deserialize;
use sqlx::PgPool;

use crate::error::ApiError;
use crate::middleware::auth::AuthUser;
use crate::profiles::db;

const MAX_FULL_NAME_LEN: usize = 100;
const MAX_PAGE_LEN: usize = 255;

/// Request to edit the caller's profile
#[derive(Debug, Deserialize)]
pub struct UpdateProfileRequest {
    pub full_name: String,
    #[serde(default)]
    pub grade: Option<String>,
    #[serde(default)]
    pub field_of_study: Option<String>,
}

/// Request to record a page view
#[derive(Debug, Deserialize)]
pub struct PageViewRequest {
    pub page: String,
}

/// Get the caller's profile (GET /api/profile)
pub async fn get_profile(
    State(pool): State<Option<PgPool>>,
    AuthUser(user): AuthUser,
) -> Result<Json<db::Profile>, ApiError> {
    let pool = pool.ok_or(ApiError::DatabaseUnavailable)?;

    let profile = db::get_profile(&pool, user.user_id)
        .await?
        .ok_or_else(|| ApiError::not_found("پروفایل یافت نشد"))?;

    Ok(Json(profile))
}

/// Edit the caller's profile (PATCH /api/profile)
pub async fn update_profile(
    State(pool): State<Option<PgPool>>,
    AuthUser(user): AuthUser,
    Json(request): Json<UpdateProfileRequest>,
) -> Result<Json<db::Profile>, ApiError> {
    let pool = pool.ok_or(ApiError::DatabaseUnavailable)?;

    let full_name = request.full_name.trim();
    if full_name.is_empty() {
        return Err(ApiError::validation("نام نمی‌تواند خالی باشد"));
    }
    if full_name.chars().count() > MAX_FULL_NAME_LEN {
        return Err(ApiError::validation("نام بیش از حد طولانی است"));
    }

    db::update_profile(
        &pool,
        user.user_id,
        full_name,
        request.grade.as_deref().map(str::trim),
        request.field_of_study.as_deref().map(str::trim),
    )
    .await?;

    let profile = db::get_profile(&pool, user.user_id)
        .await?
        .ok_or_else(|| ApiError::not_found("پروفایل یافت نشد"))?;

    Ok(Json(profile))
}

/// Record a page view (POST /api/page-views)
///
/// Authenticated; the row keeps the viewer for the admin dashboard.
pub async fn record_page_view(
    State(pool): State<Option<PgPool>>,
    AuthUser(user): AuthUser,
    Json(request): Json<PageViewRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let pool = pool.ok_or(ApiError::DatabaseUnavailable)?;

    let page = request.page.trim();
    if page.is_empty() || page.chars().count() > MAX_PAGE_LEN {
        return Err(ApiError::validation("نام صفحه نامعتبر است"));
    }

    db::insert_page_view(&pool, Some(user.user_id), page).await?;

    Ok(Json(serde_json::json!({ "recorded": true })))
}

/// Site-wide counters (GET /api/admin/stats)
///
/// Requires the admin role.
pub async fn admin_stats(
    State(pool): State<Option<PgPool>>,
    AuthUser(user): AuthUser,
) -> Result<Json<db::SiteStats>, ApiError> {
    let pool = pool.ok_or(ApiError::DatabaseUnavailable)?;

    if !db::is_admin(&pool, user.user_id).await? {
        return Err(ApiError::forbidden("دسترسی فقط برای مدیران مجاز است"));
    }

    Ok(Json(db::site_stats(&pool).await?))
}
