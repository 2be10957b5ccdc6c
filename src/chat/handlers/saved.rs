/**
 * Saved-Message Handlers
 *
 * Bookmark toggle and listing. The toggle is idempotent from the
 * caller's perspective: saving twice leaves one row, unsaving an
 * already-unsaved message is a no-op rather than an error. Only
 * messages the caller can read may be bookmarked.
 */

use axum::{extract::State, response::Json};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::chat::db;
use crate::chat::scope::{authorize_read, MessageKind};
use crate::error::ApiError;
use crate::middleware::auth::AuthUser;

/// Request to toggle a bookmark
#[derive(Debug, Deserialize)]
pub struct ToggleSaveRequest {
    pub message_type: String,
    pub message_id: Uuid,
}

/// Result of a toggle
#[derive(Debug, Serialize)]
pub struct ToggleSaveResponse {
    /// Whether the message is saved after the toggle
    pub saved: bool,
}

/// Toggle a bookmark (POST /api/saved/toggle)
pub async fn toggle_save(
    State(pool): State<Option<PgPool>>,
    AuthUser(user): AuthUser,
    Json(request): Json<ToggleSaveRequest>,
) -> Result<Json<ToggleSaveResponse>, ApiError> {
    let pool = pool.ok_or(ApiError::DatabaseUnavailable)?;

    let kind = MessageKind::from_str(&request.message_type)
        .ok_or_else(|| ApiError::validation("نوع پیام نامعتبر است"))?;

    let meta = db::get_message_meta(&pool, kind, request.message_id)
        .await?
        .ok_or_else(|| ApiError::not_found("پیام یافت نشد"))?;

    // Only messages the caller can read may be bookmarked
    let facts = db::message_scope_facts(&pool, kind, &meta, user.user_id)
        .await?
        .ok_or_else(|| ApiError::not_found("پیام یافت نشد"))?;
    authorize_read(&facts, user.user_id)?;

    let saved = db::toggle_saved(&pool, user.user_id, kind, request.message_id).await?;

    Ok(Json(ToggleSaveResponse { saved }))
}

/// List bookmarks (GET /api/saved)
pub async fn list_saved(
    State(pool): State<Option<PgPool>>,
    AuthUser(user): AuthUser,
) -> Result<Json<Vec<db::SavedMessage>>, ApiError> {
    let pool = pool.ok_or(ApiError::DatabaseUnavailable)?;
    Ok(Json(db::list_saved(&pool, user.user_id).await?))
}
