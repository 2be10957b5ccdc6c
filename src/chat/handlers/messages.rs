/**
 * Unified Message Edit/Delete Handlers
 *
 * One pair of handlers serves all three message kinds; the kind is a
 * path segment (`channel`, `group`, `direct`). Both operations are
 * author-gated: the check runs against the stored author column, not
 * anything the client claims.
 */

use axum::{
    extract::{Path, State},
    response::Json,
};
use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::chat::db;
use crate::chat::scope::{authorize_author_action, validate_content, MessageKind};
use crate::error::ApiError;
use crate::middleware::auth::AuthUser;
use crate::realtime::broadcast::{broadcast_change, ChangeBroadcast, ChangeEvent, ChangeOp};

/// Request to edit a message
#[derive(Debug, Deserialize)]
pub struct EditMessageRequest {
    pub content: String,
}

fn parse_kind(kind: &str) -> Result<MessageKind, ApiError> {
    MessageKind::from_str(kind).ok_or_else(|| ApiError::validation("نوع پیام نامعتبر است"))
}

/// Edit a message (PATCH /api/messages/{kind}/{id})
///
/// Overwrites the content and sets `is_edited`; no edit history is
/// kept.
pub async fn edit_message(
    State(pool): State<Option<PgPool>>,
    State(broadcast): State<ChangeBroadcast>,
    AuthUser(user): AuthUser,
    Path((kind, message_id)): Path<(String, Uuid)>,
    Json(request): Json<EditMessageRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let pool = pool.ok_or(ApiError::DatabaseUnavailable)?;
    let kind = parse_kind(&kind)?;

    let content = validate_content(&request.content)?;

    let meta = db::get_message_meta(&pool, kind, message_id)
        .await?
        .ok_or_else(|| ApiError::not_found("پیام یافت نشد"))?;
    authorize_author_action(meta.author_id, user.user_id)?;

    db::edit_message(&pool, kind, message_id, &content).await?;

    broadcast_change(
        &broadcast,
        ChangeEvent::new(kind.table(), meta.scope_id, ChangeOp::Update),
    );

    Ok(Json(serde_json::json!({ "edited": true })))
}

/// Delete a message (DELETE /api/messages/{kind}/{id})
pub async fn delete_message(
    State(pool): State<Option<PgPool>>,
    State(broadcast): State<ChangeBroadcast>,
    AuthUser(user): AuthUser,
    Path((kind, message_id)): Path<(String, Uuid)>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let pool = pool.ok_or(ApiError::DatabaseUnavailable)?;
    let kind = parse_kind(&kind)?;

    let meta = db::get_message_meta(&pool, kind, message_id)
        .await?
        .ok_or_else(|| ApiError::not_found("پیام یافت نشد"))?;
    authorize_author_action(meta.author_id, user.user_id)?;

    db::delete_message(&pool, kind, message_id).await?;

    broadcast_change(
        &broadcast,
        ChangeEvent::new(kind.table(), meta.scope_id, ChangeOp::Delete),
    );

    Ok(Json(serde_json::json!({ "deleted": true })))
}
