/**
 * Channel Handlers
 *
 * Channels are broadcast-only: any user can create one (becoming its
 * immutable owner) and any user can join, but only the owner may post.
 * Authorization runs against loaded scope facts before any row is
 * written.
 */

use axum::{
    extract::{Path, State},
    response::Json,
};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::chat::db;
use crate::chat::handlers::{validate_description, validate_name};
use crate::chat::scope::{authorize_post, authorize_read, validate_content};
use crate::error::ApiError;
use crate::middleware::auth::AuthUser;
use crate::realtime::broadcast::{broadcast_change, ChangeBroadcast, ChangeEvent, ChangeOp};

/// Request to create a channel
#[derive(Debug, Deserialize)]
pub struct CreateChannelRequest {
    pub name: String,
    #[serde(default)]
    pub description: String,
}

/// Request to post a message
#[derive(Debug, Deserialize)]
pub struct PostMessageRequest {
    pub content: String,
}

/// Response carrying the new message id
#[derive(Debug, Serialize)]
pub struct PostMessageResponse {
    pub id: Uuid,
}

/// Create a channel (POST /api/channels)
///
/// The caller becomes the owner and is auto-joined.
pub async fn create_channel(
    State(pool): State<Option<PgPool>>,
    AuthUser(user): AuthUser,
    Json(request): Json<CreateChannelRequest>,
) -> Result<Json<db::Channel>, ApiError> {
    let pool = pool.ok_or(ApiError::DatabaseUnavailable)?;

    let name = validate_name(&request.name)?;
    let description = validate_description(&request.description)?;

    let channel = db::create_channel(&pool, user.user_id, &name, &description).await?;
    tracing::info!("Channel {} created by {}", channel.id, user.username);

    Ok(Json(channel))
}

/// List channels (GET /api/channels)
pub async fn list_channels(
    State(pool): State<Option<PgPool>>,
    AuthUser(_user): AuthUser,
) -> Result<Json<Vec<db::Channel>>, ApiError> {
    let pool = pool.ok_or(ApiError::DatabaseUnavailable)?;
    Ok(Json(db::list_channels(&pool).await?))
}

/// Join a channel (POST /api/channels/{id}/join)
pub async fn join_channel(
    State(pool): State<Option<PgPool>>,
    AuthUser(user): AuthUser,
    Path(channel_id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let pool = pool.ok_or(ApiError::DatabaseUnavailable)?;

    db::channel_facts(&pool, channel_id, user.user_id)
        .await?
        .ok_or_else(|| ApiError::not_found("کانال یافت نشد"))?;

    db::join_channel(&pool, channel_id, user.user_id).await?;

    Ok(Json(serde_json::json!({ "joined": true })))
}

/// List channel messages (GET /api/channels/{id}/messages)
///
/// Requires membership (or ownership) of the channel.
pub async fn list_messages(
    State(pool): State<Option<PgPool>>,
    AuthUser(user): AuthUser,
    Path(channel_id): Path<Uuid>,
) -> Result<Json<Vec<db::ChatMessage>>, ApiError> {
    let pool = pool.ok_or(ApiError::DatabaseUnavailable)?;

    let facts = db::channel_facts(&pool, channel_id, user.user_id)
        .await?
        .ok_or_else(|| ApiError::not_found("کانال یافت نشد"))?;
    authorize_read(&facts, user.user_id)?;

    Ok(Json(db::list_channel_messages(&pool, channel_id).await?))
}

/// Post a channel message (POST /api/channels/{id}/messages)
///
/// Only the channel owner may post.
pub async fn post_message(
    State(pool): State<Option<PgPool>>,
    State(broadcast): State<ChangeBroadcast>,
    AuthUser(user): AuthUser,
    Path(channel_id): Path<Uuid>,
    Json(request): Json<PostMessageRequest>,
) -> Result<Json<PostMessageResponse>, ApiError> {
    let pool = pool.ok_or(ApiError::DatabaseUnavailable)?;

    let content = validate_content(&request.content)?;

    let facts = db::channel_facts(&pool, channel_id, user.user_id)
        .await?
        .ok_or_else(|| ApiError::not_found("کانال یافت نشد"))?;
    authorize_post(&facts, user.user_id)?;

    let id = db::insert_channel_message(&pool, channel_id, user.user_id, &content).await?;

    broadcast_change(
        &broadcast,
        ChangeEvent::new("channel_messages", channel_id, ChangeOp::Insert),
    );

    Ok(Json(PostMessageResponse { id }))
}
