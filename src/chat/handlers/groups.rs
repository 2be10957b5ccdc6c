/**
 * Group Handlers
 *
 * Groups are symmetric: any member may post and read. The creator
 * becomes the owner and an admin member; later joiners are regular
 * members.
 */

use axum::{
    extract::{Path, State},
    response::Json,
};
use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::chat::db;
use crate::chat::handlers::channels::PostMessageResponse;
use crate::chat::handlers::{validate_description, validate_name};
use crate::chat::scope::{authorize_post, authorize_read, validate_content};
use crate::error::ApiError;
use crate::middleware::auth::AuthUser;
use crate::realtime::broadcast::{broadcast_change, ChangeBroadcast, ChangeEvent, ChangeOp};

/// Request to create a group
#[derive(Debug, Deserialize)]
pub struct CreateGroupRequest {
    pub name: String,
    #[serde(default)]
    pub description: String,
}

/// Request to post a message
#[derive(Debug, Deserialize)]
pub struct PostGroupMessageRequest {
    pub content: String,
}

/// Create a group (POST /api/groups)
pub async fn create_group(
    State(pool): State<Option<PgPool>>,
    AuthUser(user): AuthUser,
    Json(request): Json<CreateGroupRequest>,
) -> Result<Json<db::Group>, ApiError> {
    let pool = pool.ok_or(ApiError::DatabaseUnavailable)?;

    let name = validate_name(&request.name)?;
    let description = validate_description(&request.description)?;

    let group = db::create_group(&pool, user.user_id, &name, &description).await?;
    tracing::info!("Group {} created by {}", group.id, user.username);

    Ok(Json(group))
}

/// List groups (GET /api/groups)
pub async fn list_groups(
    State(pool): State<Option<PgPool>>,
    AuthUser(_user): AuthUser,
) -> Result<Json<Vec<db::Group>>, ApiError> {
    let pool = pool.ok_or(ApiError::DatabaseUnavailable)?;
    Ok(Json(db::list_groups(&pool).await?))
}

/// Join a group (POST /api/groups/{id}/join)
pub async fn join_group(
    State(pool): State<Option<PgPool>>,
    AuthUser(user): AuthUser,
    Path(group_id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let pool = pool.ok_or(ApiError::DatabaseUnavailable)?;

    db::group_facts(&pool, group_id, user.user_id)
        .await?
        .ok_or_else(|| ApiError::not_found("گروه یافت نشد"))?;

    db::join_group(&pool, group_id, user.user_id).await?;

    Ok(Json(serde_json::json!({ "joined": true })))
}

/// List group messages (GET /api/groups/{id}/messages)
pub async fn list_messages(
    State(pool): State<Option<PgPool>>,
    AuthUser(user): AuthUser,
    Path(group_id): Path<Uuid>,
) -> Result<Json<Vec<db::ChatMessage>>, ApiError> {
    let pool = pool.ok_or(ApiError::DatabaseUnavailable)?;

    let facts = db::group_facts(&pool, group_id, user.user_id)
        .await?
        .ok_or_else(|| ApiError::not_found("گروه یافت نشد"))?;
    authorize_read(&facts, user.user_id)?;

    Ok(Json(db::list_group_messages(&pool, group_id).await?))
}

/// Post a group message (POST /api/groups/{id}/messages)
///
/// Any current member may post.
pub async fn post_message(
    State(pool): State<Option<PgPool>>,
    State(broadcast): State<ChangeBroadcast>,
    AuthUser(user): AuthUser,
    Path(group_id): Path<Uuid>,
    Json(request): Json<PostGroupMessageRequest>,
) -> Result<Json<PostMessageResponse>, ApiError> {
    let pool = pool.ok_or(ApiError::DatabaseUnavailable)?;

    let content = validate_content(&request.content)?;

    let facts = db::group_facts(&pool, group_id, user.user_id)
        .await?
        .ok_or_else(|| ApiError::not_found("گروه یافت نشد"))?;
    authorize_post(&facts, user.user_id)?;

    let id = db::insert_group_message(&pool, group_id, user.user_id, &content).await?;

    broadcast_change(
        &broadcast,
        ChangeEvent::new("group_messages", group_id, ChangeOp::Insert),
    );

    Ok(Json(PostMessageResponse { id }))
}
