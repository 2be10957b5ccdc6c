/**
 * Direct-Message Handlers
 *
 * Two-party threads identified by the (sender, receiver) pair. There is
 * no membership table: the message rows themselves are the
 * relationship. A user can only send as themselves; reading requires
 * being one side of the pair, which holds by construction since the
 * thread is addressed by the caller's id plus the peer's.
 */

use axum::{
    extract::{Path, State},
    response::Json,
};
use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::auth::users::get_user_by_id;
use crate::chat::db;
use crate::chat::handlers::channels::PostMessageResponse;
use crate::chat::scope::{authorize_post, validate_content, ScopeFacts};
use crate::error::ApiError;
use crate::middleware::auth::AuthUser;
use crate::realtime::broadcast::{broadcast_change, ChangeBroadcast, ChangeEvent, ChangeOp};

/// Request to send a direct message
#[derive(Debug, Deserialize)]
pub struct SendDirectMessageRequest {
    pub content: String,
}

/// List the thread with one peer (GET /api/dm/{peer_id}/messages)
pub async fn list_messages(
    State(pool): State<Option<PgPool>>,
    AuthUser(user): AuthUser,
    Path(peer_id): Path<Uuid>,
) -> Result<Json<Vec<db::ChatMessage>>, ApiError> {
    let pool = pool.ok_or(ApiError::DatabaseUnavailable)?;

    Ok(Json(
        db::list_direct_messages(&pool, user.user_id, peer_id).await?,
    ))
}

/// Send a direct message (POST /api/dm/{peer_id}/messages)
pub async fn send_message(
    State(pool): State<Option<PgPool>>,
    State(broadcast): State<ChangeBroadcast>,
    AuthUser(user): AuthUser,
    Path(peer_id): Path<Uuid>,
    Json(request): Json<SendDirectMessageRequest>,
) -> Result<Json<PostMessageResponse>, ApiError> {
    let pool = pool.ok_or(ApiError::DatabaseUnavailable)?;

    let content = validate_content(&request.content)?;

    if peer_id == user.user_id {
        return Err(ApiError::validation("ارسال پیام به خودتان ممکن نیست"));
    }

    get_user_by_id(&pool, peer_id)
        .await?
        .ok_or_else(|| ApiError::not_found("کاربر یافت نشد"))?;

    // The actor is always the sender side of the pair being written
    let facts = ScopeFacts::Direct {
        sender_id: user.user_id,
        receiver_id: peer_id,
    };
    authorize_post(&facts, user.user_id)?;

    let id = db::insert_direct_message(&pool, user.user_id, peer_id, &content).await?;

    // Scoped to the receiver so their open thread view re-fetches
    broadcast_change(
        &broadcast,
        ChangeEvent::new("direct_messages", peer_id, ChangeOp::Insert),
    );

    Ok(Json(PostMessageResponse { id }))
}
