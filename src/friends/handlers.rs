/**
 * Friends Handlers
 *
 * Send a request, respond to one, list pending requests, list friends.
 * Responding is receiver-only and single-shot: once a request leaves
 * `pending` it cannot be responded to again.
 */

use axum::{
    extract::{Path, State},
    response::Json,
};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::auth::users::get_user_by_id;
use crate::error::ApiError;
use crate::friends::db;
use crate::middleware::auth::AuthUser;
use crate::realtime::broadcast::{broadcast_change, ChangeBroadcast, ChangeEvent, ChangeOp};

/// Request to send a friend request
#[derive(Debug, Deserialize)]
pub struct SendFriendRequest {
    pub receiver_id: Uuid,
}

/// Request to respond to a friend request
#[derive(Debug, Deserialize)]
pub struct RespondFriendRequest {
    pub accept: bool,
}

/// Response carrying the new request id
#[derive(Debug, Serialize)]
pub struct SendFriendResponse {
    pub id: Uuid,
}

/// Send a friend request (POST /api/friends/requests)
pub async fn send_request(
    State(pool): State<Option<PgPool>>,
    State(broadcast): State<ChangeBroadcast>,
    AuthUser(user): AuthUser,
    Json(request): Json<SendFriendRequest>,
) -> Result<Json<SendFriendResponse>, ApiError> {
    let pool = pool.ok_or(ApiError::DatabaseUnavailable)?;

    if request.receiver_id == user.user_id {
        return Err(ApiError::validation(
            "ارسال درخواست دوستی به خودتان ممکن نیست",
        ));
    }

    get_user_by_id(&pool, request.receiver_id)
        .await?
        .ok_or_else(|| ApiError::not_found("کاربر یافت نشد"))?;

    if db::are_friends(&pool, user.user_id, request.receiver_id).await? {
        return Err(ApiError::conflict("شما قبلا با این کاربر دوست هستید"));
    }

    // The partial unique index catches a duplicate pending request,
    // including the concurrent case the pre-check above cannot see
    let id = db::insert_request(&pool, user.user_id, request.receiver_id)
        .await
        .map_err(|e| ApiError::from_db(e, "درخواست دوستی قبلا ارسال شده است"))?;

    broadcast_change(
        &broadcast,
        ChangeEvent::new("friend_requests", request.receiver_id, ChangeOp::Insert),
    );

    Ok(Json(SendFriendResponse { id }))
}

/// List incoming pending requests (GET /api/friends/requests)
pub async fn list_requests(
    State(pool): State<Option<PgPool>>,
    AuthUser(user): AuthUser,
) -> Result<Json<Vec<db::FriendRequest>>, ApiError> {
    let pool = pool.ok_or(ApiError::DatabaseUnavailable)?;
    Ok(Json(db::list_pending_requests(&pool, user.user_id).await?))
}

/// Respond to a friend request (POST /api/friends/requests/{id}/respond)
///
/// Only the receiver may respond, and only while the request is
/// pending.
pub async fn respond_to_request(
    State(pool): State<Option<PgPool>>,
    State(broadcast): State<ChangeBroadcast>,
    AuthUser(user): AuthUser,
    Path(request_id): Path<Uuid>,
    Json(request): Json<RespondFriendRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let pool = pool.ok_or(ApiError::DatabaseUnavailable)?;

    let row = db::get_request(&pool, request_id)
        .await?
        .ok_or_else(|| ApiError::not_found("درخواست دوستی یافت نشد"))?;

    if row.receiver_id != user.user_id {
        return Err(ApiError::forbidden(
            "فقط گیرنده می‌تواند به درخواست پاسخ دهد",
        ));
    }
    if row.status != "pending" {
        return Err(ApiError::conflict("به این درخواست قبلا پاسخ داده شده است"));
    }

    if request.accept {
        db::accept_request(&pool, row.id, row.sender_id, row.receiver_id).await?;
    } else {
        db::reject_request(&pool, row.id).await?;
    }

    broadcast_change(
        &broadcast,
        ChangeEvent::new("friend_requests", row.sender_id, ChangeOp::Update),
    );

    Ok(Json(serde_json::json!({ "accepted": request.accept })))
}

/// List friends (GET /api/friends)
pub async fn list_friends(
    State(pool): State<Option<PgPool>>,
    AuthUser(user): AuthUser,
) -> Result<Json<Vec<db::Friend>>, ApiError> {
    let pool = pool.ok_or(ApiError::DatabaseUnavailable)?;
    Ok(Json(db::list_friends(&pool, user.user_id).await?))
}
