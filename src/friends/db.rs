/**
 * Friends Database Operations
 *
 * Friend requests carry a status column (`pending`, `accepted`,
 * `rejected`). A partial unique index on (sender, receiver) where
 * status = 'pending' stops duplicate outstanding requests at the
 * database, so concurrent sends surface as a unique violation rather
 * than a second row.
 */

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::PgPool;
use uuid::Uuid;

/// A friend request row, joined with the sender's profile name
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct FriendRequest {
    pub id: Uuid,
    pub sender_id: Uuid,
    pub sender_name: String,
    pub receiver_id: Uuid,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

/// A friend, as seen from one side of the symmetric relation
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Friend {
    pub user_id: Uuid,
    pub username: String,
    pub full_name: String,
    pub since: DateTime<Utc>,
}

/// Bare request row used when responding
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct FriendRequestRow {
    pub id: Uuid,
    pub sender_id: Uuid,
    pub receiver_id: Uuid,
    pub status: String,
}

/// Insert a pending request.
///
/// Fails with a unique violation if a pending request between the pair
/// already exists.
pub async fn insert_request(
    pool: &PgPool,
    sender_id: Uuid,
    receiver_id: Uuid,
) -> Result<Uuid, sqlx::Error> {
    let row: (Uuid,) = sqlx::query_as(
        "INSERT INTO friend_requests (id, sender_id, receiver_id, status)
         VALUES ($1, $2, $3, 'pending')
         RETURNING id",
    )
    .bind(Uuid::new_v4())
    .bind(sender_id)
    .bind(receiver_id)
    .fetch_one(pool)
    .await?;

    Ok(row.0)
}

pub async fn get_request(pool: &PgPool, id: Uuid) -> Result<Option<FriendRequestRow>, sqlx::Error> {
    sqlx::query_as::<_, FriendRequestRow>(
        "SELECT id, sender_id, receiver_id, status FROM friend_requests WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(pool)
    .await
}

/// Incoming pending requests for a user
pub async fn list_pending_requests(
    pool: &PgPool,
    receiver_id: Uuid,
) -> Result<Vec<FriendRequest>, sqlx::Error> {
    sqlx::query_as::<_, FriendRequest>(
        "SELECT fr.id, fr.sender_id, p.full_name AS sender_name,
                fr.receiver_id, fr.status, fr.created_at
         FROM friend_requests fr
         JOIN profiles p ON p.user_id = fr.sender_id
         WHERE fr.receiver_id = $1 AND fr.status = 'pending'
         ORDER BY fr.created_at DESC",
    )
    .bind(receiver_id)
    .fetch_all(pool)
    .await
}

/// Whether a friendship row exists in either direction
pub async fn are_friends(
    pool: &PgPool,
    user_id: Uuid,
    other_id: Uuid,
) -> Result<bool, sqlx::Error> {
    let row: (bool,) = sqlx::query_as(
        "SELECT EXISTS (
             SELECT 1 FROM friendships WHERE user_id = $1 AND friend_id = $2
         )",
    )
    .bind(user_id)
    .bind(other_id)
    .fetch_one(pool)
    .await?;

    Ok(row.0)
}

/// Accept a pending request.
///
/// The status flip and both friendship rows commit in one transaction;
/// a crash mid-way leaves no half-accepted state.
pub async fn accept_request(
    pool: &PgPool,
    request_id: Uuid,
    sender_id: Uuid,
    receiver_id: Uuid,
) -> Result<(), sqlx::Error> {
    let mut tx = pool.begin().await?;

    sqlx::query(
        "UPDATE friend_requests
         SET status = 'accepted', responded_at = NOW()
         WHERE id = $1 AND status = 'pending'",
    )
    .bind(request_id)
    .execute(&mut *tx)
    .await?;

    sqlx::query(
        "INSERT INTO friendships (id, user_id, friend_id) VALUES ($1, $3, $4), ($2, $4, $3)
         ON CONFLICT (user_id, friend_id) DO NOTHING",
    )
    .bind(Uuid::new_v4())
    .bind(Uuid::new_v4())
    .bind(receiver_id)
    .bind(sender_id)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;
    Ok(())
}

/// Reject a pending request. No friendship rows are written.
pub async fn reject_request(pool: &PgPool, request_id: Uuid) -> Result<(), sqlx::Error> {
    sqlx::query(
        "UPDATE friend_requests
         SET status = 'rejected', responded_at = NOW()
         WHERE id = $1 AND status = 'pending'",
    )
    .bind(request_id)
    .execute(pool)
    .await?;

    Ok(())
}

/// List a user's friends with profile names
pub async fn list_friends(pool: &PgPool, user_id: Uuid) -> Result<Vec<Friend>, sqlx::Error> {
    sqlx::query_as::<_, Friend>(
        "SELECT f.friend_id AS user_id, u.username, p.full_name, f.created_at AS since
         FROM friendships f
         JOIN users u ON u.id = f.friend_id
         JOIN profiles p ON p.user_id = f.friend_id
         WHERE f.user_id = $1
         ORDER BY f.created_at DESC",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await
}
