//! Database operations for messaging
//!
//! Channels, groups, direct messages, and saved-message bookmarks.
//! These functions do no authorization themselves; handlers load
//! `ScopeFacts` here, decide via `chat::scope`, and only then mutate.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::chat::scope::{MessageKind, ScopeFacts};

/// A channel (owner-broadcast-only space)
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Channel {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub owner_id: Uuid,
    pub created_at: DateTime<Utc>,
}

/// A group (symmetric multi-member space)
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Group {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub owner_id: Uuid,
    pub created_at: DateTime<Utc>,
}

/// A message in any of the three scopes, shaped for list responses
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: Uuid,
    pub author_id: Uuid,
    pub author_name: String,
    pub content: String,
    pub is_edited: bool,
    pub created_at: DateTime<Utc>,
}

/// A saved-message bookmark
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct SavedMessage {
    pub id: Uuid,
    pub user_id: Uuid,
    pub message_type: String,
    pub message_id: Uuid,
    pub created_at: DateTime<Utc>,
}

/// Identity facts about a stored message used for edit/delete checks
/// and change broadcasting
#[derive(Debug, Clone, Copy)]
pub struct MessageMeta {
    pub id: Uuid,
    pub author_id: Uuid,
    /// Channel id, group id, or (for DMs) the receiver id
    pub scope_id: Uuid,
}

// ---------------------------------------------------------------------------
// Channels

/// Create a channel; the creator becomes owner and is auto-joined.
///
/// Both inserts run in one transaction so a channel never exists
/// without its owner's membership row.
pub async fn create_channel(
    pool: &PgPool,
    owner_id: Uuid,
    name: &str,
    description: &str,
) -> Result<Channel, sqlx::Error> {
    let id = Uuid::new_v4();
    let now = Utc::now();

    let mut tx = pool.begin().await?;

    let channel = sqlx::query_as::<_, Channel>(
        r#"
        INSERT INTO channels (id, name, description, owner_id, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, $5)
        RETURNING id, name, description, owner_id, created_at
        "#,
    )
    .bind(id)
    .bind(name)
    .bind(description)
    .bind(owner_id)
    .bind(now)
    .fetch_one(&mut *tx)
    .await?;

    sqlx::query(
        r#"
        INSERT INTO channel_members (id, channel_id, user_id, joined_at)
        VALUES ($1, $2, $3, $4)
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(id)
    .bind(owner_id)
    .bind(now)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;

    Ok(channel)
}

/// List all channels, newest first
pub async fn list_channels(pool: &PgPool) -> Result<Vec<Channel>, sqlx::Error> {
    sqlx::query_as::<_, Channel>(
        r#"
        SELECT id, name, description, owner_id, created_at
        FROM channels
        ORDER BY created_at DESC
        "#,
    )
    .fetch_all(pool)
    .await
}

/// Join a channel (idempotent: joining twice is a no-op)
pub async fn join_channel(pool: &PgPool, channel_id: Uuid, user_id: Uuid) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO channel_members (id, channel_id, user_id, joined_at)
        VALUES ($1, $2, $3, $4)
        ON CONFLICT (channel_id, user_id) DO NOTHING
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(channel_id)
    .bind(user_id)
    .bind(Utc::now())
    .execute(pool)
    .await?;

    Ok(())
}

/// Load channel ownership/membership facts for one actor
///
/// Returns `None` if the channel does not exist.
pub async fn channel_facts(
    pool: &PgPool,
    channel_id: Uuid,
    actor: Uuid,
) -> Result<Option<ScopeFacts>, sqlx::Error> {
    let row = sqlx::query(
        r#"
        SELECT
            c.owner_id,
            EXISTS (
                SELECT 1 FROM channel_members m
                WHERE m.channel_id = c.id AND m.user_id = $2
            ) AS is_member
        FROM channels c
        WHERE c.id = $1
        "#,
    )
    .bind(channel_id)
    .bind(actor)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(|r| ScopeFacts::Channel {
        owner_id: r.get("owner_id"),
        actor_is_member: r.get("is_member"),
    }))
}

// ---------------------------------------------------------------------------
// Groups

/// Create a group; the creator becomes owner and an admin member.
pub async fn create_group(
    pool: &PgPool,
    owner_id: Uuid,
    name: &str,
    description: &str,
) -> Result<Group, sqlx::Error> {
    let id = Uuid::new_v4();
    let now = Utc::now();

    let mut tx = pool.begin().await?;

    let group = sqlx::query_as::<_, Group>(
        r#"
        INSERT INTO groups (id, name, description, owner_id, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, $5)
        RETURNING id, name, description, owner_id, created_at
        "#,
    )
    .bind(id)
    .bind(name)
    .bind(description)
    .bind(owner_id)
    .bind(now)
    .fetch_one(&mut *tx)
    .await?;

    sqlx::query(
        r#"
        INSERT INTO group_members (id, group_id, user_id, is_admin, joined_at)
        VALUES ($1, $2, $3, TRUE, $4)
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(id)
    .bind(owner_id)
    .bind(now)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;

    Ok(group)
}

/// List all groups, newest first
pub async fn list_groups(pool: &PgPool) -> Result<Vec<Group>, sqlx::Error> {
    sqlx::query_as::<_, Group>(
        r#"
        SELECT id, name, description, owner_id, created_at
        FROM groups
        ORDER BY created_at DESC
        "#,
    )
    .fetch_all(pool)
    .await
}

/// Join a group as a regular (non-admin) member
pub async fn join_group(pool: &PgPool, group_id: Uuid, user_id: Uuid) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO group_members (id, group_id, user_id, is_admin, joined_at)
        VALUES ($1, $2, $3, FALSE, $4)
        ON CONFLICT (group_id, user_id) DO NOTHING
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(group_id)
    .bind(user_id)
    .bind(Utc::now())
    .execute(pool)
    .await?;

    Ok(())
}

/// Load group membership facts for one actor
///
/// Returns `None` if the group does not exist.
pub async fn group_facts(
    pool: &PgPool,
    group_id: Uuid,
    actor: Uuid,
) -> Result<Option<ScopeFacts>, sqlx::Error> {
    let row = sqlx::query(
        r#"
        SELECT EXISTS (
            SELECT 1 FROM group_members m
            WHERE m.group_id = g.id AND m.user_id = $2
        ) AS is_member
        FROM groups g
        WHERE g.id = $1
        "#,
    )
    .bind(group_id)
    .bind(actor)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(|r| ScopeFacts::Group {
        actor_is_member: r.get("is_member"),
    }))
}

/// Check group membership directly (used by the AI group-chat proxy)
pub async fn is_group_member(
    pool: &PgPool,
    group_id: Uuid,
    user_id: Uuid,
) -> Result<bool, sqlx::Error> {
    let row = sqlx::query(
        r#"
        SELECT COUNT(*) AS count FROM group_members
        WHERE group_id = $1 AND user_id = $2
        "#,
    )
    .bind(group_id)
    .bind(user_id)
    .fetch_one(pool)
    .await?;

    let count: i64 = row.get("count");
    Ok(count > 0)
}

// ---------------------------------------------------------------------------
// Messages

/// Insert a channel message
pub async fn insert_channel_message(
    pool: &PgPool,
    channel_id: Uuid,
    author_id: Uuid,
    content: &str,
) -> Result<Uuid, sqlx::Error> {
    let id = Uuid::new_v4();
    sqlx::query(
        r#"
        INSERT INTO channel_messages (id, channel_id, user_id, content, is_edited, created_at, updated_at)
        VALUES ($1, $2, $3, $4, FALSE, $5, $5)
        "#,
    )
    .bind(id)
    .bind(channel_id)
    .bind(author_id)
    .bind(content)
    .bind(Utc::now())
    .execute(pool)
    .await?;

    Ok(id)
}

/// Insert a group message
pub async fn insert_group_message(
    pool: &PgPool,
    group_id: Uuid,
    author_id: Uuid,
    content: &str,
) -> Result<Uuid, sqlx::Error> {
    let id = Uuid::new_v4();
    sqlx::query(
        r#"
        INSERT INTO group_messages (id, group_id, user_id, content, is_edited, created_at, updated_at)
        VALUES ($1, $2, $3, $4, FALSE, $5, $5)
        "#,
    )
    .bind(id)
    .bind(group_id)
    .bind(author_id)
    .bind(content)
    .bind(Utc::now())
    .execute(pool)
    .await?;

    Ok(id)
}

/// Insert a direct message
pub async fn insert_direct_message(
    pool: &PgPool,
    sender_id: Uuid,
    receiver_id: Uuid,
    content: &str,
) -> Result<Uuid, sqlx::Error> {
    let id = Uuid::new_v4();
    sqlx::query(
        r#"
        INSERT INTO direct_messages (id, sender_id, receiver_id, content, is_edited, created_at, updated_at)
        VALUES ($1, $2, $3, $4, FALSE, $5, $5)
        "#,
    )
    .bind(id)
    .bind(sender_id)
    .bind(receiver_id)
    .bind(content)
    .bind(Utc::now())
    .execute(pool)
    .await?;

    Ok(id)
}

fn row_to_chat_message(row: sqlx::postgres::PgRow, author_col: &str) -> ChatMessage {
    ChatMessage {
        id: row.get("id"),
        author_id: row.get(author_col),
        author_name: row.get("author_name"),
        content: row.get("content"),
        is_edited: row.get("is_edited"),
        created_at: row.get("created_at"),
    }
}

/// List messages in a channel, oldest first
pub async fn list_channel_messages(
    pool: &PgPool,
    channel_id: Uuid,
) -> Result<Vec<ChatMessage>, sqlx::Error> {
    let rows = sqlx::query(
        r#"
        SELECT m.id, m.user_id, m.content, m.is_edited, m.created_at,
               p.full_name AS author_name
        FROM channel_messages m
        JOIN profiles p ON p.user_id = m.user_id
        WHERE m.channel_id = $1
        ORDER BY m.created_at ASC
        "#,
    )
    .bind(channel_id)
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .map(|r| row_to_chat_message(r, "user_id"))
        .collect())
}

/// List messages in a group, oldest first
pub async fn list_group_messages(
    pool: &PgPool,
    group_id: Uuid,
) -> Result<Vec<ChatMessage>, sqlx::Error> {
    let rows = sqlx::query(
        r#"
        SELECT m.id, m.user_id, m.content, m.is_edited, m.created_at,
               p.full_name AS author_name
        FROM group_messages m
        JOIN profiles p ON p.user_id = m.user_id
        WHERE m.group_id = $1
        ORDER BY m.created_at ASC
        "#,
    )
    .bind(group_id)
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .map(|r| row_to_chat_message(r, "user_id"))
        .collect())
}

/// List the direct-message thread between two users, oldest first
pub async fn list_direct_messages(
    pool: &PgPool,
    user_a: Uuid,
    user_b: Uuid,
) -> Result<Vec<ChatMessage>, sqlx::Error> {
    let rows = sqlx::query(
        r#"
        SELECT m.id, m.sender_id, m.content, m.is_edited, m.created_at,
               p.full_name AS author_name
        FROM direct_messages m
        JOIN profiles p ON p.user_id = m.sender_id
        WHERE (m.sender_id = $1 AND m.receiver_id = $2)
           OR (m.sender_id = $2 AND m.receiver_id = $1)
        ORDER BY m.created_at ASC
        "#,
    )
    .bind(user_a)
    .bind(user_b)
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .map(|r| row_to_chat_message(r, "sender_id"))
        .collect())
}

/// Load identity facts about one message of the given kind
///
/// Returns `None` if the message does not exist.
pub async fn get_message_meta(
    pool: &PgPool,
    kind: MessageKind,
    message_id: Uuid,
) -> Result<Option<MessageMeta>, sqlx::Error> {
    let query = match kind {
        MessageKind::Channel => {
            "SELECT id, user_id AS author_id, channel_id AS scope_id FROM channel_messages WHERE id = $1"
        }
        MessageKind::Group => {
            "SELECT id, user_id AS author_id, group_id AS scope_id FROM group_messages WHERE id = $1"
        }
        MessageKind::Direct => {
            "SELECT id, sender_id AS author_id, receiver_id AS scope_id FROM direct_messages WHERE id = $1"
        }
    };

    let row = sqlx::query(query).bind(message_id).fetch_optional(pool).await?;

    Ok(row.map(|r| MessageMeta {
        id: r.get("id"),
        author_id: r.get("author_id"),
        scope_id: r.get("scope_id"),
    }))
}

/// Load scope facts for the conversation a stored message belongs to
///
/// Channel and group messages point at their scope row; for a direct
/// message the meta itself is the pair, so no query is needed. Returns
/// `None` when the containing channel/group no longer exists.
pub async fn message_scope_facts(
    pool: &PgPool,
    kind: MessageKind,
    meta: &MessageMeta,
    actor: Uuid,
) -> Result<Option<ScopeFacts>, sqlx::Error> {
    match kind {
        MessageKind::Channel => channel_facts(pool, meta.scope_id, actor).await,
        MessageKind::Group => group_facts(pool, meta.scope_id, actor).await,
        MessageKind::Direct => Ok(Some(ScopeFacts::Direct {
            sender_id: meta.author_id,
            receiver_id: meta.scope_id,
        })),
    }
}

/// Overwrite a message's content and mark it edited
///
/// Destructive: the previous content is not retained anywhere.
pub async fn edit_message(
    pool: &PgPool,
    kind: MessageKind,
    message_id: Uuid,
    content: &str,
) -> Result<(), sqlx::Error> {
    // Table names come from MessageKind, never from input
    let query = format!(
        "UPDATE {} SET content = $1, is_edited = TRUE, updated_at = $2 WHERE id = $3",
        kind.table()
    );

    sqlx::query(&query)
        .bind(content)
        .bind(Utc::now())
        .bind(message_id)
        .execute(pool)
        .await?;

    Ok(())
}

/// Delete a message row (terminal; bookmarks pointing at it are removed
/// in the same transaction)
pub async fn delete_message(
    pool: &PgPool,
    kind: MessageKind,
    message_id: Uuid,
) -> Result<(), sqlx::Error> {
    let mut tx = pool.begin().await?;

    sqlx::query("DELETE FROM saved_messages WHERE message_id = $1")
        .bind(message_id)
        .execute(&mut *tx)
        .await?;

    let query = format!("DELETE FROM {} WHERE id = $1", kind.table());
    sqlx::query(&query).bind(message_id).execute(&mut *tx).await?;

    tx.commit().await?;

    Ok(())
}

// ---------------------------------------------------------------------------
// Saved messages

/// Toggle a bookmark on (user, message)
///
/// Delete-first: if a row existed it is removed and the result is
/// "unsaved". Otherwise insert with `ON CONFLICT DO NOTHING`; the
/// unique constraint on (user_id, message_id) means two concurrent
/// togglers can never produce two rows.
///
/// Returns `true` if the message is saved after the call.
pub async fn toggle_saved(
    pool: &PgPool,
    user_id: Uuid,
    kind: MessageKind,
    message_id: Uuid,
) -> Result<bool, sqlx::Error> {
    let deleted = sqlx::query(
        r#"
        DELETE FROM saved_messages
        WHERE user_id = $1 AND message_id = $2
        "#,
    )
    .bind(user_id)
    .bind(message_id)
    .execute(pool)
    .await?;

    if deleted.rows_affected() > 0 {
        return Ok(false);
    }

    sqlx::query(
        r#"
        INSERT INTO saved_messages (id, user_id, message_type, message_id, created_at)
        VALUES ($1, $2, $3, $4, $5)
        ON CONFLICT (user_id, message_id) DO NOTHING
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(user_id)
    .bind(kind.as_str())
    .bind(message_id)
    .bind(Utc::now())
    .execute(pool)
    .await?;

    Ok(true)
}

/// List a user's bookmarks, newest first
pub async fn list_saved(pool: &PgPool, user_id: Uuid) -> Result<Vec<SavedMessage>, sqlx::Error> {
    sqlx::query_as::<_, SavedMessage>(
        r#"
        SELECT id, user_id, message_type, message_id, created_at
        FROM saved_messages
        WHERE user_id = $1
        ORDER BY created_at DESC
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await
}
