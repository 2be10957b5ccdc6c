/**
 * In-Group Assistant
 *
 * POST /api/ai/group-chat: a group member asks the assistant a
 * question; the reply is written into the group as a regular message
 * authored by the reserved assistant user, so every member sees it
 * through the normal message list and change feed.
 */

use axum::{extract::State, response::Json};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::ai::gateway::AiGateway;
use crate::ai::validation::{validate_ai_input, MAX_CHAT_MESSAGE_LEN};
use crate::auth::users::ASSISTANT_USER_ID;
use crate::chat::db;
use crate::error::ApiError;
use crate::middleware::auth::AuthUser;
use crate::realtime::broadcast::{broadcast_change, ChangeBroadcast, ChangeEvent, ChangeOp};

const SYSTEM_PROMPT: &str = "تو دستیار هوشمند یک گروه مطالعاتی هستی. به سوال عضو گروه \
    کوتاه، دقیق و به فارسی پاسخ بده.";

/// Marks assistant-authored messages in the group timeline
const ASSISTANT_PREFIX: &str = "🤖 ";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupChatRequest {
    pub group_id: Uuid,
    pub prompt: String,
}

#[derive(Debug, Serialize)]
pub struct GroupChatResponse {
    pub response: String,
}

pub async fn group_chat(
    State(pool): State<Option<PgPool>>,
    State(gateway): State<AiGateway>,
    State(broadcast): State<ChangeBroadcast>,
    AuthUser(user): AuthUser,
    Json(request): Json<GroupChatRequest>,
) -> Result<Json<GroupChatResponse>, ApiError> {
    let pool = pool.ok_or(ApiError::DatabaseUnavailable)?;

    let prompt = validate_ai_input(&request.prompt, MAX_CHAT_MESSAGE_LEN, "پیام")?;

    if !db::is_group_member(&pool, request.group_id, user.user_id).await? {
        return Err(ApiError::forbidden("شما عضو این گروه نیستید"));
    }

    let response = gateway.complete(SYSTEM_PROMPT, &prompt).await?;

    let content = format!("{ASSISTANT_PREFIX}{response}");
    db::insert_group_message(&pool, request.group_id, ASSISTANT_USER_ID, &content).await?;

    broadcast_change(
        &broadcast,
        ChangeEvent::new("group_messages", request.group_id, ChangeOp::Insert),
    );

    Ok(Json(GroupChatResponse { response }))
}
