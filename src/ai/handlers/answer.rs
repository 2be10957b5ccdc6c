/**
 * Question Answering
 *
 * POST /api/ai/answer: a study question plus optional surrounding
 * context, answered in Persian.
 */

use axum::{extract::State, response::Json};
use serde::{Deserialize, Serialize};

use crate::ai::gateway::AiGateway;
use crate::ai::validation::{
    validate_ai_input, validate_optional_ai_input, MAX_CONTEXT_LEN, MAX_QUESTION_LEN,
};
use crate::error::ApiError;
use crate::middleware::auth::AuthUser;

const SYSTEM_PROMPT: &str = "تو یک معلم خصوصی هستی که به دانش‌آموزان ایرانی کمک می‌کنی. \
    به سوالات درسی پاسخ دقیق و قابل فهم بده. پاسخ را به فارسی بنویس \
    و در صورت نیاز مراحل حل را قدم به قدم توضیح بده.";

#[derive(Debug, Deserialize)]
pub struct AnswerRequest {
    pub question: String,
    #[serde(default)]
    pub context: String,
}

#[derive(Debug, Serialize)]
pub struct AnswerResponse {
    pub answer: String,
}

pub async fn answer(
    State(gateway): State<AiGateway>,
    AuthUser(_user): AuthUser,
    Json(request): Json<AnswerRequest>,
) -> Result<Json<AnswerResponse>, ApiError> {
    let question = validate_ai_input(&request.question, MAX_QUESTION_LEN, "سوال")?;
    let context = validate_optional_ai_input(&request.context, MAX_CONTEXT_LEN, "زمینه")?;

    let user_message = match context {
        Some(context) => format!("زمینه:\n{context}\n\nسوال: {question}"),
        None => question,
    };

    let answer = gateway.complete(SYSTEM_PROMPT, &user_message).await?;

    Ok(Json(AnswerResponse { answer }))
}
