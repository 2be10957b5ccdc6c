/**
 * Study Consultation
 *
 * POST /api/ai/consultation: free-form advice about study habits,
 * stress, and exam preparation.
 */

use axum::{extract::State, response::Json};
use serde::{Deserialize, Serialize};

use crate::ai::gateway::AiGateway;
use crate::ai::validation::{validate_ai_input, MAX_PROMPT_LEN};
use crate::error::ApiError;
use crate::middleware::auth::AuthUser;

const SYSTEM_PROMPT: &str = "تو یک مشاور تحصیلی دلسوز هستی که به دانش‌آموزان ایرانی مشاوره \
    می‌دهی. درباره روش مطالعه، مدیریت استرس و آمادگی برای امتحانات راهنمایی کن. \
    پاسخ را به فارسی و با لحن دوستانه بنویس.";

#[derive(Debug, Deserialize)]
pub struct ConsultationRequest {
    pub message: String,
    #[serde(default)]
    pub grade: Option<String>,
    #[serde(default)]
    pub subjects: Option<Vec<String>>,
}

#[derive(Debug, Serialize)]
pub struct ConsultationResponse {
    pub advice: String,
}

pub async fn consultation(
    State(gateway): State<AiGateway>,
    AuthUser(_user): AuthUser,
    Json(request): Json<ConsultationRequest>,
) -> Result<Json<ConsultationResponse>, ApiError> {
    let message = validate_ai_input(&request.message, MAX_PROMPT_LEN, "پیام")?;

    let mut user_message = String::new();
    if let Some(grade) = request.grade.as_deref().filter(|g| !g.trim().is_empty()) {
        user_message.push_str(&format!("پایه تحصیلی: {}\n", grade.trim()));
    }
    if let Some(subjects) = request.subjects.as_deref().filter(|s| !s.is_empty()) {
        user_message.push_str(&format!("درس‌ها: {}\n", subjects.join("، ")));
    }
    user_message.push_str(&message);

    let advice = gateway.complete(SYSTEM_PROMPT, &user_message).await?;

    Ok(Json(ConsultationResponse { advice }))
}
