/**
 * Image Analysis
 *
 * POST /api/ai/image-analysis: explain a photographed exercise or
 * textbook page. The image travels as a data URL or https URL; the
 * optional prompt narrows what to look at.
 */

use axum::{extract::State, response::Json};
use serde::{Deserialize, Serialize};

use crate::ai::gateway::AiGateway;
use crate::ai::validation::{
    validate_image_url, validate_optional_ai_input, MAX_PROMPT_LEN,
};
use crate::error::ApiError;
use crate::middleware::auth::AuthUser;

const SYSTEM_PROMPT: &str = "تو یک معلم هستی که تصویر تمرین یا صفحه کتاب درسی را بررسی \
    می‌کنی. محتوای تصویر را توضیح بده و اگر سوالی در آن هست، حل آن را قدم به قدم \
    به فارسی بنویس.";

const DEFAULT_PROMPT: &str = "این تصویر را تحلیل کن.";

#[derive(Debug, Deserialize)]
pub struct ImageAnalysisRequest {
    pub image: String,
    #[serde(default)]
    pub prompt: String,
}

#[derive(Debug, Serialize)]
pub struct ImageAnalysisResponse {
    pub result: String,
}

pub async fn analyze_image(
    State(gateway): State<AiGateway>,
    AuthUser(_user): AuthUser,
    Json(request): Json<ImageAnalysisRequest>,
) -> Result<Json<ImageAnalysisResponse>, ApiError> {
    let image_url = validate_image_url(&request.image)?.to_string();
    let prompt = validate_optional_ai_input(&request.prompt, MAX_PROMPT_LEN, "پیام")?
        .unwrap_or_else(|| DEFAULT_PROMPT.to_string());

    let result = gateway
        .complete_with_image(SYSTEM_PROMPT, &prompt, &image_url)
        .await?;

    Ok(Json(ImageAnalysisResponse { result }))
}
