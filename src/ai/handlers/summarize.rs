/**
 * Summarize / Explain
 *
 * POST /api/ai/summarize: condense or re-explain a block of study
 * material. The `mode` field selects between the two system prompts.
 */

use axum::{extract::State, response::Json};
use serde::{Deserialize, Serialize};

use crate::ai::gateway::AiGateway;
use crate::ai::validation::{validate_ai_input, MAX_CONTENT_LEN};
use crate::error::ApiError;
use crate::middleware::auth::AuthUser;

const SUMMARIZE_PROMPT: &str = "تو یک دستیار آموزشی هستی. متن درسی زیر را به فارسی خلاصه کن. \
    نکات کلیدی را به صورت فهرست بیاور و چیزی به متن اضافه نکن.";

const EXPLAIN_PROMPT: &str = "تو یک معلم صبور هستی. متن درسی زیر را به زبان ساده و به فارسی \
    دوباره توضیح بده، طوری که یک دانش‌آموز دبیرستانی آن را بفهمد. از مثال استفاده کن.";

#[derive(Debug, Deserialize)]
pub struct SummarizeRequest {
    pub content: String,
    /// `summarize` (default) or `explain`
    #[serde(default, rename = "type")]
    pub mode: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SummarizeResponse {
    pub result: String,
}

pub async fn summarize(
    State(gateway): State<AiGateway>,
    AuthUser(_user): AuthUser,
    Json(request): Json<SummarizeRequest>,
) -> Result<Json<SummarizeResponse>, ApiError> {
    let content = validate_ai_input(&request.content, MAX_CONTENT_LEN, "متن")?;

    let system = match request.mode.as_deref() {
        None | Some("summarize") => SUMMARIZE_PROMPT,
        Some("explain") => EXPLAIN_PROMPT,
        Some(_) => return Err(ApiError::validation("حالت درخواستی نامعتبر است")),
    };

    let result = gateway.complete(system, &content).await?;

    Ok(Json(SummarizeResponse { result }))
}
