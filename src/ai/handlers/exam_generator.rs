/**
 * Exam Generator
 *
 * POST /api/ai/exam-generator: produce a multiple-choice exam on a
 * topic. The gateway call pins the model to a `generate_exam` tool so
 * the reply is structured JSON; the parsed questions are validated
 * for shape before being returned to the client.
 */

use axum::{extract::State, response::Json};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::ai::gateway::AiGateway;
use crate::ai::validation::{validate_ai_input, MAX_CONTENT_LEN};
use crate::error::ApiError;
use crate::exams::scoring::ExamQuestion;
use crate::middleware::auth::AuthUser;

const SYSTEM_PROMPT: &str = "تو یک طراح سوال امتحانی هستی. برای موضوع داده شده سوالات \
    چهارگزینه‌ای استاندارد به فارسی طراحی کن. هر سوال باید یک پاسخ صحیح مشخص \
    و یک توضیح کوتاه داشته باشد.";

const DEFAULT_QUESTION_COUNT: u32 = 5;
const MAX_QUESTION_COUNT: u32 = 20;

/// The study material or topic to build questions from
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateExamRequest {
    pub content: String,
    /// `easy`, `medium` (default), or `hard`
    #[serde(default)]
    pub difficulty: Option<String>,
    #[serde(default)]
    pub question_count: Option<u32>,
}

#[derive(Debug, Serialize)]
pub struct GenerateExamResponse {
    pub questions: Vec<ExamQuestion>,
}

fn exam_tool() -> serde_json::Value {
    json!({
        "type": "function",
        "function": {
            "name": "generate_exam",
            "description": "Return the generated exam questions",
            "parameters": {
                "type": "object",
                "properties": {
                    "questions": {
                        "type": "array",
                        "items": {
                            "type": "object",
                            "properties": {
                                "question": { "type": "string" },
                                "type": { "type": "string" },
                                "options": { "type": "array", "items": { "type": "string" } },
                                "correct_answer": { "type": "string" },
                                "explanation": { "type": "string" }
                            },
                            "required": ["question", "options", "correct_answer"]
                        }
                    }
                },
                "required": ["questions"]
            }
        }
    })
}

pub async fn generate_exam(
    State(gateway): State<AiGateway>,
    AuthUser(_user): AuthUser,
    Json(request): Json<GenerateExamRequest>,
) -> Result<Json<GenerateExamResponse>, ApiError> {
    let content = validate_ai_input(&request.content, MAX_CONTENT_LEN, "محتوا")?;

    let difficulty = match request.difficulty.as_deref() {
        None | Some("medium") => "متوسط",
        Some("easy") => "آسان",
        Some("hard") => "دشوار",
        Some(_) => return Err(ApiError::validation("سطح دشواری نامعتبر است")),
    };

    let count = request.question_count.unwrap_or(DEFAULT_QUESTION_COUNT);
    if count == 0 || count > MAX_QUESTION_COUNT {
        return Err(ApiError::validation("تعداد سوالات نامعتبر است"));
    }

    let user_message =
        format!("سطح دشواری: {difficulty}\nتعداد سوالات: {count}\n\nمحتوا:\n{content}");

    let arguments = gateway
        .complete_with_tool(SYSTEM_PROMPT, &user_message, exam_tool(), "generate_exam")
        .await?;

    let questions: Vec<ExamQuestion> = serde_json::from_value(arguments["questions"].clone())
        .map_err(|e| ApiError::Upstream(format!("Generated exam had an unexpected shape: {e}")))?;

    if questions.is_empty() {
        return Err(ApiError::Upstream(
            "Generated exam contained no questions".to_string(),
        ));
    }

    Ok(Json(GenerateExamResponse { questions }))
}
