/**
 * Exam Handlers
 *
 * Submission and history. The client sends the questions (with their
 * correct answers, as produced by the exam generator) and its own
 * answer list; the handler ignores any score the client might claim
 * and recomputes everything. The exam id comes from the client so a
 * retried submission carries the same id and hits the award ledger.
 */

use axum::{extract::State, response::Json};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::ApiError;
use crate::exams::db;
use crate::exams::scoring::{score_exam, ExamQuestion};
use crate::middleware::auth::AuthUser;
use crate::realtime::broadcast::{broadcast_change, ChangeBroadcast, ChangeEvent, ChangeOp};

const MAX_QUESTIONS: usize = 100;
const MAX_TITLE_LEN: usize = 255;

/// An exam submission
///
/// `examId` doubles as the idempotency key: a client retry after a
/// timed-out response resubmits under the same id and is not credited
/// twice.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitExamRequest {
    pub exam_id: Uuid,
    pub exam_title: String,
    pub exam_questions: Vec<ExamQuestion>,
    pub user_answers: Vec<Value>,
}

/// Scoring outcome returned to the client
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitExamResponse {
    pub score: u32,
    pub points_awarded: u32,
    pub correct_count: u32,
    pub total_questions: u32,
}

/// Submit an exam for scoring (POST /api/exams/submit)
pub async fn submit_exam(
    State(pool): State<Option<PgPool>>,
    State(broadcast): State<ChangeBroadcast>,
    AuthUser(user): AuthUser,
    Json(request): Json<SubmitExamRequest>,
) -> Result<Json<SubmitExamResponse>, ApiError> {
    let pool = pool.ok_or(ApiError::DatabaseUnavailable)?;

    let title = request.exam_title.trim();
    if title.is_empty() || title.chars().count() > MAX_TITLE_LEN {
        return Err(ApiError::validation("عنوان آزمون نامعتبر است"));
    }
    if request.exam_questions.is_empty() || request.exam_questions.len() > MAX_QUESTIONS {
        return Err(ApiError::validation("تعداد سوالات آزمون نامعتبر است"));
    }
    if request.user_answers.len() != request.exam_questions.len() {
        return Err(ApiError::validation(
            "تعداد پاسخ‌ها با تعداد سوالات برابر نیست",
        ));
    }

    let score = score_exam(&request.exam_questions, &request.user_answers);

    let questions = serde_json::to_value(&request.exam_questions)
        .map_err(|e| ApiError::Internal(format!("Failed to serialize questions: {e}")))?;
    let answers = Value::Array(request.user_answers);

    let credited = db::record_submission(
        &pool,
        request.exam_id,
        user.user_id,
        title,
        &questions,
        &answers,
        &score,
    )
    .await?;

    tracing::info!(
        "Exam {} submitted by {}: {}% ({} points credited)",
        request.exam_id,
        user.username,
        score.percentage,
        credited
    );

    broadcast_change(
        &broadcast,
        ChangeEvent::new("exams", user.user_id, ChangeOp::Insert),
    );

    Ok(Json(SubmitExamResponse {
        score: score.percentage,
        points_awarded: credited,
        correct_count: score.correct_count,
        total_questions: score.total_questions,
    }))
}

/// List the caller's exam history (GET /api/exams)
pub async fn list_exams(
    State(pool): State<Option<PgPool>>,
    AuthUser(user): AuthUser,
) -> Result<Json<Vec<db::ExamRecord>>, ApiError> {
    let pool = pool.ok_or(ApiError::DatabaseUnavailable)?;
    Ok(Json(db::list_exams(&pool, user.user_id).await?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn client_supplied_scores_are_not_part_of_the_request_shape() {
        // A claimed score in the body is silently dropped at
        // deserialization; only the recomputed score is ever used
        let request: SubmitExamRequest = serde_json::from_value(json!({
            "examId": "00000000-0000-0000-0000-000000000010",
            "examTitle": "آزمون",
            "examQuestions": [{ "question": "۲+۲؟", "correct_answer": "۴" }],
            "userAnswers": ["اشتباه"],
            "score": 100
        }))
        .unwrap();

        let score = score_exam(&request.exam_questions, &request.user_answers);
        assert_eq!(score.percentage, 0);
    }

    #[test]
    fn submission_body_uses_camel_case_keys() {
        let result = serde_json::from_value::<SubmitExamRequest>(json!({
            "exam_id": "00000000-0000-0000-0000-000000000010",
            "exam_title": "آزمون",
            "exam_questions": [],
            "user_answers": []
        }));
        assert!(result.is_err());
    }
}
