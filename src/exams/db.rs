/**
 * Exams Database Operations
 *
 * One transaction persists a scored submission: the exam row, the
 * award-ledger row, and the profile counters. The ledger insert uses
 * ON CONFLICT DO NOTHING keyed on the exam id; when it inserts
 * nothing, the points were already granted, the profile update is
 * skipped, and the stored award is read back so a retried submission
 * gets the same response as the original.
 */

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::exams::scoring::ExamScore;

/// A completed exam, as listed in history
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct ExamRecord {
    pub id: Uuid,
    pub title: String,
    pub score: i32,
    pub points_awarded: i32,
    pub completed_at: DateTime<Utc>,
}

/// Persist a scored submission.
///
/// Returns the credited points: the score's points on first write, the
/// originally stored award when the ledger shows the exam was already
/// credited. Either way the caller can echo the value to the client.
pub async fn record_submission(
    pool: &PgPool,
    exam_id: Uuid,
    user_id: Uuid,
    title: &str,
    questions: &Value,
    answers: &Value,
    score: &ExamScore,
) -> Result<u32, sqlx::Error> {
    let mut tx = pool.begin().await?;

    sqlx::query(
        "INSERT INTO exams (id, user_id, title, questions, answers, score, points_awarded)
         VALUES ($1, $2, $3, $4, $5, $6, $7)
         ON CONFLICT (id) DO NOTHING",
    )
    .bind(exam_id)
    .bind(user_id)
    .bind(title)
    .bind(questions)
    .bind(answers)
    .bind(score.percentage as i32)
    .bind(score.points as i32)
    .execute(&mut *tx)
    .await?;

    let awarded = sqlx::query(
        "INSERT INTO exam_point_awards (exam_id, user_id, points)
         VALUES ($1, $2, $3)
         ON CONFLICT (exam_id) DO NOTHING",
    )
    .bind(exam_id)
    .bind(user_id)
    .bind(score.points as i32)
    .execute(&mut *tx)
    .await?;

    let credited = if awarded.rows_affected() == 1 {
        sqlx::query(
            "UPDATE profiles
             SET points = points + $2,
                 exams_completed = exams_completed + 1,
                 updated_at = NOW()
             WHERE user_id = $1",
        )
        .bind(user_id)
        .bind(score.points as i32)
        .execute(&mut *tx)
        .await?;

        score.points
    } else {
        // Retry path: repeat the award recorded by the first submission
        let row = sqlx::query("SELECT points FROM exam_point_awards WHERE exam_id = $1")
            .bind(exam_id)
            .fetch_one(&mut *tx)
            .await?;
        let points: i32 = row.get("points");
        points.max(0) as u32
    };

    tx.commit().await?;
    Ok(credited)
}

/// List a user's exam history, newest first
pub async fn list_exams(pool: &PgPool, user_id: Uuid) -> Result<Vec<ExamRecord>, sqlx::Error> {
    sqlx::query_as::<_, ExamRecord>(
        "SELECT id, title, score, points_awarded, completed_at
         FROM exams
         WHERE user_id = $1
         ORDER BY completed_at DESC",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await
}
