/**
 * Study Plans Database Operations
 *
 * Every statement filters by user_id as well as plan id, which makes
 * ownership part of the query instead of a separate check.
 */

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use sqlx::PgPool;
use uuid::Uuid;

/// A study plan
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct StudyPlan {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub description: String,
    pub subjects: Vec<String>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

pub async fn create_plan(
    pool: &PgPool,
    user_id: Uuid,
    title: &str,
    description: &str,
    subjects: &[String],
    start_date: NaiveDate,
    end_date: NaiveDate,
) -> Result<StudyPlan, sqlx::Error> {
    sqlx::query_as::<_, StudyPlan>(
        "INSERT INTO study_plans (id, user_id, title, description, subjects, start_date, end_date)
         VALUES ($1, $2, $3, $4, $5, $6, $7)
         RETURNING id, user_id, title, description, subjects, start_date, end_date,
                   created_at, updated_at",
    )
    .bind(Uuid::new_v4())
    .bind(user_id)
    .bind(title)
    .bind(description)
    .bind(subjects)
    .bind(start_date)
    .bind(end_date)
    .fetch_one(pool)
    .await
}

pub async fn list_plans(pool: &PgPool, user_id: Uuid) -> Result<Vec<StudyPlan>, sqlx::Error> {
    sqlx::query_as::<_, StudyPlan>(
        "SELECT id, user_id, title, description, subjects, start_date, end_date,
                created_at, updated_at
         FROM study_plans
         WHERE user_id = $1
         ORDER BY start_date",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await
}

/// Update a plan; returns the row only if it exists and belongs to the
/// caller.
pub async fn update_plan(
    pool: &PgPool,
    plan_id: Uuid,
    user_id: Uuid,
    title: &str,
    description: &str,
    subjects: &[String],
    start_date: NaiveDate,
    end_date: NaiveDate,
) -> Result<Option<StudyPlan>, sqlx::Error> {
    sqlx::query_as::<_, StudyPlan>(
        "UPDATE study_plans
         SET title = $3, description = $4, subjects = $5,
             start_date = $6, end_date = $7, updated_at = NOW()
         WHERE id = $1 AND user_id = $2
         RETURNING id, user_id, title, description, subjects, start_date, end_date,
                   created_at, updated_at",
    )
    .bind(plan_id)
    .bind(user_id)
    .bind(title)
    .bind(description)
    .bind(subjects)
    .bind(start_date)
    .bind(end_date)
    .fetch_optional(pool)
    .await
}

/// Delete a plan; returns whether a row was removed.
pub async fn delete_plan(pool: &PgPool, plan_id: Uuid, user_id: Uuid) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM study_plans WHERE id = $1 AND user_id = $2")
        .bind(plan_id)
        .bind(user_id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}
