/**
 * Study Plan Handlers
 *
 * Create, list, update, and delete, all scoped to the caller. A plan
 * another user owns behaves exactly like one that does not exist.
 */

use axum::{
    extract::{Path, State},
    response::Json,
};
use chrono::NaiveDate;
use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::ApiError;
use crate::middleware::auth::AuthUser;
use crate::plans::db;

const MAX_TITLE_LEN: usize = 255;
const MAX_DESCRIPTION_LEN: usize = 2000;
const MAX_SUBJECTS: usize = 50;

/// Request body shared by create and update
#[derive(Debug, Deserialize)]
pub struct StudyPlanRequest {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub subjects: Vec<String>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

fn validate(request: &StudyPlanRequest) -> Result<String, ApiError> {
    let title = request.title.trim();
    if title.is_empty() || title.chars().count() > MAX_TITLE_LEN {
        return Err(ApiError::validation("عنوان برنامه نامعتبر است"));
    }
    if request.description.chars().count() > MAX_DESCRIPTION_LEN {
        return Err(ApiError::validation("توضیحات بیش از حد طولانی است"));
    }
    if request.subjects.len() > MAX_SUBJECTS
        || request.subjects.iter().any(|s| s.trim().is_empty())
    {
        return Err(ApiError::validation("فهرست دروس نامعتبر است"));
    }
    if request.start_date > request.end_date {
        return Err(ApiError::validation(
            "تاریخ شروع نمی‌تواند بعد از تاریخ پایان باشد",
        ));
    }
    Ok(title.to_string())
}

/// Create a study plan (POST /api/plans)
pub async fn create_plan(
    State(pool): State<Option<PgPool>>,
    AuthUser(user): AuthUser,
    Json(request): Json<StudyPlanRequest>,
) -> Result<Json<db::StudyPlan>, ApiError> {
    let pool = pool.ok_or(ApiError::DatabaseUnavailable)?;
    let title = validate(&request)?;

    let plan = db::create_plan(
        &pool,
        user.user_id,
        &title,
        request.description.trim(),
        &request.subjects,
        request.start_date,
        request.end_date,
    )
    .await?;

    Ok(Json(plan))
}

/// List the caller's study plans (GET /api/plans)
pub async fn list_plans(
    State(pool): State<Option<PgPool>>,
    AuthUser(user): AuthUser,
) -> Result<Json<Vec<db::StudyPlan>>, ApiError> {
    let pool = pool.ok_or(ApiError::DatabaseUnavailable)?;
    Ok(Json(db::list_plans(&pool, user.user_id).await?))
}

/// Update a study plan (PATCH /api/plans/{id})
pub async fn update_plan(
    State(pool): State<Option<PgPool>>,
    AuthUser(user): AuthUser,
    Path(plan_id): Path<Uuid>,
    Json(request): Json<StudyPlanRequest>,
) -> Result<Json<db::StudyPlan>, ApiError> {
    let pool = pool.ok_or(ApiError::DatabaseUnavailable)?;
    let title = validate(&request)?;

    let plan = db::update_plan(
        &pool,
        plan_id,
        user.user_id,
        &title,
        request.description.trim(),
        &request.subjects,
        request.start_date,
        request.end_date,
    )
    .await?
    .ok_or_else(|| ApiError::not_found("برنامه مطالعه یافت نشد"))?;

    Ok(Json(plan))
}

/// Delete a study plan (DELETE /api/plans/{id})
pub async fn delete_plan(
    State(pool): State<Option<PgPool>>,
    AuthUser(user): AuthUser,
    Path(plan_id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let pool = pool.ok_or(ApiError::DatabaseUnavailable)?;

    if !db::delete_plan(&pool, plan_id, user.user_id).await? {
        return Err(ApiError::not_found("برنامه مطالعه یافت نشد"));
    }

    Ok(Json(serde_json::json!({ "deleted": true })))
}
