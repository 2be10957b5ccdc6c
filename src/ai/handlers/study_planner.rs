/**
 * Study Planner Assistant
 *
 * POST /api/ai/study-planner: turn subjects and a date range into a
 * concrete day-by-day study schedule.
 */

use axum::{extract::State, response::Json};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::ai::gateway::AiGateway;
use crate::error::ApiError;
use crate::middleware::auth::AuthUser;

const SYSTEM_PROMPT: &str = "تو یک برنامه‌ریز تحصیلی هستی. بر اساس درس‌ها و بازه زمانی \
    داده شده، یک برنامه مطالعه روزانه مشخص و عملی به فارسی تنظیم کن. \
    برنامه را به تفکیک روز و ساعت بنویس.";

const MAX_SUBJECTS: usize = 50;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudyPlannerRequest {
    pub subjects: Vec<String>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(default)]
    pub grade: Option<String>,
    #[serde(default)]
    pub student_name: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StudyPlannerResponse {
    pub study_plan: String,
}

pub async fn study_planner(
    State(gateway): State<AiGateway>,
    AuthUser(_user): AuthUser,
    Json(request): Json<StudyPlannerRequest>,
) -> Result<Json<StudyPlannerResponse>, ApiError> {
    if request.subjects.is_empty()
        || request.subjects.len() > MAX_SUBJECTS
        || request.subjects.iter().any(|s| s.trim().is_empty())
    {
        return Err(ApiError::validation("فهرست دروس نامعتبر است"));
    }
    if request.start_date > request.end_date {
        return Err(ApiError::validation(
            "تاریخ شروع نمی‌تواند بعد از تاریخ پایان باشد",
        ));
    }

    let mut user_message = format!(
        "درس‌ها: {}\nبازه: {} تا {}\n",
        request.subjects.join("، "),
        request.start_date,
        request.end_date
    );
    if let Some(grade) = request.grade.as_deref().filter(|g| !g.trim().is_empty()) {
        user_message.push_str(&format!("پایه تحصیلی: {}\n", grade.trim()));
    }
    if let Some(name) = request
        .student_name
        .as_deref()
        .filter(|n| !n.trim().is_empty())
    {
        user_message.push_str(&format!("نام دانش‌آموز: {}\n", name.trim()));
    }

    let study_plan = gateway.complete(SYSTEM_PROMPT, &user_message).await?;

    Ok(Json(StudyPlannerResponse { study_plan }))
}
