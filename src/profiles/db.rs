/**
 * Profiles Database Operations
 *
 * Profile rows are created together with the user row (see
 * `auth::users::create_user`); this module only reads and edits them.
 * The points and exams_completed columns are written exclusively by
 * the exam submission transaction.
 */

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::PgPool;
use uuid::Uuid;

/// A user's profile
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Profile {
    pub user_id: Uuid,
    pub full_name: String,
    pub grade: Option<String>,
    pub field_of_study: Option<String>,
    pub points: i32,
    pub exams_completed: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Site-wide usage counters for the admin dashboard
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct SiteStats {
    pub total_users: i64,
    pub total_exams: i64,
    pub total_messages: i64,
    pub total_page_views: i64,
}

pub async fn get_profile(pool: &PgPool, user_id: Uuid) -> Result<Option<Profile>, sqlx::Error> {
    sqlx::query_as::<_, Profile>(
        "SELECT user_id, full_name, grade, field_of_study, points,
                exams_completed, created_at, updated_at
         FROM profiles WHERE user_id = $1",
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await
}

/// Update the editable profile fields.
///
/// Points and the exam counter are deliberately absent from this
/// statement.
pub async fn update_profile(
    pool: &PgPool,
    user_id: Uuid,
    full_name: &str,
    grade: Option<&str>,
    field_of_study: Option<&str>,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "UPDATE profiles
         SET full_name = $2, grade = $3, field_of_study = $4, updated_at = NOW()
         WHERE user_id = $1",
    )
    .bind(user_id)
    .bind(full_name)
    .bind(grade)
    .bind(field_of_study)
    .execute(pool)
    .await?;

    Ok(())
}

/// Record one page view. The user is optional: anonymous views count
/// too.
pub async fn insert_page_view(
    pool: &PgPool,
    user_id: Option<Uuid>,
    page: &str,
) -> Result<(), sqlx::Error> {
    sqlx::query("INSERT INTO page_views (id, user_id, page) VALUES ($1, $2, $3)")
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(page)
        .execute(pool)
        .await?;

    Ok(())
}

/// Whether a user holds the admin role
pub async fn is_admin(pool: &PgPool, user_id: Uuid) -> Result<bool, sqlx::Error> {
    let row: (bool,) = sqlx::query_as(
        "SELECT EXISTS (
             SELECT 1 FROM user_roles WHERE user_id = $1 AND role = 'admin'
         )",
    )
    .bind(user_id)
    .fetch_one(pool)
    .await?;

    Ok(row.0)
}

pub async fn site_stats(pool: &PgPool) -> Result<SiteStats, sqlx::Error> {
    sqlx::query_as::<_, SiteStats>(
        "SELECT
             (SELECT COUNT(*) FROM users) AS total_users,
             (SELECT COUNT(*) FROM exams) AS total_exams,
             (SELECT (SELECT COUNT(*) FROM channel_messages)
                   + (SELECT COUNT(*) FROM group_messages)
                   + (SELECT COUNT(*) FROM direct_messages)) AS total_messages,
             (SELECT COUNT(*) FROM page_views) AS total_page_views",
    )
    .fetch_one(pool)
    .await
}
