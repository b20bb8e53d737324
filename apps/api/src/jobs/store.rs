//! Applied-job log repository.

use sqlx::PgPool;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::job::{AppliedJobRow, LocationType};

pub struct NewAppliedJob<'a> {
    pub user_id: Uuid,
    pub title: &'a str,
    pub company: &'a str,
    pub location_type: LocationType,
    pub source: &'a str,
}

pub async fn save_applied_job(
    pool: &PgPool,
    new: NewAppliedJob<'_>,
) -> Result<AppliedJobRow, AppError> {
    Ok(sqlx::query_as(
        r#"
        INSERT INTO applied_jobs (id, user_id, title, company, location_type, source)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(new.user_id)
    .bind(new.title)
    .bind(new.company)
    .bind(new.location_type.as_str())
    .bind(new.source)
    .fetch_one(pool)
    .await?)
}

pub async fn list_applied_jobs(
    pool: &PgPool,
    user_id: Uuid,
) -> Result<Vec<AppliedJobRow>, AppError> {
    Ok(sqlx::query_as(
        "SELECT * FROM applied_jobs WHERE user_id = $1 ORDER BY created_at DESC",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?)
}
