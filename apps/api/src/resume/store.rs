//! Resume repository. All queries are scoped by the caller-supplied user
//! identity; UNIQUE(user_id, title) at the storage layer is the
//! authoritative backstop behind the identity resolver's pre-check.

use serde_json::Value;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::resume::{ResumeRow, ResumeSummaryRow};

/// Parameters for inserting a new resume record. `file_url` is always NULL:
/// object storage is an external concern this deployment stubs out.
pub struct NewResume<'a> {
    pub user_id: Uuid,
    pub title: &'a str,
    pub original_file_name: Option<&'a str>,
    pub mime_type: Option<&'a str>,
    pub content: &'a Value,
}

pub async fn insert_resume(pool: &PgPool, new: NewResume<'_>) -> Result<ResumeRow, AppError> {
    let row: ResumeRow = sqlx::query_as(
        r#"
        INSERT INTO resumes (id, user_id, title, original_file_name, mime_type, content)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(new.user_id)
    .bind(new.title)
    .bind(new.original_file_name)
    .bind(new.mime_type)
    .bind(new.content)
    .fetch_one(pool)
    .await
    .map_err(|e| map_unique_violation(e, new.title))?;

    info!("Inserted resume '{}' for user {}", row.title, row.user_id);
    Ok(row)
}

pub async fn title_exists(pool: &PgPool, user_id: Uuid, title: &str) -> Result<bool, sqlx::Error> {
    sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM resumes WHERE user_id = $1 AND title = $2)")
        .bind(user_id)
        .bind(title)
        .fetch_one(pool)
        .await
}

pub async fn list_resumes(
    pool: &PgPool,
    user_id: Uuid,
) -> Result<Vec<ResumeSummaryRow>, AppError> {
    Ok(sqlx::query_as(
        r#"
        SELECT id, title, original_file_name, created_at
        FROM resumes
        WHERE user_id = $1
        ORDER BY created_at DESC
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?)
}

pub async fn find_resume(
    pool: &PgPool,
    user_id: Uuid,
    id: Uuid,
) -> Result<Option<ResumeRow>, AppError> {
    Ok(
        sqlx::query_as("SELECT * FROM resumes WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .fetch_optional(pool)
            .await?,
    )
}

pub async fn find_resume_by_title(
    pool: &PgPool,
    user_id: Uuid,
    title: &str,
) -> Result<Option<ResumeRow>, AppError> {
    Ok(
        sqlx::query_as("SELECT * FROM resumes WHERE user_id = $1 AND title = $2")
            .bind(user_id)
            .bind(title)
            .fetch_optional(pool)
            .await?,
    )
}

/// Explicit replace: title and content move together, never separately.
pub async fn replace_resume(
    pool: &PgPool,
    user_id: Uuid,
    id: Uuid,
    title: &str,
    content: &Value,
) -> Result<Option<ResumeRow>, AppError> {
    sqlx::query_as(
        r#"
        UPDATE resumes
        SET title = $1, content = $2, updated_at = NOW()
        WHERE id = $3 AND user_id = $4
        RETURNING *
        "#,
    )
    .bind(title)
    .bind(content)
    .bind(id)
    .bind(user_id)
    .fetch_optional(pool)
    .await
    .map_err(|e| map_unique_violation(e, title))
}

pub async fn delete_resume(pool: &PgPool, user_id: Uuid, id: Uuid) -> Result<bool, AppError> {
    let result = sqlx::query("DELETE FROM resumes WHERE id = $1 AND user_id = $2")
        .bind(id)
        .bind(user_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

fn map_unique_violation(e: sqlx::Error, title: &str) -> AppError {
    if let sqlx::Error::Database(db) = &e {
        if matches!(db.kind(), sqlx::error::ErrorKind::UniqueViolation) {
            return AppError::Conflict(format!(
                "a resume titled '{title}' already exists for this user"
            ));
        }
    }
    AppError::Database(e)
}
