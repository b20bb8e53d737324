//! HTTP handlers for the resume API.

use axum::{
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    Json,
};
use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::errors::AppError;
use crate::extract::{self, document, MediaType};
use crate::models::resume::{ResumeContent, ResumeRow, ResumeSummaryRow, TailoredResult};
use crate::resume::identity::resolve_title;
use crate::resume::pipeline;
use crate::resume::store::{self, NewResume};
use crate::resume::validate::validate_resume;
use crate::state::AppState;

/// Minimum length for a meaningful target job description.
const MIN_JOB_DESCRIPTION_LEN: usize = 50;

#[derive(Deserialize)]
pub struct UserIdQuery {
    pub user_id: Uuid,
}

#[derive(Serialize)]
pub struct ResumeCreatedResponse {
    pub message: String,
    pub resume: ResumeCreatedSummary,
}

#[derive(Serialize)]
pub struct ResumeCreatedSummary {
    pub id: Uuid,
    pub title: String,
    pub original_file_name: Option<String>,
    pub parsed_name: String,
    pub created_at: DateTime<Utc>,
}

impl ResumeCreatedResponse {
    fn from_row(row: ResumeRow) -> Self {
        let parsed_name = row
            .content
            .pointer("/personalInfo/fullName")
            .and_then(Value::as_str)
            .unwrap_or("Not detected")
            .to_string();
        Self {
            message: "Resume uploaded and parsed successfully".to_string(),
            resume: ResumeCreatedSummary {
                id: row.id,
                title: row.title,
                original_file_name: row.original_file_name,
                parsed_name,
                created_at: row.created_at,
            },
        }
    }
}

/// One uploaded document plus its companion form fields.
struct UploadForm {
    data: Bytes,
    mime_type: String,
    file_name: Option<String>,
    title: Option<String>,
    user_id: Option<Uuid>,
    job_description: Option<String>,
}

async fn read_upload_form(mut multipart: Multipart) -> Result<UploadForm, AppError> {
    let mut file: Option<(Bytes, String, Option<String>)> = None;
    let mut title = None;
    let mut user_id = None;
    let mut job_description = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("invalid multipart payload: {e}")))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "resume" => {
                let mime_type = field.content_type().unwrap_or_default().to_string();
                let file_name = field.file_name().map(str::to_string);
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::Validation(format!("unreadable resume file: {e}")))?;
                file = Some((data, mime_type, file_name));
            }
            "title" => {
                title = Some(read_text_field(field).await?);
            }
            "user_id" => {
                let raw = read_text_field(field).await?;
                user_id = Some(raw.trim().parse::<Uuid>().map_err(|_| {
                    AppError::Validation("user_id must be a valid UUID".to_string())
                })?);
            }
            "job_description" => {
                job_description = Some(read_text_field(field).await?);
            }
            _ => {}
        }
    }

    let (data, mime_type, file_name) =
        file.ok_or_else(|| AppError::Validation("Resume file is required".to_string()))?;

    Ok(UploadForm {
        data,
        mime_type,
        file_name,
        title,
        user_id,
        job_description,
    })
}

async fn read_text_field(field: axum::extract::multipart::Field<'_>) -> Result<String, AppError> {
    field
        .text()
        .await
        .map_err(|e| AppError::Validation(format!("invalid multipart field: {e}")))
}

/// POST /api/v1/resumes
///
/// Full ingestion pipeline: decode → minimum-length gate → model parse →
/// validate → resolve title → persist.
pub async fn handle_upload_resume(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<(StatusCode, Json<ResumeCreatedResponse>), AppError> {
    let form = read_upload_form(multipart).await?;
    let user_id = form
        .user_id
        .ok_or_else(|| AppError::Validation("user_id is required".to_string()))?;
    let title = form
        .title
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| AppError::Validation("Resume title is required".to_string()))?;

    let media_type = MediaType::from_mime(&form.mime_type)?;
    let raw_text = document::extract_text(media_type, &form.data)?;
    let raw_text = extract::require_min_len(raw_text, extract::MIN_PARSE_TEXT_LEN)?;

    let content = pipeline::parse_resume(&state.llm, &raw_text).await?;
    let final_title = resolve_title(&state.db, user_id, title).await?;

    let content_value = serde_json::to_value(&content).map_err(|e| AppError::Internal(e.into()))?;
    let row = store::insert_resume(
        &state.db,
        NewResume {
            user_id,
            title: &final_title,
            original_file_name: form.file_name.as_deref(),
            mime_type: Some(media_type.as_mime()),
            content: &content_value,
        },
    )
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(ResumeCreatedResponse::from_row(row)),
    ))
}

#[derive(Deserialize)]
pub struct SaveTailoredRequest {
    pub user_id: Uuid,
    pub title: String,
    pub content: Value,
}

#[derive(Serialize)]
pub struct SaveTailoredResponse {
    pub message: String,
    pub resume_id: Uuid,
}

/// POST /api/v1/resumes/tailored
///
/// Persists a client-supplied tailored document as a new sibling record.
/// The content is validated like model output: the client is no more
/// trusted than the model.
pub async fn handle_save_tailored(
    State(state): State<AppState>,
    Json(req): Json<SaveTailoredRequest>,
) -> Result<(StatusCode, Json<SaveTailoredResponse>), AppError> {
    let title = req.title.trim();
    if title.is_empty() {
        return Err(AppError::Validation("Resume title is required".to_string()));
    }

    let content = validate_resume(req.content)?;
    let final_title = resolve_title(&state.db, req.user_id, title).await?;

    let content_value = serde_json::to_value(&content).map_err(|e| AppError::Internal(e.into()))?;
    let row = store::insert_resume(
        &state.db,
        NewResume {
            user_id: req.user_id,
            title: &final_title,
            original_file_name: None,
            mime_type: None,
            content: &content_value,
        },
    )
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(SaveTailoredResponse {
            message: "Tailored resume saved successfully".to_string(),
            resume_id: row.id,
        }),
    ))
}

#[derive(Serialize)]
pub struct ResumeListResponse {
    pub message: String,
    pub resumes: Vec<ResumeSummaryRow>,
}

/// GET /api/v1/resumes
pub async fn handle_list_resumes(
    State(state): State<AppState>,
    Query(params): Query<UserIdQuery>,
) -> Result<Json<ResumeListResponse>, AppError> {
    let resumes = store::list_resumes(&state.db, params.user_id).await?;
    Ok(Json(ResumeListResponse {
        message: "Resumes fetched successfully".to_string(),
        resumes,
    }))
}

/// GET /api/v1/resumes/:id
pub async fn handle_get_resume(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(params): Query<UserIdQuery>,
) -> Result<Json<ResumeRow>, AppError> {
    store::find_resume(&state.db, params.user_id, id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Resume {id} not found")))
}

#[derive(Deserialize)]
pub struct ReplaceResumeRequest {
    pub user_id: Uuid,
    pub title: String,
    pub content: Value,
}

#[derive(Serialize)]
pub struct ReplaceResumeResponse {
    pub message: String,
    pub resume_id: Uuid,
}

/// PUT /api/v1/resumes/:id
///
/// Explicit replace operation: the full payload (title + content) is
/// required together; partial updates are not a thing.
pub async fn handle_replace_resume(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<ReplaceResumeRequest>,
) -> Result<Json<ReplaceResumeResponse>, AppError> {
    let title = req.title.trim();
    if title.is_empty() {
        return Err(AppError::Validation(
            "Full resume payload (title + content) is required".to_string(),
        ));
    }

    let content = validate_resume(req.content)?;
    let content_value = serde_json::to_value(&content).map_err(|e| AppError::Internal(e.into()))?;

    let row = store::replace_resume(&state.db, req.user_id, id, title, &content_value)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Resume {id} not found")))?;

    Ok(Json(ReplaceResumeResponse {
        message: "Resume replaced successfully".to_string(),
        resume_id: row.id,
    }))
}

#[derive(Serialize)]
pub struct DeleteResumeResponse {
    pub message: String,
    pub deleted_resume_id: Uuid,
}

/// DELETE /api/v1/resumes/:id
pub async fn handle_delete_resume(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(params): Query<UserIdQuery>,
) -> Result<Json<DeleteResumeResponse>, AppError> {
    let deleted = store::delete_resume(&state.db, params.user_id, id).await?;
    if !deleted {
        return Err(AppError::NotFound(format!("Resume {id} not found")));
    }
    Ok(Json(DeleteResumeResponse {
        message: "Resume deleted successfully".to_string(),
        deleted_resume_id: id,
    }))
}

#[derive(Deserialize)]
pub struct TailorRequest {
    pub user_id: Uuid,
    pub resume_title: String,
    pub job_description: String,
    #[serde(default)]
    pub target_title: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TailorPreview {
    pub original_resume_id: Uuid,
    pub target_title: String,
    #[serde(flatten)]
    pub result: TailoredResult,
}

#[derive(Serialize)]
pub struct TailorResponse {
    pub message: String,
    pub preview: TailorPreview,
}

/// POST /api/v1/resumes/tailor
///
/// Rewrites a stored document against a target job description and returns
/// a diff-tracked preview. The source document is never mutated; persisting
/// the preview is a separate, explicit call.
pub async fn handle_tailor_resume(
    State(state): State<AppState>,
    Json(req): Json<TailorRequest>,
) -> Result<Json<TailorResponse>, AppError> {
    let resume_title = req.resume_title.trim();
    if resume_title.is_empty() {
        return Err(AppError::Validation("resume_title is required".to_string()));
    }
    let job_description = req.job_description.trim();
    if job_description.len() < MIN_JOB_DESCRIPTION_LEN {
        return Err(AppError::Validation(format!(
            "Meaningful job description required (min {MIN_JOB_DESCRIPTION_LEN} chars)"
        )));
    }

    let row = store::find_resume_by_title(&state.db, req.user_id, resume_title)
        .await?
        .ok_or_else(|| AppError::NotFound("Original resume not found".to_string()))?;

    let original: ResumeContent = serde_json::from_value(row.content)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("stored resume is corrupt: {e}")))?;

    let result = pipeline::tailor_with_changes(&state.llm, &original, job_description).await?;

    let target_title = req
        .target_title
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| format!("Tailored - {resume_title}"));

    Ok(Json(TailorResponse {
        message: "Tailored resume preview with changes generated".to_string(),
        preview: TailorPreview {
            original_resume_id: row.id,
            target_title,
            result,
        },
    }))
}

/// POST /api/v1/resumes/tailor/upload
///
/// One-shot tailoring of an un-persisted document: decode the upload, gate
/// the text, and run the plain tailor task (empty change log).
pub async fn handle_tailor_upload(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<TailoredResult>, AppError> {
    let form = read_upload_form(multipart).await?;
    let job_description = form
        .job_description
        .as_deref()
        .map(str::trim)
        .filter(|j| !j.is_empty())
        .ok_or_else(|| AppError::Validation("job_description is required".to_string()))?;

    let media_type = MediaType::from_mime(&form.mime_type)?;
    let raw_text = document::extract_text(media_type, &form.data)?;
    let raw_text = extract::require_min_len(raw_text, extract::MIN_TAILOR_TEXT_LEN)?;

    let result = pipeline::tailor_document(&state.llm, &raw_text, job_description).await?;
    Ok(Json(result))
}
