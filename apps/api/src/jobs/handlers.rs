//! HTTP handlers for the jobs API.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::AppError;
use crate::jobs::extract::extract_job_posting;
use crate::jobs::search::ClientJob;
use crate::jobs::store::{self, NewAppliedJob};
use crate::models::job::{AppliedJobRow, JobPosting, LocationType};
use crate::state::AppState;

/// Query used for the unauthenticated teaser feed.
const TEASER_QUERY: &str = "software developer";

#[derive(Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub query: Option<String>,
    #[serde(default)]
    pub page: Option<u32>,
}

#[derive(Serialize)]
pub struct SearchResponse {
    pub count: usize,
    pub jobs: Vec<ClientJob>,
    pub has_more: bool,
}

impl SearchResponse {
    fn new(jobs: Vec<ClientJob>) -> Self {
        Self {
            count: jobs.len(),
            // A full client page suggests another page is worth fetching.
            has_more: jobs.len() == 6,
            jobs,
        }
    }
}

/// GET /api/v1/jobs
pub async fn handle_search_jobs(
    State(state): State<AppState>,
    Query(params): Query<SearchQuery>,
) -> Result<Json<SearchResponse>, AppError> {
    let query = params
        .query
        .as_deref()
        .map(str::trim)
        .filter(|q| !q.is_empty())
        .unwrap_or(TEASER_QUERY);
    let page = params.page.unwrap_or(1).max(1);

    let jobs = state.jobs.search(query, page).await?;
    Ok(Json(SearchResponse::new(jobs)))
}

/// GET /api/v1/jobs/teaser
pub async fn handle_teaser_jobs(
    State(state): State<AppState>,
) -> Result<Json<SearchResponse>, AppError> {
    let jobs = state.jobs.search(TEASER_QUERY, 1).await?;
    Ok(Json(SearchResponse::new(jobs)))
}

#[derive(Deserialize)]
pub struct ExtractJobRequest {
    pub url: String,
}

/// POST /api/v1/jobs/extract
pub async fn handle_extract_job(
    State(state): State<AppState>,
    Json(req): Json<ExtractJobRequest>,
) -> Result<Json<JobPosting>, AppError> {
    let url = req.url.trim();
    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(AppError::Validation(
            "url must be an absolute http(s) URL".to_string(),
        ));
    }

    let posting = extract_job_posting(state.renderer.as_ref(), &state.llm, url).await?;
    Ok(Json(posting))
}

#[derive(Deserialize)]
pub struct SaveAppliedJobRequest {
    pub user_id: Uuid,
    pub title: String,
    pub company: String,
    #[serde(default = "default_location_type")]
    pub location_type: LocationType,
    pub source: String,
}

fn default_location_type() -> LocationType {
    LocationType::Unknown
}

#[derive(Serialize)]
pub struct SaveAppliedJobResponse {
    pub message: String,
    pub job_id: Uuid,
}

/// POST /api/v1/jobs/applied
pub async fn handle_save_applied_job(
    State(state): State<AppState>,
    Json(req): Json<SaveAppliedJobRequest>,
) -> Result<(StatusCode, Json<SaveAppliedJobResponse>), AppError> {
    let title = req.title.trim();
    let company = req.company.trim();
    if title.len() < 2 || company.len() < 2 {
        return Err(AppError::Validation(
            "title and company are required".to_string(),
        ));
    }

    let row = store::save_applied_job(
        &state.db,
        NewAppliedJob {
            user_id: req.user_id,
            title,
            company,
            location_type: req.location_type,
            source: req.source.trim(),
        },
    )
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(SaveAppliedJobResponse {
            message: "Job saved successfully".to_string(),
            job_id: row.id,
        }),
    ))
}

#[derive(Deserialize)]
pub struct UserIdQuery {
    pub user_id: Uuid,
}

#[derive(Serialize)]
pub struct AppliedJobsResponse {
    pub message: String,
    pub jobs: Vec<AppliedJobRow>,
}

/// GET /api/v1/jobs/applied
pub async fn handle_list_applied_jobs(
    State(state): State<AppState>,
    Query(params): Query<UserIdQuery>,
) -> Result<Json<AppliedJobsResponse>, AppError> {
    let jobs = store::list_applied_jobs(&state.db, params.user_id).await?;
    Ok(Json(AppliedJobsResponse {
        message: "Jobs fetched successfully".to_string(),
        jobs,
    }))
}
