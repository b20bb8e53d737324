pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::jobs::handlers as job_handlers;
use crate::resume::handlers as resume_handlers;
use crate::state::AppState;

/// Resume uploads are capped at 10 MiB.
const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Resume API
        .route(
            "/api/v1/resumes",
            post(resume_handlers::handle_upload_resume).get(resume_handlers::handle_list_resumes),
        )
        .route(
            "/api/v1/resumes/tailored",
            post(resume_handlers::handle_save_tailored),
        )
        .route(
            "/api/v1/resumes/tailor",
            post(resume_handlers::handle_tailor_resume),
        )
        .route(
            "/api/v1/resumes/tailor/upload",
            post(resume_handlers::handle_tailor_upload),
        )
        .route(
            "/api/v1/resumes/:id",
            get(resume_handlers::handle_get_resume)
                .put(resume_handlers::handle_replace_resume)
                .delete(resume_handlers::handle_delete_resume),
        )
        // Jobs API
        .route("/api/v1/jobs", get(job_handlers::handle_search_jobs))
        .route("/api/v1/jobs/teaser", get(job_handlers::handle_teaser_jobs))
        .route("/api/v1/jobs/extract", post(job_handlers::handle_extract_job))
        .route(
            "/api/v1/jobs/applied",
            post(job_handlers::handle_save_applied_job).get(job_handlers::handle_list_applied_jobs),
        )
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .with_state(state)
}
