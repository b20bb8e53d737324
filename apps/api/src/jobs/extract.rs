//! Job-posting extraction: rendered page → stripped text → extract-job task
//! → validated JobPosting.

use thiserror::Error;

use crate::errors::AppError;
use crate::extract::page::{extract_page_text, PageRenderer};
use crate::jobs::prompts::build_extract_job_prompt;
use crate::llm_client::sanitize::extract_json_object;
use crate::llm_client::{CallOptions, LlmClient};
use crate::models::job::JobPosting;

#[derive(Debug, Error)]
pub enum JobValidateError {
    #[error("model output is not a JSON object")]
    NotAnObject,

    #[error("job posting does not match the target schema: {0}")]
    Shape(#[source] serde_json::Error),

    #[error("job posting has an empty {0}")]
    EmptyField(&'static str),
}

impl From<JobValidateError> for AppError {
    fn from(err: JobValidateError) -> Self {
        AppError::UnprocessableEntity(err.to_string())
    }
}

/// All four fields must be non-empty after validation; a posting whose
/// description came back empty means the page had no usable content.
pub fn validate_job_posting(value: serde_json::Value) -> Result<JobPosting, JobValidateError> {
    if !value.is_object() {
        return Err(JobValidateError::NotAnObject);
    }
    let posting: JobPosting = serde_json::from_value(value).map_err(JobValidateError::Shape)?;

    if posting.job_title.trim().is_empty() {
        return Err(JobValidateError::EmptyField("jobTitle"));
    }
    if posting.company.trim().is_empty() {
        return Err(JobValidateError::EmptyField("company"));
    }
    if posting.job_description.trim().is_empty() {
        return Err(JobValidateError::EmptyField("jobDescription"));
    }
    if posting.required_skills.iter().all(|s| s.trim().is_empty()) {
        return Err(JobValidateError::EmptyField("requiredSkills"));
    }

    Ok(posting)
}

/// Full extract-job pipeline for a posting URL.
pub async fn extract_job_posting(
    renderer: &dyn PageRenderer,
    llm: &LlmClient,
    url: &str,
) -> Result<JobPosting, AppError> {
    let page_text = extract_page_text(renderer, url).await?;
    let (system, user) = build_extract_job_prompt(&page_text);
    let completion = llm
        .complete(&system, &user, &CallOptions::extract_job())
        .await?;
    let value = extract_json_object(&completion)?;
    Ok(validate_job_posting(value)?)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_complete_posting_passes() {
        let posting = validate_job_posting(json!({
            "jobTitle": "Senior Rust Engineer",
            "company": "Ferrous Systems",
            "jobDescription": "Build compiler tooling.",
            "requiredSkills": ["Rust", "LLVM"]
        }))
        .unwrap();
        assert_eq!(posting.required_skills.len(), 2);
    }

    #[test]
    fn test_empty_description_fails_extraction() {
        let err = validate_job_posting(json!({
            "jobTitle": "Senior Rust Engineer",
            "company": "Ferrous Systems",
            "jobDescription": "   ",
            "requiredSkills": ["Rust"]
        }))
        .unwrap_err();
        assert!(matches!(err, JobValidateError::EmptyField("jobDescription")));
    }

    #[test]
    fn test_missing_fields_fail_as_empty() {
        let err = validate_job_posting(json!({"jobTitle": "SRE"})).unwrap_err();
        assert!(matches!(err, JobValidateError::EmptyField("company")));
    }

    #[test]
    fn test_non_object_rejected() {
        assert!(matches!(
            validate_job_posting(json!("a string")),
            Err(JobValidateError::NotAnObject)
        ));
    }
}
