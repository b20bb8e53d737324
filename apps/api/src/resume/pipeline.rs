//! Resume pipeline — composes the model-facing stages.
//!
//! Flow: prompt build → model invoke → sanitize → validate → (differ, for
//! tailoring). Each stage strictly depends on the prior stage's output, so
//! the chain is sequential; extraction, identity resolution and persistence
//! live with the handlers.
//!
//! Failures here are terminal for the invocation: there is no automatic
//! re-prompt on malformed output.

use tracing::info;

use crate::errors::AppError;
use crate::llm_client::sanitize::extract_json_object;
use crate::llm_client::{CallOptions, LlmClient};
use crate::models::resume::{ResumeContent, TailoredResult};
use crate::resume::prompts;
use crate::resume::tailoring::produce_changes;
use crate::resume::validate::{validate_resume, validate_tailored};

/// Task kind: parse. Extracted resume text to a validated document.
pub async fn parse_resume(llm: &LlmClient, raw_text: &str) -> Result<ResumeContent, AppError> {
    let (system, user) = prompts::build_parse_prompt(raw_text);
    let completion = llm
        .complete(&system, &user, &CallOptions::parse_resume())
        .await?;
    let value = extract_json_object(&completion)?;
    let resume = validate_resume(value)?;
    info!(
        "parsed resume: name={:?}, {} experience entries, {} skills",
        resume.personal_info.full_name,
        resume.experience.len(),
        resume.skills.len()
    );
    Ok(resume)
}

/// Task kind: tailor-with-changes. Rewrites a stored document against a job
/// description and audits the model's change log.
pub async fn tailor_with_changes(
    llm: &LlmClient,
    original: &ResumeContent,
    job_description: &str,
) -> Result<TailoredResult, AppError> {
    let original_json =
        serde_json::to_string_pretty(original).map_err(|e| AppError::Internal(e.into()))?;
    let (system, user) = prompts::build_tailor_with_changes_prompt(&original_json, job_description);
    let completion = llm
        .complete(&system, &user, &CallOptions::tailor_with_changes())
        .await?;
    let value = extract_json_object(&completion)?;
    let draft = validate_tailored(value)?;

    let declared = draft.raw_changes.len();
    let changes = produce_changes(Some(draft.raw_changes));
    info!(
        "tailoring produced {} change entries ({} declared by model)",
        changes.len(),
        declared
    );

    Ok(TailoredResult {
        resume: draft.resume,
        changes,
        summary: draft.summary,
    })
}

/// Task kind: tailor (one-shot, no change log). The model returns a full
/// replacement document which is accepted as-is with an empty change log.
pub async fn tailor_document(
    llm: &LlmClient,
    resume_text: &str,
    job_description: &str,
) -> Result<TailoredResult, AppError> {
    let (system, user) = prompts::build_tailor_prompt(resume_text, job_description);
    let completion = llm.complete(&system, &user, &CallOptions::tailor()).await?;
    let value = extract_json_object(&completion)?;
    let resume = validate_resume(value)?;

    Ok(TailoredResult {
        resume,
        changes: produce_changes(None),
        summary: "Tailored resume generated".to_string(),
    })
}
