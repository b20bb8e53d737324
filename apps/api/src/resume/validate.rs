//! Schema validation for parsed model output.
//!
//! The model's output has no enforced type system before it lands here, so
//! every response is treated as untrusted input: unknown top-level keys are
//! a hard failure (never silently dropped), wrong scalar types are rejected
//! rather than coerced, and absent array/nullable fields are filled with
//! schema-conformant defaults by the typed deserialization.

use serde_json::Value;
use thiserror::Error;

use crate::models::resume::ResumeContent;

/// Top-level keys the resume schema admits.
const RESUME_KEYS: &[&str] = &[
    "personalInfo",
    "professionalSummary",
    "experience",
    "education",
    "skills",
    "certifications",
    "projects",
    "languages",
];

/// Top-level keys of a tailoring result.
const TAILORED_KEYS: &[&str] = &["resume", "changes", "summary"];

#[derive(Debug, Error)]
pub enum ValidateError {
    #[error("model output is not a JSON object")]
    NotAnObject,

    #[error("model output has unexpected top-level keys: {0:?}")]
    UnexpectedKeys(Vec<String>),

    #[error("model output is missing required key '{0}'")]
    MissingKey(&'static str),

    #[error("model output does not match the target schema: {0}")]
    Shape(#[source] serde_json::Error),

    #[error("no usable resume data could be extracted")]
    EmptyExtraction,
}

fn reject_unknown_keys(value: &Value, allowed: &[&str]) -> Result<(), ValidateError> {
    let obj = value.as_object().ok_or(ValidateError::NotAnObject)?;
    let unexpected: Vec<String> = obj
        .keys()
        .filter(|k| !allowed.contains(&k.as_str()))
        .cloned()
        .collect();
    if unexpected.is_empty() {
        Ok(())
    } else {
        Err(ValidateError::UnexpectedKeys(unexpected))
    }
}

/// Validates a parsed object against the resume schema and applies the
/// usefulness gate.
pub fn validate_resume(value: Value) -> Result<ResumeContent, ValidateError> {
    reject_unknown_keys(&value, RESUME_KEYS)?;
    let resume: ResumeContent = serde_json::from_value(value).map_err(ValidateError::Shape)?;
    if !resume.has_useful_data() {
        return Err(ValidateError::EmptyExtraction);
    }
    Ok(resume)
}

/// A tailoring response split into its validated parts. Change entries stay
/// raw here; the differ audits them individually so one bad entry cannot
/// sink the batch.
#[derive(Debug)]
pub struct TailoredDraft {
    pub resume: ResumeContent,
    pub raw_changes: Vec<Value>,
    pub summary: String,
}

/// Validates the `{resume, changes, summary}` envelope of a
/// tailor-with-changes response.
pub fn validate_tailored(value: Value) -> Result<TailoredDraft, ValidateError> {
    reject_unknown_keys(&value, TAILORED_KEYS)?;
    let mut obj = match value {
        Value::Object(map) => map,
        _ => return Err(ValidateError::NotAnObject),
    };

    let resume_value = obj.remove("resume").ok_or(ValidateError::MissingKey("resume"))?;
    let resume = validate_resume(resume_value)?;

    let raw_changes = match obj.remove("changes") {
        None | Some(Value::Null) => Vec::new(),
        Some(other) => serde_json::from_value(other).map_err(ValidateError::Shape)?,
    };

    let summary = obj
        .remove("summary")
        .and_then(|v| v.as_str().map(str::to_string))
        .unwrap_or_else(|| "AI improvements applied".to_string());

    Ok(TailoredDraft {
        resume,
        raw_changes,
        summary,
    })
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_missing_arrays_default_to_empty() {
        let resume = validate_resume(json!({
            "personalInfo": {"fullName": "Ada Lovelace"},
            "experience": [
                {"position": "Analyst", "company": "Babbage Ltd", "description": []}
            ]
        }))
        .unwrap();
        assert!(resume.skills.is_empty());
        assert!(resume.certifications.is_empty());
        assert!(resume.languages.is_empty());
        assert!(resume.professional_summary.is_none());
    }

    #[test]
    fn test_unknown_top_level_key_is_rejected() {
        let err = validate_resume(json!({
            "personalInfo": {"fullName": "Ada"},
            "hobbies": ["chess"]
        }))
        .unwrap_err();
        match err {
            ValidateError::UnexpectedKeys(keys) => assert_eq!(keys, vec!["hobbies"]),
            other => panic!("expected UnexpectedKeys, got {other:?}"),
        }
    }

    #[test]
    fn test_wrong_scalar_type_is_rejected_not_coerced() {
        let err = validate_resume(json!({
            "personalInfo": {"fullName": 42},
            "skills": ["Rust"]
        }))
        .unwrap_err();
        assert!(matches!(err, ValidateError::Shape(_)));
    }

    #[test]
    fn test_usefulness_gate_rejects_empty_documents() {
        let err = validate_resume(json!({
            "personalInfo": {"fullName": null},
            "experience": [],
            "skills": []
        }))
        .unwrap_err();
        assert!(matches!(err, ValidateError::EmptyExtraction));
    }

    #[test]
    fn test_usefulness_gate_passes_on_skills_alone() {
        let resume = validate_resume(json!({"skills": ["Go"]})).unwrap();
        assert_eq!(resume.skills, vec!["Go"]);
    }

    #[test]
    fn test_non_object_is_rejected() {
        assert!(matches!(
            validate_resume(json!(["a", "b"])),
            Err(ValidateError::NotAnObject)
        ));
    }

    #[test]
    fn test_tailored_envelope_happy_path() {
        let draft = validate_tailored(json!({
            "resume": {"skills": ["Rust"]},
            "changes": [{"id": "s-1"}],
            "summary": "Reordered skills"
        }))
        .unwrap();
        assert_eq!(draft.resume.skills, vec!["Rust"]);
        assert_eq!(draft.raw_changes.len(), 1);
        assert_eq!(draft.summary, "Reordered skills");
    }

    #[test]
    fn test_tailored_envelope_defaults_missing_changes_and_summary() {
        let draft = validate_tailored(json!({"resume": {"skills": ["Rust"]}})).unwrap();
        assert!(draft.raw_changes.is_empty());
        assert_eq!(draft.summary, "AI improvements applied");
    }

    #[test]
    fn test_tailored_envelope_rejects_extra_keys() {
        let err = validate_tailored(json!({
            "resume": {"skills": ["Rust"]},
            "coverLetter": {"opening": "Dear team"}
        }))
        .unwrap_err();
        assert!(matches!(err, ValidateError::UnexpectedKeys(_)));
    }

    #[test]
    fn test_tailored_envelope_requires_resume() {
        let err = validate_tailored(json!({"changes": []})).unwrap_err();
        assert!(matches!(err, ValidateError::MissingKey("resume")));
    }
}
