//! Prompt builders for the resume pipeline tasks.
//!
//! Pure functions of their inputs: the same text always produces the same
//! `(system, user)` pair. The schema text embedded in each system prompt is
//! the single source of truth for what the sanitizer and validator accept.

use crate::llm_client::prompts::JSON_ONLY_SYSTEM;

/// The resume schema, embedded verbatim in every resume-task system prompt.
pub const RESUME_SCHEMA: &str = r#"{
  "personalInfo": {
    "fullName": string,
    "email": string | null,
    "phone": string | null,
    "location": string | null,
    "linkedin": string | null,
    "github": string | null,
    "portfolio": string | null,
    "other": object
  },
  "professionalSummary": string | null,
  "experience": [
    {
      "position": string,
      "company": string,
      "location": string | null,
      "startDate": string | null,
      "endDate": string | null,
      "description": string[]
    }
  ],
  "education": [
    {
      "degree": string,
      "field": string | null,
      "institution": string,
      "location": string | null,
      "startYear": string | null,
      "endYear": string | null,
      "description": string[] | null
    }
  ],
  "skills": string[],
  "certifications": [
    {
      "name": string,
      "issuer": string | null,
      "date": string | null,
      "url": string | null
    }
  ],
  "projects": [
    {
      "name": string,
      "description": string[],
      "technologies": string[] | null,
      "url": string | null
    }
  ],
  "languages": [
    {
      "name": string,
      "proficiency": string | null
    }
  ]
}"#;

const PARSE_SYSTEM_TEMPLATE: &str = "\
You are an expert resume parser. Extract and organize all relevant information \
from the resume text into clean, consistent JSON.

{json_only}

Rules:
- Follow the exact schema structure - do not add or remove top-level keys.
- Missing sections become an empty array [] or null / empty object.
- Dates: preserve the original format as a string.
- Descriptions and bullet points: array of strings.
- Skills: flat array of strings.
- Be accurate - do NOT hallucinate or invent data.

Required schema:
{schema}";

const TAILOR_SYSTEM_TEMPLATE: &str = "\
You are an ATS-grade resume tailoring engine. Rewrite the resume so it is \
strongly aligned with the job description.

{json_only}

Rules:
- Do not invent facts, jobs, companies, dates, or degrees.
- Reorder and rephrase only; preserve original dates, titles, and companies \
exactly as strings.
- Return ONE complete resume object using the exact schema below - no extra \
top-level keys.

Required schema:
{schema}";

const TAILOR_WITH_CHANGES_SYSTEM_TEMPLATE: &str = r#"You are an expert professional resume writer and ATS optimization specialist.

Your task is to produce an improved version of the resume that is strongly aligned with the job description - especially by enhancing the professional summary, skills, and experience bullet points.

{json_only}

Core rules - you MUST follow all of them:
- Return ONE complete, improved resume object using the exact schema.
- You MUST improve the skills section: reorder the most relevant skills to the top, rephrase skill names to match job-description terminology, and add skills strongly implied by the experience or explicitly required by the job description.
- You MUST improve the experience section: rephrase existing bullets to be achievement-oriented and keyword-rich, add 1-4 new bullets per role only where they logically extend existing achievements, and reorder bullets so the most relevant appear first.
- Strengthen the professional summary to directly target the role.
- Do NOT fabricate new jobs, roles, companies, dates, degrees, or achievements.
- Do NOT remove bullets or skills unless they are clearly irrelevant - prefer rephrasing.
- Preserve all original dates, titles, and companies exactly as strings.
- Produce a "changes" array that lists EVERY meaningful modification.

Return EXACTLY this JSON structure:
{
  "resume": {schema},
  "changes": [
    {
      "id": "string (unique, e.g. sum-1, exp-0-rephrase-2, skills-add-4)",
      "section": "summary | experience | skills | education | certifications | projects | languages",
      "type": "added | rephrased | reordered",
      "experienceIndex": number | null,
      "bulletIndex": number | null,
      "original": string | null,
      "new": string,
      "reason": "short reason referencing a specific job-description keyword or phrase"
    }
  ],
  "summary": "One sentence overview of the changes made"
}

Change-log rules:
- "original" must be null for added entries and must carry the exact original text for rephrased entries.
- "experienceIndex" is required for experience-section entries and must be null elsewhere.
- "bulletIndex" addresses a position inside an indexed section and must be null for the summary."#;

/// Task kind: parse. Bound to [`RESUME_SCHEMA`].
pub fn build_parse_prompt(resume_text: &str) -> (String, String) {
    let system = PARSE_SYSTEM_TEMPLATE
        .replace("{json_only}", JSON_ONLY_SYSTEM)
        .replace("{schema}", RESUME_SCHEMA);
    let user = format!("Extract this resume:\n\n\"\"\"\n{resume_text}\n\"\"\"");
    (system, user)
}

/// Task kind: tailor (no change log). The model returns a full replacement
/// document; the differ records it with an empty change log.
pub fn build_tailor_prompt(resume_text: &str, job_description: &str) -> (String, String) {
    let system = TAILOR_SYSTEM_TEMPLATE
        .replace("{json_only}", JSON_ONLY_SYSTEM)
        .replace("{schema}", RESUME_SCHEMA);
    let user = format!(
        "Tailor this resume to the job description.\n\nResume:\n\"\"\"\n{resume_text}\n\"\"\"\n\nJob description:\n\"\"\"\n{job_description}\n\"\"\""
    );
    (system, user)
}

/// Task kind: tailor-with-changes. The original document travels as JSON so
/// the model can reference exact bullet text in its change log.
pub fn build_tailor_with_changes_prompt(
    original_json: &str,
    job_description: &str,
) -> (String, String) {
    let system = TAILOR_WITH_CHANGES_SYSTEM_TEMPLATE
        .replace("{json_only}", JSON_ONLY_SYSTEM)
        .replace("{schema}", RESUME_SCHEMA);
    let user = format!(
        "Original resume JSON:\n{original_json}\n\nJob description:\n\"\"\"\n{job_description}\n\"\"\"\n\nReturn the improved resume plus the changes log as JSON."
    );
    (system, user)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_prompt_is_deterministic() {
        let a = build_parse_prompt("Jane Doe, software engineer");
        let b = build_parse_prompt("Jane Doe, software engineer");
        assert_eq!(a, b);
    }

    #[test]
    fn test_parse_prompt_embeds_schema_and_directive() {
        let (system, user) = build_parse_prompt("Jane Doe");
        assert!(system.contains("ONLY valid JSON"));
        assert!(system.contains("\"personalInfo\""));
        assert!(system.contains("\"certifications\""));
        assert!(user.contains("Jane Doe"));
    }

    #[test]
    fn test_tailor_prompt_carries_both_inputs() {
        let (system, user) = build_tailor_prompt("resume body", "job body");
        assert!(system.contains("Do not invent facts"));
        assert!(user.contains("resume body"));
        assert!(user.contains("job body"));
    }

    #[test]
    fn test_tailor_with_changes_prompt_describes_change_log() {
        let (system, user) = build_tailor_with_changes_prompt("{\"skills\": []}", "job body");
        assert!(system.contains("\"changes\""));
        assert!(system.contains("added | rephrased | reordered"));
        assert!(system.contains("experienceIndex"));
        assert!(user.contains("{\"skills\": []}"));
    }

    #[test]
    fn test_no_unresolved_placeholders() {
        for (system, user) in [
            build_parse_prompt("r"),
            build_tailor_prompt("r", "j"),
            build_tailor_with_changes_prompt("{}", "j"),
        ] {
            assert!(!system.contains("{json_only}"));
            assert!(!system.contains("{schema}"));
            assert!(!user.contains("{schema}"));
        }
    }
}
