//! Prompt builder for the extract-job task.

use crate::llm_client::prompts::JSON_ONLY_SYSTEM;

const EXTRACT_JOB_SYSTEM_TEMPLATE: &str = "\
You extract structured job posting data from scraped page text.

{json_only}

Return EXACTLY this JSON structure:
{
  \"jobTitle\": string,
  \"company\": string,
  \"jobDescription\": string,
  \"requiredSkills\": string[]
}

Rules:
- requiredSkills: hard skills only.
- jobDescription: the full posting text, cleaned of navigation noise.
- Do NOT invent data that is not present in the page text.";

/// Task kind: extract-job. Pure function of the scraped page text.
pub fn build_extract_job_prompt(page_text: &str) -> (String, String) {
    let system = EXTRACT_JOB_SYSTEM_TEMPLATE.replace("{json_only}", JSON_ONLY_SYSTEM);
    let user = format!("Job posting:\n\"\"\"\n{page_text}\n\"\"\"");
    (system, user)
}
