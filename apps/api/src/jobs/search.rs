//! JSearch proxy — paginated pass-through to the third-party search API,
//! with provider rows transformed into the client-facing job shape.

use chrono::{DateTime, Datelike, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::error;

use crate::errors::AppError;
use crate::models::job::LocationType;

const JSEARCH_HOST: &str = "jsearch.p.rapidapi.com";

static VISA_PATTERNS: Lazy<Vec<(Regex, &'static str)>> = Lazy::new(|| {
    vec![
        (Regex::new(r"(?i)h1b|h-1b").expect("visa regex"), "H1B"),
        (Regex::new(r"(?i)green card|gc").expect("visa regex"), "GC"),
        (Regex::new(r"(?i)usc|us citizen").expect("visa regex"), "USC"),
        (Regex::new(r"(?i)opt|stem opt").expect("visa regex"), "OPT"),
    ]
});

// ────────────────────────────────────────────────────────────────────────────
// Provider wire shapes
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct JSearchResponse {
    #[serde(default)]
    data: Vec<JSearchJob>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct JSearchJob {
    pub job_id: String,
    #[serde(default)]
    pub employer_name: Option<String>,
    #[serde(default)]
    pub job_title: Option<String>,
    #[serde(default)]
    pub job_description: Option<String>,
    #[serde(default)]
    pub job_city: Option<String>,
    #[serde(default)]
    pub job_country: Option<String>,
    #[serde(default)]
    pub job_is_remote: bool,
    #[serde(default)]
    pub job_posted_at_datetime_utc: Option<String>,
    #[serde(default)]
    pub job_apply_link: Option<String>,
    #[serde(default)]
    pub job_publisher: Option<String>,
    #[serde(default)]
    pub apply_options: Vec<ApplyOption>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApplyOption {
    #[serde(default)]
    pub publisher: Option<String>,
    #[serde(default)]
    pub apply_link: Option<String>,
}

/// Client-facing job row.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientJob {
    pub id: String,
    pub title: String,
    pub company: String,
    pub posted_time: String,
    pub posted_timestamp: i64,
    pub location_type: LocationType,
    pub visa_status: Vec<String>,
    pub source: String,
    pub apply_url: String,
    pub applied: bool,
}

// ────────────────────────────────────────────────────────────────────────────
// Client
// ────────────────────────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct JobSearchClient {
    client: reqwest::Client,
    api_key: String,
}

impl JobSearchClient {
    pub fn new(api_key: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key,
        }
    }

    /// One provider page of results, newest first.
    pub async fn search(&self, query: &str, page: u32) -> Result<Vec<ClientJob>, AppError> {
        let response = self
            .client
            .get(format!("https://{JSEARCH_HOST}/search"))
            .query(&[
                ("query", query),
                ("page", &page.to_string()),
                ("num_pages", "1"),
                ("date_posted", "3days"),
            ])
            .header("X-RapidAPI-Key", &self.api_key)
            .header("X-RapidAPI-Host", JSEARCH_HOST)
            .send()
            .await
            .map_err(|e| AppError::Upstream(format!("job search request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!("JSearch returned {status}: {body}");
            return Err(AppError::Upstream(format!(
                "job search provider returned status {status}"
            )));
        }

        let parsed: JSearchResponse = response
            .json()
            .await
            .map_err(|e| AppError::Upstream(format!("unreadable job search response: {e}")))?;

        let now = Utc::now();
        let mut jobs: Vec<ClientJob> = parsed
            .data
            .into_iter()
            .map(|raw| transform_job(raw, now))
            .collect();
        jobs.sort_by(|a, b| b.posted_timestamp.cmp(&a.posted_timestamp));
        Ok(jobs)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Row transformation
// ────────────────────────────────────────────────────────────────────────────

/// Maps a provider row to the client shape. `now` is injected so the
/// posted-time humanization is testable.
pub fn transform_job(raw: JSearchJob, now: DateTime<Utc>) -> ClientJob {
    let mut source = "Unknown".to_string();
    let mut apply_url = raw.job_apply_link.clone().unwrap_or_else(|| "#".to_string());

    if let Some(primary) = raw.apply_options.first() {
        if let Some(publisher) = primary.publisher.as_deref().map(str::trim) {
            if !publisher.is_empty() {
                source = publisher.to_string();
            }
        }
        if let Some(link) = primary.apply_link.as_deref() {
            apply_url = link.to_string();
        }
    } else if let Some(publisher) = raw.job_publisher.as_deref() {
        source = publisher.to_string();
    }

    let source = clean_source(&source);

    let posted = raw
        .job_posted_at_datetime_utc
        .as_deref()
        .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or(now);

    ClientJob {
        id: raw.job_id.clone(),
        title: raw
            .job_title
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .unwrap_or("Untitled Position")
            .to_string(),
        company: raw
            .employer_name
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .unwrap_or("Unknown Company")
            .to_string(),
        posted_time: format_posted_time(posted, now),
        posted_timestamp: posted.timestamp_millis(),
        location_type: determine_location_type(&raw),
        visa_status: scan_visa_keywords(raw.job_description.as_deref().unwrap_or_default()),
        source,
        apply_url,
        applied: false,
    }
}

fn clean_source(source: &str) -> String {
    let mut cleaned = source.to_string();
    if let Some(stripped) = cleaned.strip_suffix(" Jobs") {
        cleaned = stripped.to_string();
    }
    cleaned = cleaned
        .replace("Smart Recruiters Jobs", "SmartRecruiters")
        .replace("Jobs by SmartRecruiters", "SmartRecruiters")
        .replace("Talent.com", "Talent");
    cleaned.trim().to_string()
}

fn format_posted_time(posted: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let hours_ago = (now - posted).num_hours();
    if hours_ago < 1 {
        "Just now".to_string()
    } else if hours_ago < 24 {
        let plural = if hours_ago == 1 { "" } else { "s" };
        format!("{hours_ago} hour{plural} ago")
    } else {
        format!("{} {}", posted.format("%b"), posted.day())
    }
}

fn determine_location_type(job: &JSearchJob) -> LocationType {
    if job.job_is_remote {
        LocationType::Remote
    } else if job.job_city.is_some() && job.job_country.is_some() {
        LocationType::Onsite
    } else {
        LocationType::Hybrid
    }
}

fn scan_visa_keywords(description: &str) -> Vec<String> {
    if description.is_empty() {
        return Vec::new();
    }
    VISA_PATTERNS
        .iter()
        .filter(|(pattern, _)| pattern.is_match(description))
        .map(|(_, label)| label.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn raw_job() -> JSearchJob {
        JSearchJob {
            job_id: "abc123".to_string(),
            employer_name: Some("  Ferrous Systems  ".to_string()),
            job_title: Some("Senior Rust Engineer".to_string()),
            job_description: Some("H1B sponsorship available for US citizen peers".to_string()),
            job_city: Some("Berlin".to_string()),
            job_country: Some("DE".to_string()),
            job_is_remote: false,
            job_posted_at_datetime_utc: Some("2026-08-05T09:00:00Z".to_string()),
            job_apply_link: Some("https://example.com/apply".to_string()),
            job_publisher: Some("LinkedIn Jobs".to_string()),
            apply_options: vec![],
        }
    }

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 8, 5, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_transform_trims_and_classifies() {
        let job = transform_job(raw_job(), fixed_now());
        assert_eq!(job.company, "Ferrous Systems");
        assert_eq!(job.location_type, LocationType::Onsite);
        assert_eq!(job.source, "LinkedIn");
        assert_eq!(job.posted_time, "3 hours ago");
        assert!(!job.applied);
    }

    #[test]
    fn test_remote_flag_wins_over_city() {
        let mut raw = raw_job();
        raw.job_is_remote = true;
        assert_eq!(
            transform_job(raw, fixed_now()).location_type,
            LocationType::Remote
        );
    }

    #[test]
    fn test_no_city_means_hybrid() {
        let mut raw = raw_job();
        raw.job_city = None;
        assert_eq!(
            transform_job(raw, fixed_now()).location_type,
            LocationType::Hybrid
        );
    }

    #[test]
    fn test_apply_option_overrides_publisher_and_link() {
        let mut raw = raw_job();
        raw.apply_options = vec![ApplyOption {
            publisher: Some("Jobs by SmartRecruiters".to_string()),
            apply_link: Some("https://sr.example.com/apply".to_string()),
        }];
        let job = transform_job(raw, fixed_now());
        assert_eq!(job.source, "SmartRecruiters");
        assert_eq!(job.apply_url, "https://sr.example.com/apply");
    }

    #[test]
    fn test_posted_time_same_hour_is_just_now() {
        let mut raw = raw_job();
        raw.job_posted_at_datetime_utc = Some("2026-08-05T11:40:00Z".to_string());
        assert_eq!(transform_job(raw, fixed_now()).posted_time, "Just now");
    }

    #[test]
    fn test_posted_time_older_than_a_day_is_a_date() {
        let mut raw = raw_job();
        raw.job_posted_at_datetime_utc = Some("2026-07-30T09:00:00Z".to_string());
        assert_eq!(transform_job(raw, fixed_now()).posted_time, "Jul 30");
    }

    #[test]
    fn test_missing_fields_get_placeholders() {
        let raw = JSearchJob {
            job_id: "x".to_string(),
            employer_name: None,
            job_title: Some("   ".to_string()),
            job_description: None,
            job_city: None,
            job_country: None,
            job_is_remote: false,
            job_posted_at_datetime_utc: None,
            job_apply_link: None,
            job_publisher: None,
            apply_options: vec![],
        };
        let job = transform_job(raw, fixed_now());
        assert_eq!(job.title, "Untitled Position");
        assert_eq!(job.company, "Unknown Company");
        assert_eq!(job.apply_url, "#");
        assert_eq!(job.source, "Unknown");
        assert!(job.visa_status.is_empty());
    }

    #[test]
    fn test_visa_keyword_scan() {
        let visas = scan_visa_keywords("We sponsor H-1B and STEM OPT; green card track.");
        assert_eq!(visas, vec!["H1B", "GC", "OPT"]);
    }
}
