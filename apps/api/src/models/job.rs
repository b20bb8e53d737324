//! Job-posting shapes: the extraction output and the applied-job log.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Structured job posting extracted from a scraped page. All four fields
/// must be non-empty after validation; the validator enforces that.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobPosting {
    #[serde(default)]
    pub job_title: String,
    #[serde(default)]
    pub company: String,
    #[serde(default)]
    pub job_description: String,
    #[serde(default)]
    pub required_skills: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LocationType {
    Remote,
    Hybrid,
    Onsite,
    Unknown,
}

impl LocationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            LocationType::Remote => "Remote",
            LocationType::Hybrid => "Hybrid",
            LocationType::Onsite => "Onsite",
            LocationType::Unknown => "Unknown",
        }
    }
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct AppliedJobRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub company: String,
    pub location_type: String,
    pub source: String,
    pub created_at: DateTime<Utc>,
}
