//! Canonical structured-resume shape and the tailoring change log.
//!
//! The wire format is camelCase because it doubles as the JSON schema the
//! model is instructed to emit. Every array field deserializes to an empty
//! vector and every nullable scalar to `None` when absent, so downstream
//! consumers can assume total field presence.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonalInfo {
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub linkedin: Option<String>,
    #[serde(default)]
    pub github: Option<String>,
    #[serde(default)]
    pub portfolio: Option<String>,
    /// Open mapping for headers the schema has no slot for (e.g. a visa line).
    #[serde(default)]
    pub other: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExperienceEntry {
    pub position: String,
    pub company: String,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub end_date: Option<String>,
    #[serde(default)]
    pub description: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EducationEntry {
    pub degree: String,
    pub institution: String,
    #[serde(default)]
    pub field: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub start_year: Option<String>,
    #[serde(default)]
    pub end_year: Option<String>,
    #[serde(default)]
    pub description: Option<Vec<String>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Certification {
    pub name: String,
    #[serde(default)]
    pub issuer: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub name: String,
    #[serde(default)]
    pub description: Vec<String>,
    #[serde(default)]
    pub technologies: Option<Vec<String>>,
    #[serde(default)]
    pub url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Language {
    pub name: String,
    #[serde(default)]
    pub proficiency: Option<String>,
}

/// The canonical parsed resume. Created once per successful ingestion and
/// immutable once persisted, except through an explicit replace or a
/// tailoring operation that writes a new sibling record.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResumeContent {
    #[serde(default)]
    pub personal_info: PersonalInfo,
    #[serde(default)]
    pub professional_summary: Option<String>,
    #[serde(default)]
    pub experience: Vec<ExperienceEntry>,
    #[serde(default)]
    pub education: Vec<EducationEntry>,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub certifications: Vec<Certification>,
    #[serde(default)]
    pub projects: Vec<Project>,
    #[serde(default)]
    pub languages: Vec<Language>,
}

impl ResumeContent {
    /// The usefulness gate: a structurally valid document with no name, no
    /// experience and no skills came from unparseable source text, not a
    /// real resume.
    pub fn has_useful_data(&self) -> bool {
        let has_name = self
            .personal_info
            .full_name
            .as_deref()
            .is_some_and(|n| !n.trim().is_empty());
        has_name || !self.experience.is_empty() || !self.skills.is_empty()
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tailoring change log
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeSection {
    #[serde(alias = "professionalSummary")]
    Summary,
    Experience,
    Skills,
    Education,
    Certifications,
    Projects,
    Languages,
}

impl ChangeSection {
    /// Sections addressable by index. Only these may carry `bulletIndex`.
    pub fn is_indexed(&self) -> bool {
        !matches!(self, ChangeSection::Summary)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeType {
    Added,
    Rephrased,
    Reordered,
}

/// One atomic edit from a tailoring pass, with provenance.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeRecord {
    pub id: String,
    pub section: ChangeSection,
    #[serde(rename = "type")]
    pub kind: ChangeType,
    #[serde(default)]
    pub experience_index: Option<u32>,
    #[serde(default)]
    pub bullet_index: Option<u32>,
    /// None for additions; must be present for rephrasings.
    #[serde(default)]
    pub original: Option<String>,
    pub new: String,
    /// Short justification referencing the target job text.
    pub reason: String,
}

impl ChangeRecord {
    /// Returns the first violated invariant, if any. Violating entries are
    /// dropped from the change log, never kept.
    pub fn invariant_violation(&self) -> Option<&'static str> {
        if self.kind == ChangeType::Rephrased && self.original.is_none() {
            return Some("rephrased entry has no original text");
        }
        if self.section == ChangeSection::Experience && self.experience_index.is_none() {
            return Some("experience entry has no experienceIndex");
        }
        if self.section != ChangeSection::Experience && self.experience_index.is_some() {
            return Some("experienceIndex on a non-experience section");
        }
        if self.bullet_index.is_some() && !self.section.is_indexed() {
            return Some("bulletIndex on a non-indexable section");
        }
        None
    }
}

/// A tailoring preview: the rewritten document plus its audited change log.
#[derive(Debug, Clone, Serialize)]
pub struct TailoredResult {
    pub resume: ResumeContent,
    pub changes: Vec<ChangeRecord>,
    pub summary: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Storage rows
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct ResumeRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub original_file_name: Option<String>,
    pub mime_type: Option<String>,
    /// Reserved for object storage; always NULL in this deployment.
    pub file_url: Option<String>,
    pub content: serde_json::Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct ResumeSummaryRow {
    pub id: Uuid,
    pub title: String,
    pub original_file_name: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arrays_default_to_empty_when_absent() {
        let json = r#"{"personalInfo": {"fullName": "Ada Lovelace"}}"#;
        let resume: ResumeContent = serde_json::from_str(json).unwrap();
        assert!(resume.experience.is_empty());
        assert!(resume.education.is_empty());
        assert!(resume.skills.is_empty());
        assert!(resume.certifications.is_empty());
        assert!(resume.projects.is_empty());
        assert!(resume.languages.is_empty());
    }

    #[test]
    fn test_nullable_scalars_default_to_none() {
        let resume: ResumeContent = serde_json::from_str("{}").unwrap();
        assert!(resume.personal_info.full_name.is_none());
        assert!(resume.personal_info.email.is_none());
        assert!(resume.professional_summary.is_none());
    }

    #[test]
    fn test_serialization_always_emits_array_fields() {
        let resume = ResumeContent::default();
        let value = serde_json::to_value(&resume).unwrap();
        for key in [
            "experience",
            "education",
            "skills",
            "certifications",
            "projects",
            "languages",
        ] {
            assert!(value.get(key).is_some_and(|v| v.is_array()), "missing {key}");
        }
        assert!(value.get("professionalSummary").is_some_and(|v| v.is_null()));
    }

    #[test]
    fn test_useful_data_with_only_skills() {
        let resume: ResumeContent = serde_json::from_str(r#"{"skills": ["Go"]}"#).unwrap();
        assert!(resume.has_useful_data());
    }

    #[test]
    fn test_useless_when_name_blank_and_sections_empty() {
        let resume: ResumeContent =
            serde_json::from_str(r#"{"personalInfo": {"fullName": "  "}}"#).unwrap();
        assert!(!resume.has_useful_data());
    }

    #[test]
    fn test_change_record_wire_format() {
        let json = r#"{
            "id": "exp-0-rephrase-2",
            "section": "experience",
            "type": "rephrased",
            "experienceIndex": 0,
            "bulletIndex": 2,
            "original": "Worked on backend",
            "new": "Built event-driven backend services in Go",
            "reason": "JD asks for Go microservices"
        }"#;
        let change: ChangeRecord = serde_json::from_str(json).unwrap();
        assert_eq!(change.section, ChangeSection::Experience);
        assert_eq!(change.kind, ChangeType::Rephrased);
        assert_eq!(change.experience_index, Some(0));
        assert!(change.invariant_violation().is_none());
    }

    #[test]
    fn test_change_section_accepts_professional_summary_alias() {
        let section: ChangeSection = serde_json::from_str(r#""professionalSummary""#).unwrap();
        assert_eq!(section, ChangeSection::Summary);
    }

    #[test]
    fn test_rephrased_without_original_violates_invariant() {
        let change = ChangeRecord {
            id: "sum-1".into(),
            section: ChangeSection::Summary,
            kind: ChangeType::Rephrased,
            experience_index: None,
            bullet_index: None,
            original: None,
            new: "Seasoned platform engineer".into(),
            reason: "JD emphasizes platform work".into(),
        };
        assert!(change.invariant_violation().is_some());
    }

    #[test]
    fn test_bullet_index_on_summary_violates_invariant() {
        let change = ChangeRecord {
            id: "sum-1".into(),
            section: ChangeSection::Summary,
            kind: ChangeType::Added,
            experience_index: None,
            bullet_index: Some(0),
            original: None,
            new: "text".into(),
            reason: "r".into(),
        };
        assert!(change.invariant_violation().is_some());
    }

    #[test]
    fn test_experience_without_index_violates_invariant() {
        let change = ChangeRecord {
            id: "exp-add".into(),
            section: ChangeSection::Experience,
            kind: ChangeType::Added,
            experience_index: None,
            bullet_index: None,
            original: None,
            new: "Shipped the billing service".into(),
            reason: "r".into(),
        };
        assert!(change.invariant_violation().is_some());
    }
}
