//! Tailoring differ — audits the model's self-declared change log.
//!
//! Preferred path: the tailor-with-changes task instructs the model to emit
//! its own change log, and this module validates every entry against the
//! ChangeRecord invariants. Entries that fail to deserialize or violate an
//! invariant are dropped and logged, never silently kept. Fallback path: the
//! plain tailor task has no log to audit, so the replacement document is
//! accepted as-is with an empty change log. Survivors keep the order the
//! model produced them in; this module never re-sorts.

use serde_json::Value;
use tracing::warn;

use crate::models::resume::ChangeRecord;

/// Produces the final ordered change log for a tailoring result.
pub fn produce_changes(changes_from_model: Option<Vec<Value>>) -> Vec<ChangeRecord> {
    changes_from_model.map(audit_change_log).unwrap_or_default()
}

/// Deserializes and invariant-checks each entry independently, so one bad
/// entry cannot sink the batch.
pub fn audit_change_log(entries: Vec<Value>) -> Vec<ChangeRecord> {
    entries
        .into_iter()
        .filter_map(|entry| {
            let change: ChangeRecord = match serde_json::from_value(entry) {
                Ok(change) => change,
                Err(e) => {
                    warn!("dropping unparseable change entry: {e}");
                    return None;
                }
            };
            if let Some(violation) = change.invariant_violation() {
                warn!("dropping change entry '{}': {violation}", change.id);
                return None;
            }
            Some(change)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::models::resume::{ChangeSection, ChangeType};

    fn summary_change(id: &str) -> Value {
        json!({
            "id": id,
            "section": "summary",
            "type": "rephrased",
            "experienceIndex": null,
            "bulletIndex": null,
            "original": "Engineer with experience",
            "new": "Platform engineer with 6 years of distributed-systems work",
            "reason": "JD leads with platform engineering"
        })
    }

    #[test]
    fn test_valid_entries_pass_through_in_order() {
        let changes = audit_change_log(vec![
            summary_change("sum-1"),
            json!({
                "id": "skills-add-1",
                "section": "skills",
                "type": "added",
                "original": null,
                "new": "Kubernetes",
                "reason": "JD requires Kubernetes"
            }),
        ]);
        assert_eq!(changes.len(), 2);
        assert_eq!(changes[0].id, "sum-1");
        assert_eq!(changes[1].id, "skills-add-1");
        assert_eq!(changes[1].kind, ChangeType::Added);
    }

    #[test]
    fn test_rephrased_with_null_original_is_dropped_order_preserved() {
        let changes = audit_change_log(vec![
            summary_change("sum-1"),
            json!({
                "id": "bad-1",
                "section": "skills",
                "type": "rephrased",
                "original": null,
                "new": "Node.js (Express)",
                "reason": "JD terminology"
            }),
            json!({
                "id": "exp-0-reorder-1",
                "section": "experience",
                "type": "reordered",
                "experienceIndex": 0,
                "bulletIndex": 2,
                "original": "Maintained CI pipelines",
                "new": "Maintained CI pipelines",
                "reason": "most relevant bullet first"
            }),
        ]);
        assert_eq!(changes.len(), 2);
        assert_eq!(changes[0].id, "sum-1");
        assert_eq!(changes[1].id, "exp-0-reorder-1");
    }

    #[test]
    fn test_unparseable_entry_is_dropped() {
        let changes = audit_change_log(vec![
            json!({"id": "not-a-change"}),
            summary_change("sum-1"),
        ]);
        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].section, ChangeSection::Summary);
    }

    #[test]
    fn test_experience_entry_without_index_is_dropped() {
        let changes = audit_change_log(vec![json!({
            "id": "exp-add-1",
            "section": "experience",
            "type": "added",
            "original": null,
            "new": "Led the migration to event-driven ingestion",
            "reason": "JD mentions event-driven design"
        })]);
        assert!(changes.is_empty());
    }

    #[test]
    fn test_fallback_path_yields_empty_log() {
        assert!(produce_changes(None).is_empty());
    }
}
