//! Identity resolver — per-user title uniqueness with suffix disambiguation.
//!
//! Check-then-use is inherently racy under concurrent requests for the same
//! user and title; this resolver is a best-effort pre-check that reduces
//! collision probability. The authoritative guarantee is the storage-level
//! UNIQUE(user_id, title) constraint, surfaced as a conflict at write time.

use async_trait::async_trait;
use sqlx::PgPool;
use thiserror::Error;
use uuid::Uuid;

use crate::resume::store;

/// Attempt ceiling: the desired title plus " (2)" through " (10)".
pub const MAX_TITLE_ATTEMPTS: u32 = 10;

#[derive(Debug, Error)]
pub enum TitleError {
    #[error("no free title found for '{title}' after {attempts} attempts")]
    Exhausted { title: String, attempts: u32 },

    #[error(transparent)]
    Lookup(#[from] anyhow::Error),
}

/// Lookup collaborator for title existence. Implemented by the Postgres pool
/// in production and by in-memory sets in tests.
#[async_trait]
pub trait TitleLookup: Send + Sync {
    async fn title_exists(&self, user_id: Uuid, title: &str) -> anyhow::Result<bool>;
}

#[async_trait]
impl TitleLookup for PgPool {
    async fn title_exists(&self, user_id: Uuid, title: &str) -> anyhow::Result<bool> {
        Ok(store::title_exists(self, user_id, title).await?)
    }
}

/// Returns the desired title unchanged when free, otherwise the first free
/// numbered variant; fails rather than looping indefinitely.
pub async fn resolve_title(
    lookup: &dyn TitleLookup,
    user_id: Uuid,
    desired: &str,
) -> Result<String, TitleError> {
    let desired = desired.trim();

    for attempt in 1..=MAX_TITLE_ATTEMPTS {
        let candidate = if attempt == 1 {
            desired.to_string()
        } else {
            format!("{desired} ({attempt})")
        };
        if !lookup.title_exists(user_id, &candidate).await? {
            return Ok(candidate);
        }
    }

    Err(TitleError::Exhausted {
        title: desired.to_string(),
        attempts: MAX_TITLE_ATTEMPTS,
    })
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    struct FixedTitles(HashSet<String>);

    impl FixedTitles {
        fn new(titles: &[&str]) -> Self {
            Self(titles.iter().map(|t| t.to_string()).collect())
        }
    }

    #[async_trait]
    impl TitleLookup for FixedTitles {
        async fn title_exists(&self, _user_id: Uuid, title: &str) -> anyhow::Result<bool> {
            Ok(self.0.contains(title))
        }
    }

    #[tokio::test]
    async fn test_unused_title_returned_unchanged() {
        let lookup = FixedTitles::new(&[]);
        let title = resolve_title(&lookup, Uuid::new_v4(), "Resume").await.unwrap();
        assert_eq!(title, "Resume");
    }

    #[tokio::test]
    async fn test_first_free_suffix_is_chosen() {
        let lookup = FixedTitles::new(&["Resume", "Resume (2)"]);
        let title = resolve_title(&lookup, Uuid::new_v4(), "Resume").await.unwrap();
        assert_eq!(title, "Resume (3)");
    }

    #[tokio::test]
    async fn test_desired_title_is_trimmed() {
        let lookup = FixedTitles::new(&["Resume"]);
        let title = resolve_title(&lookup, Uuid::new_v4(), "  Resume  ").await.unwrap();
        assert_eq!(title, "Resume (2)");
    }

    #[tokio::test]
    async fn test_exhaustion_after_ten_collisions() {
        let mut titles = vec!["Resume".to_string()];
        titles.extend((2..=10).map(|n| format!("Resume ({n})")));
        let lookup = FixedTitles(titles.into_iter().collect());

        let err = resolve_title(&lookup, Uuid::new_v4(), "Resume").await.unwrap_err();
        assert!(matches!(
            err,
            TitleError::Exhausted { attempts: 10, .. }
        ));
    }
}
