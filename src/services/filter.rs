//! Filter Pipeline
//!
//! Removes ineligible candidates from an over-fetched window before the
//! pager truncates it: repos the user has already starred and repos the
//! user owns. Order-preserving and idempotent. The database is read once
//! per request into an exclusion snapshot; the filtering itself is pure.

use sqlx::PgPool;
use std::collections::HashSet;

/// Snapshot of the repo ids excluded for one user
#[derive(Debug, Clone, Default)]
pub struct Exclusions {
    starred: HashSet<i64>,
    owned: HashSet<i64>,
}

impl Exclusions {
    pub fn new(starred: HashSet<i64>, owned: HashSet<i64>) -> Self {
        Self { starred, owned }
    }

    pub fn excludes(&self, repo_id: i64) -> bool {
        self.starred.contains(&repo_id) || self.owned.contains(&repo_id)
    }
}

/// Drop excluded repo ids, preserving input order
pub fn filter_ranked(repo_ids: &[i64], exclusions: &Exclusions) -> Vec<i64> {
    repo_ids
        .iter()
        .copied()
        .filter(|id| !exclusions.excludes(*id))
        .collect()
}

/// Database-backed exclusion loader
#[derive(Debug, Clone)]
pub struct FilterPipeline {
    pool: PgPool,
}

impl FilterPipeline {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Load the exclusion sets for a user
    pub async fn load_exclusions(&self, user_id: i64) -> Result<Exclusions, sqlx::Error> {
        let starred: Vec<i64> =
            sqlx::query_scalar("SELECT repo_id FROM stars WHERE user_id = $1")
                .bind(user_id)
                .fetch_all(&self.pool)
                .await?;

        let owned: Vec<i64> =
            sqlx::query_scalar("SELECT repo_id FROM repos WHERE owner_id = $1")
                .bind(user_id)
                .fetch_all(&self.pool)
                .await?;

        Ok(Exclusions::new(
            starred.into_iter().collect(),
            owned.into_iter().collect(),
        ))
    }

    /// Remove repos already starred by or owned by `user_id`
    pub async fn filter(&self, repo_ids: &[i64], user_id: i64) -> Result<Vec<i64>, sqlx::Error> {
        let exclusions = self.load_exclusions(user_id).await?;
        Ok(filter_ranked(repo_ids, &exclusions))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn exclusions(starred: &[i64], owned: &[i64]) -> Exclusions {
        Exclusions::new(
            starred.iter().copied().collect(),
            owned.iter().copied().collect(),
        )
    }

    #[test]
    fn test_removes_starred_and_owned() {
        let ex = exclusions(&[2, 5], &[3]);
        let out = filter_ranked(&[1, 2, 3, 4, 5, 6], &ex);
        assert_eq!(out, vec![1, 4, 6]);
    }

    #[test]
    fn test_preserves_order() {
        let ex = exclusions(&[30], &[]);
        let out = filter_ranked(&[50, 10, 30, 40, 20], &ex);
        assert_eq!(out, vec![50, 10, 40, 20]);
    }

    #[test]
    fn test_idempotent() {
        let ex = exclusions(&[1, 2], &[3]);
        let once = filter_ranked(&[1, 2, 3, 4, 5], &ex);
        let twice = filter_ranked(&once, &ex);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_empty_exclusions_keep_everything() {
        let ex = exclusions(&[], &[]);
        let out = filter_ranked(&[7, 8, 9], &ex);
        assert_eq!(out, vec![7, 8, 9]);
    }

    #[test]
    fn test_empty_input() {
        let ex = exclusions(&[1], &[2]);
        assert!(filter_ranked(&[], &ex).is_empty());
    }
}
