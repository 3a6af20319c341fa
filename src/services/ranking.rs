//! Ranking oracle
//!
//! Produces the full ranked candidate list for a user. The ranking model
//! itself is opaque to the pagination core: callers get an ordered
//! sequence of repo ids, recomputed per call, with no pagination built in.

use async_trait::async_trait;
use sqlx::PgPool;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RankingError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Source of per-user ranked candidate lists
#[async_trait]
pub trait RankingOracle: Send + Sync {
    /// Full ranked list of candidate repo ids for a user, best first
    async fn get_repo_suggestions(&self, user_id: i64) -> Result<Vec<i64>, RankingError>;
}

/// Collaborative ranking over the crawled star graph.
///
/// Candidates are repos starred by the user's co-stargazers (accounts
/// that share at least one starred repo with the user), ordered by how
/// many such peers starred them. Ties break on repo id for a stable
/// order across calls.
#[derive(Debug, Clone)]
pub struct SocialRankingOracle {
    pool: PgPool,
}

impl SocialRankingOracle {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RankingOracle for SocialRankingOracle {
    async fn get_repo_suggestions(&self, user_id: i64) -> Result<Vec<i64>, RankingError> {
        let ids: Vec<i64> = sqlx::query_scalar(
            r#"
            SELECT peer_stars.repo_id
            FROM stars mine
            JOIN stars shared
                ON shared.repo_id = mine.repo_id AND shared.user_id <> mine.user_id
            JOIN stars peer_stars
                ON peer_stars.user_id = shared.user_id
            WHERE mine.user_id = $1
            GROUP BY peer_stars.repo_id
            ORDER BY COUNT(DISTINCT shared.user_id) DESC, peer_stars.repo_id
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(ids)
    }
}
