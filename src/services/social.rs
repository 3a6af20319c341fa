//! Star and dislike edge toggling
//!
//! Thin write path for the user's own reactions. The recommendation
//! filter reads these edges, so a star added here drops the repo from
//! the user's next page.

use sqlx::PgPool;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SocialError {
    #[error("Repository not found: {0}")]
    RepoNotFound(i64),

    #[error("User {0} has not starred repository {1}")]
    NoExistingStar(i64, i64),

    #[error("User {0} has not disliked repository {1}")]
    NoExistingDislike(i64, i64),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

#[derive(Debug, Clone)]
pub struct SocialService {
    pool: PgPool,
}

impl SocialService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn repo_exists(&self, repo_id: i64) -> Result<bool, sqlx::Error> {
        let found: Option<i64> = sqlx::query_scalar("SELECT repo_id FROM repos WHERE repo_id = $1")
            .bind(repo_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(found.is_some())
    }

    pub async fn add_star(&self, repo_id: i64, user_id: i64) -> Result<(), SocialError> {
        if !self.repo_exists(repo_id).await? {
            return Err(SocialError::RepoNotFound(repo_id));
        }

        let mut tx = self.pool.begin().await?;

        let inserted = sqlx::query(
            r#"
            INSERT INTO stars (user_id, repo_id, created_at)
            VALUES ($1, $2, NOW())
            ON CONFLICT (user_id, repo_id) DO NOTHING
            "#,
        )
        .bind(user_id)
        .bind(repo_id)
        .execute(&mut *tx)
        .await?;

        // Re-starring is a no-op; only count the first edge.
        if inserted.rows_affected() > 0 {
            sqlx::query("UPDATE repos SET star_count = star_count + 1 WHERE repo_id = $1")
                .bind(repo_id)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;
        Ok(())
    }

    pub async fn remove_star(&self, repo_id: i64, user_id: i64) -> Result<(), SocialError> {
        if !self.repo_exists(repo_id).await? {
            return Err(SocialError::RepoNotFound(repo_id));
        }

        let mut tx = self.pool.begin().await?;

        let deleted = sqlx::query("DELETE FROM stars WHERE user_id = $1 AND repo_id = $2")
            .bind(user_id)
            .bind(repo_id)
            .execute(&mut *tx)
            .await?;

        if deleted.rows_affected() == 0 {
            return Err(SocialError::NoExistingStar(user_id, repo_id));
        }

        sqlx::query("UPDATE repos SET star_count = GREATEST(star_count - 1, 0) WHERE repo_id = $1")
            .bind(repo_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(())
    }

    pub async fn add_dislike(&self, repo_id: i64, user_id: i64) -> Result<(), SocialError> {
        if !self.repo_exists(repo_id).await? {
            return Err(SocialError::RepoNotFound(repo_id));
        }

        sqlx::query(
            r#"
            INSERT INTO dislikes (user_id, repo_id, created_at)
            VALUES ($1, $2, NOW())
            ON CONFLICT (user_id, repo_id) DO NOTHING
            "#,
        )
        .bind(user_id)
        .bind(repo_id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub async fn remove_dislike(&self, repo_id: i64, user_id: i64) -> Result<(), SocialError> {
        let deleted = sqlx::query("DELETE FROM dislikes WHERE user_id = $1 AND repo_id = $2")
            .bind(user_id)
            .bind(repo_id)
            .execute(&self.pool)
            .await?;

        if deleted.rows_affected() == 0 {
            return Err(SocialError::NoExistingDislike(user_id, repo_id));
        }

        Ok(())
    }
}
