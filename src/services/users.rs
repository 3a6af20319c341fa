//! User lookup

use sqlx::PgPool;

use crate::models::{Repo, User};

#[derive(Debug, Clone)]
pub struct UserService {
    pool: PgPool,
}

impl UserService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, user_id: i64) -> Result<Option<User>, sqlx::Error> {
        sqlx::query_as(
            r#"
            SELECT user_id, login, last_crawled_repos_at,
                   last_crawled_graph_d1_at, last_crawled_graph_d2_at, created_at
            FROM users
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
    }

    /// Find by login, falling back to a case-insensitive match
    pub async fn find_by_login(&self, login: &str) -> Result<Option<User>, sqlx::Error> {
        let exact: Option<User> = sqlx::query_as(
            r#"
            SELECT user_id, login, last_crawled_repos_at,
                   last_crawled_graph_d1_at, last_crawled_graph_d2_at, created_at
            FROM users
            WHERE login = $1
            "#,
        )
        .bind(login)
        .fetch_optional(&self.pool)
        .await?;

        if exact.is_some() {
            return Ok(exact);
        }

        sqlx::query_as(
            r#"
            SELECT user_id, login, last_crawled_repos_at,
                   last_crawled_graph_d1_at, last_crawled_graph_d2_at, created_at
            FROM users
            WHERE login ILIKE $1
            "#,
        )
        .bind(login)
        .fetch_optional(&self.pool)
        .await
    }

    pub async fn exists(&self, user_id: i64) -> Result<bool, sqlx::Error> {
        let found: Option<i64> = sqlx::query_scalar("SELECT user_id FROM users WHERE user_id = $1")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(found.is_some())
    }

    pub async fn owned_repos(&self, user_id: i64) -> Result<Vec<Repo>, sqlx::Error> {
        sqlx::query_as(
            r#"
            SELECT repo_id, owner_id, name, description, language, star_count, created_at
            FROM repos
            WHERE owner_id = $1
            ORDER BY star_count DESC, repo_id
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
    }
}
