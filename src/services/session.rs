//! Session store access
//!
//! Sessions are created by the OAuth login flow; this service only reads
//! and (for login/logout plumbing) writes rows. The dedup guard's slot is
//! deliberately not persisted here: it is in-process state keyed by
//! session id.

use sqlx::PgPool;
use uuid::Uuid;

use crate::models::Session;

#[derive(Debug, Clone)]
pub struct SessionService {
    pool: PgPool,
}

impl SessionService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Look up a session by id
    pub async fn load(&self, session_id: Uuid) -> Result<Option<Session>, sqlx::Error> {
        sqlx::query_as(
            r#"
            SELECT session_id, user_id, access_token, oauth_state, created_at
            FROM sessions
            WHERE session_id = $1
            "#,
        )
        .bind(session_id)
        .fetch_optional(&self.pool)
        .await
    }

    /// Create a session for a logged-in user
    pub async fn create(
        &self,
        user_id: i64,
        access_token: Option<&str>,
    ) -> Result<Session, sqlx::Error> {
        sqlx::query_as(
            r#"
            INSERT INTO sessions (session_id, user_id, access_token, created_at)
            VALUES ($1, $2, $3, NOW())
            RETURNING session_id, user_id, access_token, oauth_state, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(access_token)
        .fetch_one(&self.pool)
        .await
    }

    /// Delete a session (logout)
    pub async fn delete(&self, session_id: Uuid) -> Result<(), sqlx::Error> {
        sqlx::query("DELETE FROM sessions WHERE session_id = $1")
            .bind(session_id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
