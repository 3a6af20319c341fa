//! Session model
//!
//! A session row is created at login and holds the authenticated user
//! plus the OAuth artifacts the platform's token exchange needs across
//! redirects.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Authenticated client session
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Session {
    pub session_id: Uuid,
    pub user_id: i64,
    pub access_token: Option<String>,
    pub oauth_state: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Request body for POST /auth/login
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub user_id: i64,
}

/// Response body for POST /auth/login
#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    pub session_id: Uuid,
    pub user_id: i64,
}
