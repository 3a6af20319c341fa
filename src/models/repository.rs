//! Repository model and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Repository entity
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Repo {
    pub repo_id: i64,
    pub owner_id: i64,
    pub name: String,
    pub description: Option<String>,
    pub language: Option<String>,
    pub star_count: i32,
    pub created_at: DateTime<Utc>,
}

/// Repository record as served to clients on the recommendation endpoint
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RepoCard {
    pub id: i64,
    pub name: String,
    pub owner: String,
    pub description: Option<String>,
    pub language: Option<String>,
    pub stars: i32,
}
