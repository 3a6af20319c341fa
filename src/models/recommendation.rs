//! Request and response types for the recommendation and refresh endpoints

use serde::{Deserialize, Serialize};

/// Query parameters for the recommendation endpoint
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RecsQuery {
    /// Page size; falls back to the configured default
    #[serde(default)]
    pub count: Option<i64>,
    /// 1-based page number (default: 1)
    #[serde(default)]
    pub page: Option<i64>,
    /// Target selection by login; takes precedence over `user_id`
    #[serde(default)]
    pub login: Option<String>,
    /// Target selection by id; ignored if absent from the database
    #[serde(default)]
    pub user_id: Option<i64>,
    /// Opaque per-request token for the dedup guard
    #[serde(default)]
    pub code: Option<String>,
}

/// Query parameters for the user lookup endpoint
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserQuery {
    #[serde(default)]
    pub user_id: Option<i64>,
    #[serde(default)]
    pub login: Option<String>,
}

/// Body of a refresh request
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshRequest {
    /// When set, crawl the social graph to depth 2 instead of depth 1
    #[serde(default)]
    pub crawl_further: bool,
}

/// Outcome of a refresh cycle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshOutcome {
    /// True if either the repo refresh or the graph crawl actually ran
    pub updated: bool,
    pub message: String,
}

/// Status object returned by JSON endpoints for non-payload outcomes.
///
/// `Status` is an application-level code, not the HTTP status: 200 success,
/// 204 success with empty-body convention, 400 missing required input,
/// 404 operation could not be completed or request ignored as duplicate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionStatus {
    #[serde(rename = "Status")]
    pub status: i32,
    pub action: String,
    pub message: String,
}

impl ActionStatus {
    pub fn new(status: i32, action: &str, message: impl Into<String>) -> Self {
        Self {
            status,
            action: action.to_string(),
            message: message.into(),
        }
    }
}

/// Status object for star/dislike toggles, which report the repo acted on
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepoActionStatus {
    #[serde(rename = "Status")]
    pub status: i32,
    pub action: String,
    pub repo_id: i64,
}

impl RepoActionStatus {
    pub fn new(status: i32, action: &str, repo_id: i64) -> Self {
        Self {
            status,
            action: action.to_string(),
            repo_id,
        }
    }
}
