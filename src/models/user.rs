//! User model and crawl-freshness types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;

/// How many social-graph hops from the target user a crawl traverses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CrawlDepth {
    /// The user's immediate social edges
    Direct,
    /// Edges of the user's direct edges as well
    Transitive,
}

impl CrawlDepth {
    pub fn hops(self) -> u8 {
        match self {
            Self::Direct => 1,
            Self::Transitive => 2,
        }
    }
}

impl fmt::Display for CrawlDepth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.hops())
    }
}

/// When a piece of cached data was last refreshed.
///
/// Absence of a recorded crawl is a distinct state, not a null timestamp:
/// `Never` is stale for every possible TTL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Staleness {
    /// The operation has never completed for this user
    Never,
    /// The operation last completed at this instant
    At(DateTime<Utc>),
}

impl Staleness {
    /// True if the recorded instant is more recent than `as_of`
    pub fn is_fresh(self, as_of: DateTime<Utc>) -> bool {
        match self {
            Self::Never => false,
            Self::At(t) => t > as_of,
        }
    }

    pub fn has_ever_run(self) -> bool {
        matches!(self, Self::At(_))
    }
}

impl From<Option<DateTime<Utc>>> for Staleness {
    fn from(value: Option<DateTime<Utc>>) -> Self {
        match value {
            Some(t) => Self::At(t),
            None => Self::Never,
        }
    }
}

/// The kind of cached per-user data being freshness-checked
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheKind {
    /// The user's owned/starred repository records
    Repos,
    /// The user's social graph, crawled to the given depth
    Graph(CrawlDepth),
}

/// User entity
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub user_id: i64,
    pub login: String,
    pub last_crawled_repos_at: Option<DateTime<Utc>>,
    pub last_crawled_graph_d1_at: Option<DateTime<Utc>>,
    pub last_crawled_graph_d2_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// Snapshot of a user's crawl timestamps, read once per refresh request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UserCrawlState {
    pub repos: Staleness,
    pub graph_direct: Staleness,
    pub graph_transitive: Staleness,
}

impl UserCrawlState {
    pub fn from_user(user: &User) -> Self {
        Self {
            repos: user.last_crawled_repos_at.into(),
            graph_direct: user.last_crawled_graph_d1_at.into(),
            graph_transitive: user.last_crawled_graph_d2_at.into(),
        }
    }
}
