//! Freshness Evaluator
//!
//! Decides whether a user's cached repo data and social-graph crawl are
//! stale relative to a TTL threshold. Everything here is pure over a
//! `UserCrawlState` snapshot; the orchestrator's store does the reads.

use chrono::{DateTime, Utc};

use crate::models::{CacheKind, CrawlDepth, UserCrawlState};

/// True if the given kind of cached data is fresh as of the threshold
/// instant `as_of = now - ttl`.
///
/// Data that has never been crawled is always stale. A depth-2 crawl only
/// extends an existing depth-1 result, so depth 2 is reported stale until
/// depth 1 has completed at least once, regardless of its own timestamp.
pub fn is_fresh(state: &UserCrawlState, kind: CacheKind, as_of: DateTime<Utc>) -> bool {
    match kind {
        CacheKind::Repos => state.repos.is_fresh(as_of),
        CacheKind::Graph(CrawlDepth::Direct) => state.graph_direct.is_fresh(as_of),
        CacheKind::Graph(CrawlDepth::Transitive) => {
            state.graph_direct.has_ever_run() && state.graph_transitive.is_fresh(as_of)
        }
    }
}

/// What a refresh cycle has to do for one user
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefreshPlan {
    /// Repo data is stale; force a repository re-fetch
    pub refresh_repos: bool,
    /// The graph at the requested depth is stale; crawl to this depth
    pub crawl: Option<CrawlDepth>,
}

impl RefreshPlan {
    pub fn is_noop(&self) -> bool {
        !self.refresh_repos && self.crawl.is_none()
    }
}

/// Plan a refresh cycle from a state snapshot.
///
/// Repo refresh is evaluated first; the graph crawl is evaluated at the
/// requested depth only. A depth-1-fresh user can still be depth-2-stale.
pub fn plan_refresh(
    state: &UserCrawlState,
    requested_depth: CrawlDepth,
    as_of: DateTime<Utc>,
) -> RefreshPlan {
    RefreshPlan {
        refresh_repos: !is_fresh(state, CacheKind::Repos, as_of),
        crawl: if is_fresh(state, CacheKind::Graph(requested_depth), as_of) {
            None
        } else {
            Some(requested_depth)
        },
    }
}
