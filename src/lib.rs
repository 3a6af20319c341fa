//! Personalized repository recommendations for a code-hosting platform.
//!
//! The interesting part is the recommendation-delivery and
//! crawl-freshness controller: deciding when a user's crawled data is
//! stale enough to re-crawl (and at which depth), paginating a
//! pre-ranked candidate list with an over-fetch window that absorbs
//! filter losses, and rejecting duplicate page requests per session.
//! The HTTP layer, user/repo storage, and star toggling around it are
//! plumbing.

use std::sync::Arc;

pub mod config;
pub mod error;
pub mod handlers;
pub mod models;
pub mod services;

pub use config::Config;
pub use error::AppError;

pub use models::{
    ActionStatus, CacheKind, CrawlDepth, RecsQuery, RefreshOutcome, RefreshRequest, Repo,
    RepoActionStatus, RepoCard, Session, Staleness, User, UserCrawlState,
};

pub use services::{
    filter_ranked, is_fresh, paginate, plan_refresh, window_bounds, CrawlStateStore, DedupGuard,
    Exclusions, FilterPipeline, HttpPlatformClient, PageWindow, PagerError, PgCrawlStateStore,
    PlatformClient, PlatformError, RankingError, RankingOracle, RecommendationPager, RefreshError,
    RefreshPlan, RefreshService, SessionService, SocialError, SocialRankingOracle, SocialService,
    UserService,
};

/// Application state shared across handlers
pub struct AppState {
    pub db: sqlx::PgPool,
    pub config: Config,
    pub dedup: DedupGuard,
    pub oracle: Arc<dyn RankingOracle>,
    pub platform: Arc<dyn PlatformClient>,
}
