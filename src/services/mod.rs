pub mod dedup;
pub mod filter;
pub mod freshness;
pub mod pager;
pub mod platform;
pub mod ranking;
pub mod refresh;
pub mod session;
pub mod social;
pub mod users;

pub use dedup::DedupGuard;
pub use filter::{filter_ranked, Exclusions, FilterPipeline};
pub use freshness::{is_fresh, plan_refresh, RefreshPlan};
pub use pager::{paginate, window_bounds, PageWindow, PagerError, RecommendationPager};
pub use platform::{HttpPlatformClient, PlatformClient, PlatformError};
pub use ranking::{RankingError, RankingOracle, SocialRankingOracle};
pub use refresh::{CrawlStateStore, PgCrawlStateStore, RefreshError, RefreshService};
pub use session::SessionService;
pub use social::{SocialError, SocialService};
pub use users::UserService;
