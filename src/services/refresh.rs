//! Crawl Orchestrator
//!
//! Runs the per-user refresh cycle: repository re-fetch first, then the
//! social-graph crawl at the requested depth, each only when the
//! freshness evaluator reports it stale. Staleness timestamps advance
//! only after the corresponding platform call succeeds; a failed call
//! leaves the timestamp untouched so the next eligible request retries.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Instant;
use thiserror::Error;
use tracing::{debug, info};

use crate::models::{CrawlDepth, RefreshOutcome, User, UserCrawlState};
use crate::services::freshness::plan_refresh;
use crate::services::platform::{PlatformClient, PlatformError};

#[derive(Debug, Error)]
pub enum RefreshError {
    #[error("User not found: {0}")]
    UserNotFound(i64),

    #[error("Refresh failed: {0}")]
    Platform(#[from] PlatformError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Storage of per-user crawl timestamps
#[async_trait]
pub trait CrawlStateStore: Send + Sync {
    async fn load_state(&self, user_id: i64) -> Result<Option<UserCrawlState>, sqlx::Error>;

    /// Record a completed repository re-fetch
    async fn record_repos_crawled(
        &self,
        user_id: i64,
        at: DateTime<Utc>,
    ) -> Result<(), sqlx::Error>;

    /// Record a completed graph crawl at the given depth
    async fn record_graph_crawled(
        &self,
        user_id: i64,
        depth: CrawlDepth,
        at: DateTime<Utc>,
    ) -> Result<(), sqlx::Error>;
}

/// Postgres-backed crawl-state store
#[derive(Debug, Clone)]
pub struct PgCrawlStateStore {
    pool: PgPool,
}

impl PgCrawlStateStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CrawlStateStore for PgCrawlStateStore {
    async fn load_state(&self, user_id: i64) -> Result<Option<UserCrawlState>, sqlx::Error> {
        let user: Option<User> = sqlx::query_as(
            r#"
            SELECT user_id, login, last_crawled_repos_at,
                   last_crawled_graph_d1_at, last_crawled_graph_d2_at, created_at
            FROM users
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user.map(|u| UserCrawlState::from_user(&u)))
    }

    async fn record_repos_crawled(
        &self,
        user_id: i64,
        at: DateTime<Utc>,
    ) -> Result<(), sqlx::Error> {
        // GREATEST keeps the timestamp monotonically non-decreasing even
        // when two unsynchronized refreshes race on the write.
        sqlx::query(
            "UPDATE users SET last_crawled_repos_at = GREATEST(last_crawled_repos_at, $2) WHERE user_id = $1",
        )
        .bind(user_id)
        .bind(at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn record_graph_crawled(
        &self,
        user_id: i64,
        depth: CrawlDepth,
        at: DateTime<Utc>,
    ) -> Result<(), sqlx::Error> {
        let query = match depth {
            CrawlDepth::Direct => {
                "UPDATE users SET last_crawled_graph_d1_at = GREATEST(last_crawled_graph_d1_at, $2) WHERE user_id = $1"
            }
            CrawlDepth::Transitive => {
                "UPDATE users SET last_crawled_graph_d2_at = GREATEST(last_crawled_graph_d2_at, $2) WHERE user_id = $1"
            }
        };

        sqlx::query(query)
            .bind(user_id)
            .bind(at)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}

/// Service running per-user refresh cycles
#[derive(Clone)]
pub struct RefreshService {
    store: Arc<dyn CrawlStateStore>,
    platform: Arc<dyn PlatformClient>,
    ttl: Duration,
}

impl RefreshService {
    pub fn new(pool: PgPool, platform: Arc<dyn PlatformClient>, ttl_days: i64) -> Self {
        Self {
            store: Arc::new(PgCrawlStateStore::new(pool)),
            platform,
            ttl: Duration::days(ttl_days),
        }
    }

    /// Construct with explicit collaborators, used by tests
    pub fn with_store(
        store: Arc<dyn CrawlStateStore>,
        platform: Arc<dyn PlatformClient>,
        ttl: Duration,
    ) -> Self {
        Self {
            store,
            platform,
            ttl,
        }
    }

    /// Run a refresh cycle for one user.
    ///
    /// Repo refresh always precedes the graph crawl: depth-crawl
    /// correctness depends on current repo data. Returns `updated=false`
    /// when both are already fresh at the requested depth.
    pub async fn refresh_user(
        &self,
        user_id: i64,
        requested_depth: CrawlDepth,
    ) -> Result<RefreshOutcome, RefreshError> {
        let state = self
            .store
            .load_state(user_id)
            .await?
            .ok_or(RefreshError::UserNotFound(user_id))?;

        let as_of = Utc::now() - self.ttl;
        let plan = plan_refresh(&state, requested_depth, as_of);

        if plan.is_noop() {
            debug!(user_id, "user is up-to-date");
            return Ok(RefreshOutcome {
                updated: false,
                message: "User up-to-date.".to_string(),
            });
        }

        if plan.refresh_repos {
            debug!(user_id, "updating repos");
            let started = Instant::now();
            self.platform.refresh_user_repos(user_id).await?;
            self.store.record_repos_crawled(user_id, Utc::now()).await?;
            info!(
                user_id,
                elapsed_secs = started.elapsed().as_secs_f64(),
                "refresh_user_repos completed"
            );
        }

        if let Some(depth) = plan.crawl {
            debug!(user_id, %depth, "crawling user graph");
            let started = Instant::now();
            self.platform.crawl_from_user(user_id, depth).await?;
            self.store
                .record_graph_crawled(user_id, depth, Utc::now())
                .await?;
            info!(
                user_id,
                %depth,
                elapsed_secs = started.elapsed().as_secs_f64(),
                "crawl_from_user completed"
            );
        }

        Ok(RefreshOutcome {
            updated: true,
            message: "User updated.".to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Staleness;
    use std::sync::Mutex;

    /// In-memory crawl-state store recording timestamp writes
    #[derive(Default)]
    struct FakeStore {
        state: Mutex<Option<UserCrawlState>>,
        repos_writes: Mutex<Vec<DateTime<Utc>>>,
        graph_writes: Mutex<Vec<(CrawlDepth, DateTime<Utc>)>>,
    }

    impl FakeStore {
        fn with_state(state: UserCrawlState) -> Self {
            Self {
                state: Mutex::new(Some(state)),
                ..Default::default()
            }
        }
    }

    #[async_trait]
    impl CrawlStateStore for FakeStore {
        async fn load_state(&self, _user_id: i64) -> Result<Option<UserCrawlState>, sqlx::Error> {
            Ok(*self.state.lock().unwrap())
        }

        async fn record_repos_crawled(
            &self,
            _user_id: i64,
            at: DateTime<Utc>,
        ) -> Result<(), sqlx::Error> {
            self.repos_writes.lock().unwrap().push(at);
            Ok(())
        }

        async fn record_graph_crawled(
            &self,
            _user_id: i64,
            depth: CrawlDepth,
            at: DateTime<Utc>,
        ) -> Result<(), sqlx::Error> {
            self.graph_writes.lock().unwrap().push((depth, at));
            Ok(())
        }
    }

    /// Platform client scripted to succeed or fail per operation
    struct FakePlatform {
        refresh_ok: bool,
        crawl_ok: bool,
        refresh_calls: Mutex<u32>,
        crawl_calls: Mutex<Vec<CrawlDepth>>,
    }

    impl FakePlatform {
        fn new(refresh_ok: bool, crawl_ok: bool) -> Self {
            Self {
                refresh_ok,
                crawl_ok,
                refresh_calls: Mutex::new(0),
                crawl_calls: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl PlatformClient for FakePlatform {
        async fn refresh_user_repos(&self, _user_id: i64) -> Result<(), PlatformError> {
            *self.refresh_calls.lock().unwrap() += 1;
            if self.refresh_ok {
                Ok(())
            } else {
                Err(PlatformError::Upstream {
                    operation: "refresh_user_repos".to_string(),
                    status: 502,
                })
            }
        }

        async fn crawl_from_user(
            &self,
            _user_id: i64,
            depth: CrawlDepth,
        ) -> Result<(), PlatformError> {
            self.crawl_calls.lock().unwrap().push(depth);
            if self.crawl_ok {
                Ok(())
            } else {
                Err(PlatformError::Upstream {
                    operation: "crawl_from_user".to_string(),
                    status: 502,
                })
            }
        }
    }

    fn service(
        store: Arc<FakeStore>,
        platform: Arc<FakePlatform>,
    ) -> RefreshService {
        RefreshService::with_store(store, platform, Duration::days(7))
    }

    #[tokio::test]
    async fn test_stale_repos_trigger_refresh() {
        // Scenario A: repos crawled 10 days ago, TTL 7 days.
        let now = Utc::now();
        let store = Arc::new(FakeStore::with_state(UserCrawlState {
            repos: Staleness::At(now - Duration::days(10)),
            graph_direct: Staleness::At(now - Duration::hours(1)),
            graph_transitive: Staleness::Never,
        }));
        let platform = Arc::new(FakePlatform::new(true, true));

        let outcome = service(store.clone(), platform.clone())
            .refresh_user(1, CrawlDepth::Direct)
            .await
            .expect("refresh should succeed");

        assert!(outcome.updated);
        assert_eq!(outcome.message, "User updated.");
        assert_eq!(*platform.refresh_calls.lock().unwrap(), 1);
        assert!(platform.crawl_calls.lock().unwrap().is_empty());
        assert_eq!(store.repos_writes.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_all_fresh_is_noop() {
        // Scenario B: everything fresh within TTL.
        let now = Utc::now();
        let store = Arc::new(FakeStore::with_state(UserCrawlState {
            repos: Staleness::At(now - Duration::hours(1)),
            graph_direct: Staleness::At(now - Duration::hours(1)),
            graph_transitive: Staleness::Never,
        }));
        let platform = Arc::new(FakePlatform::new(true, true));

        let outcome = service(store.clone(), platform.clone())
            .refresh_user(1, CrawlDepth::Direct)
            .await
            .expect("refresh should succeed");

        assert!(!outcome.updated);
        assert_eq!(outcome.message, "User up-to-date.");
        assert_eq!(*platform.refresh_calls.lock().unwrap(), 0);
        assert!(store.repos_writes.lock().unwrap().is_empty());
        assert!(store.graph_writes.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_depth2_crawled_when_only_depth1_fresh() {
        // Scenario E: depth-1 fresh, depth-2 never recorded.
        let now = Utc::now();
        let store = Arc::new(FakeStore::with_state(UserCrawlState {
            repos: Staleness::At(now - Duration::hours(1)),
            graph_direct: Staleness::At(now - Duration::hours(1)),
            graph_transitive: Staleness::Never,
        }));
        let platform = Arc::new(FakePlatform::new(true, true));

        let outcome = service(store.clone(), platform.clone())
            .refresh_user(1, CrawlDepth::Transitive)
            .await
            .expect("refresh should succeed");

        assert!(outcome.updated);
        assert_eq!(
            *platform.crawl_calls.lock().unwrap(),
            vec![CrawlDepth::Transitive]
        );
        let graph_writes = store.graph_writes.lock().unwrap();
        assert_eq!(graph_writes.len(), 1);
        assert_eq!(graph_writes[0].0, CrawlDepth::Transitive);
        // Depth-1 timestamp left untouched.
        assert!(store.repos_writes.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_failed_refresh_does_not_advance_timestamp() {
        let store = Arc::new(FakeStore::with_state(UserCrawlState {
            repos: Staleness::Never,
            graph_direct: Staleness::Never,
            graph_transitive: Staleness::Never,
        }));
        let platform = Arc::new(FakePlatform::new(false, true));

        let result = service(store.clone(), platform.clone())
            .refresh_user(1, CrawlDepth::Direct)
            .await;

        assert!(matches!(result, Err(RefreshError::Platform(_))));
        assert!(store.repos_writes.lock().unwrap().is_empty());
        // The failure aborts the cycle before the graph crawl.
        assert!(store.graph_writes.lock().unwrap().is_empty());
        assert!(platform.crawl_calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_failed_crawl_does_not_advance_graph_timestamp() {
        let store = Arc::new(FakeStore::with_state(UserCrawlState {
            repos: Staleness::At(Utc::now()),
            graph_direct: Staleness::Never,
            graph_transitive: Staleness::Never,
        }));
        let platform = Arc::new(FakePlatform::new(true, false));

        let result = service(store.clone(), platform.clone())
            .refresh_user(1, CrawlDepth::Direct)
            .await;

        assert!(matches!(result, Err(RefreshError::Platform(_))));
        assert!(store.graph_writes.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unknown_user_is_not_found() {
        let store = Arc::new(FakeStore::default());
        let platform = Arc::new(FakePlatform::new(true, true));

        let result = service(store, platform)
            .refresh_user(42, CrawlDepth::Direct)
            .await;

        assert!(matches!(result, Err(RefreshError::UserNotFound(42))));
    }

    #[tokio::test]
    async fn test_repo_refresh_precedes_graph_crawl() {
        let store = Arc::new(FakeStore::with_state(UserCrawlState {
            repos: Staleness::Never,
            graph_direct: Staleness::Never,
            graph_transitive: Staleness::Never,
        }));
        let platform = Arc::new(FakePlatform::new(true, true));

        let outcome = service(store.clone(), platform.clone())
            .refresh_user(1, CrawlDepth::Direct)
            .await
            .expect("refresh should succeed");

        assert!(outcome.updated);
        assert_eq!(*platform.refresh_calls.lock().unwrap(), 1);
        assert_eq!(
            *platform.crawl_calls.lock().unwrap(),
            vec![CrawlDepth::Direct]
        );
        let repos_at = store.repos_writes.lock().unwrap()[0];
        let graph_at = store.graph_writes.lock().unwrap()[0].1;
        assert!(repos_at <= graph_at);
    }
}
