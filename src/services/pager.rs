//! Candidate Pager
//!
//! Turns the ranking oracle's full candidate list into one client page.
//! The pager over-fetches a window `multiplier` times the requested page
//! size, anticipating that downstream filtering removes a sizable share
//! of the window, then truncates the survivors to the page size. A single
//! bounded fetch per page: if filtering removes more than the over-fetch
//! absorbs, the page comes back short even though eligible candidates
//! exist further down the ranked list.

use sqlx::PgPool;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;
use thiserror::Error;
use tracing::{debug, info};

use crate::models::Repo;
use crate::services::filter::{filter_ranked, Exclusions, FilterPipeline};
use crate::services::ranking::{RankingError, RankingOracle};

#[derive(Debug, Error)]
pub enum PagerError {
    #[error("Invalid page request: {0}")]
    InvalidRequest(String),

    #[error("Ranking error: {0}")]
    Ranking(#[from] RankingError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Half-open slice `[offset, end)` of the ranked candidate list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub offset: usize,
    pub end: usize,
}

/// Compute the over-fetch window for a 1-based page.
///
/// `offset = multiplier * limit * (page - 1)` and the window spans
/// `multiplier * limit` entries.
pub fn window_bounds(page: u64, limit: u64, multiplier: u64) -> PageWindow {
    // Saturating arithmetic: an absurdly large page or count clamps the
    // window past the end of the ranked list (an empty page) instead of
    // wrapping around into early pages.
    let span = multiplier.saturating_mul(limit);
    let offset = span.saturating_mul(page.saturating_sub(1));
    PageWindow {
        offset: usize::try_from(offset).unwrap_or(usize::MAX),
        end: usize::try_from(offset.saturating_add(span)).unwrap_or(usize::MAX),
    }
}

/// Slice the ranked list to the window, drop exclusions, truncate to
/// `limit`. Relative order of the ranked input is preserved throughout.
pub fn paginate(
    ranked: &[i64],
    window: PageWindow,
    exclusions: &Exclusions,
    limit: usize,
) -> Vec<i64> {
    let offset = window.offset.min(ranked.len());
    let end = window.end.min(ranked.len());
    let mut surviving = filter_ranked(&ranked[offset..end], exclusions);
    surviving.truncate(limit);
    surviving
}

/// Service assembling recommendation pages
#[derive(Clone)]
pub struct RecommendationPager {
    pool: PgPool,
    oracle: Arc<dyn RankingOracle>,
    filter: FilterPipeline,
    multiplier: u64,
}

impl RecommendationPager {
    pub fn new(pool: PgPool, oracle: Arc<dyn RankingOracle>, multiplier: u64) -> Self {
        Self {
            filter: FilterPipeline::new(pool.clone()),
            pool,
            oracle,
            multiplier,
        }
    }

    /// Assemble one recommendation page for a user.
    ///
    /// Returns at most `limit` repos in the oracle's relative order.
    pub async fn get_page(
        &self,
        user_id: i64,
        page: i64,
        limit: i64,
    ) -> Result<Vec<Repo>, PagerError> {
        if page < 1 {
            return Err(PagerError::InvalidRequest(format!(
                "page must be >= 1, got {page}"
            )));
        }
        if limit < 1 {
            return Err(PagerError::InvalidRequest(format!(
                "count must be > 0, got {limit}"
            )));
        }

        let window = window_bounds(page as u64, limit as u64, self.multiplier);
        debug!(
            user_id,
            page, limit, window.offset, window.end, "slicing ranked candidates"
        );

        let started = Instant::now();
        let ranked = self.oracle.get_repo_suggestions(user_id).await?;
        info!(
            user_id,
            candidates = ranked.len(),
            elapsed_secs = started.elapsed().as_secs_f64(),
            "get_repo_suggestions completed"
        );

        let started = Instant::now();
        let exclusions = self.filter.load_exclusions(user_id).await?;
        let surviving = paginate(&ranked, window, &exclusions, limit as usize);
        info!(
            user_id,
            surviving = surviving.len(),
            elapsed_secs = started.elapsed().as_secs_f64(),
            "filter pipeline completed"
        );

        self.fetch_ranked_repos(&surviving).await
    }

    /// Bulk-fetch repo records, returned in the order of `ids`
    async fn fetch_ranked_repos(&self, ids: &[i64]) -> Result<Vec<Repo>, PagerError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let rows: Vec<Repo> = sqlx::query_as(
            r#"
            SELECT repo_id, owner_id, name, description, language, star_count, created_at
            FROM repos
            WHERE repo_id = ANY($1)
            "#,
        )
        .bind(ids)
        .fetch_all(&self.pool)
        .await?;

        let mut by_id: HashMap<i64, Repo> = rows.into_iter().map(|r| (r.repo_id, r)).collect();
        Ok(ids.iter().filter_map(|id| by_id.remove(id)).collect())
    }
}
