//! Recommendation handlers
//!
//! HTTP surface for paginated repository recommendations. The dedup
//! guard runs before anything else; target resolution follows the
//! original precedence (login, then user_id, then the session's user).

use actix_web::{web, HttpRequest, HttpResponse};
use sqlx::PgPool;
use std::collections::HashMap;
use tracing::{debug, warn};

use crate::error::AppError;
use crate::handlers::auth::require_session;
use crate::models::{ActionStatus, RecsQuery, Repo, RepoCard};
use crate::services::pager::PagerError;
use crate::services::{RecommendationPager, UserService};
use crate::AppState;

/// GET /v1/recommendations
///
/// Query Parameters:
/// - count: page size (default from configuration)
/// - page: 1-based page number (default: 1)
/// - login / user_id: target selection; login takes precedence
/// - code: opaque per-request token for the dedup guard
///
/// Returns a JSON array of repo cards, or a status object when the
/// request is rejected as a duplicate.
pub async fn get_recommendations(
    state: web::Data<AppState>,
    req: HttpRequest,
    query: web::Query<RecsQuery>,
) -> Result<HttpResponse, AppError> {
    let session = require_session(&req, &state).await?;
    let query = query.into_inner();

    let limit = query.count.unwrap_or(state.config.default_count);
    let page = query.page.unwrap_or(1);
    if limit < 1 {
        return Err(AppError::Validation(format!("count must be > 0, got {limit}")));
    }
    if page < 1 {
        return Err(AppError::Validation(format!("page must be >= 1, got {page}")));
    }

    if !state
        .dedup
        .accept(session.session_id, query.code.as_deref(), page)
        .await
    {
        let code = query.code.as_deref().unwrap_or("");
        warn!(
            user_id = session.user_id,
            code, page, "code and page already requested, ignoring request"
        );
        return Ok(HttpResponse::Ok().json(ActionStatus::new(
            404,
            "get_repo_recs",
            format!("Code {code} and page {page} already requested. Ignoring request."),
        )));
    }

    let user_id = resolve_target(&state, &query, session.user_id).await?;
    debug!(
        session_user = session.user_id,
        user_id, page, limit, "fetching recs"
    );

    let pager = RecommendationPager::new(
        state.db.clone(),
        state.oracle.clone(),
        state.config.overfetch_multiplier as u64,
    );
    let repos = pager
        .get_page(user_id, page, limit)
        .await
        .map_err(map_pager_error)?;

    let cards = to_cards(&state.db, repos).await?;
    Ok(HttpResponse::Ok().json(cards))
}

/// Pick the target user: login takes precedence over an explicit
/// user_id, then the session's own user. An explicit user_id must name
/// an existing user even when a login wins the precedence.
async fn resolve_target(
    state: &AppState,
    query: &RecsQuery,
    session_user: i64,
) -> Result<i64, AppError> {
    let users = UserService::new(state.db.clone());

    if let Some(user_id) = query.user_id {
        if !users.exists(user_id).await? {
            return Err(AppError::NotFound(format!("No user found with id {user_id}.")));
        }
    }

    if let Some(login) = &query.login {
        let user = users
            .find_by_login(login)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("No user found with login {login}.")))?;
        return Ok(user.user_id);
    }

    if let Some(user_id) = query.user_id {
        return Ok(user_id);
    }

    Ok(session_user)
}

fn map_pager_error(e: PagerError) -> AppError {
    match e {
        PagerError::InvalidRequest(msg) => AppError::Validation(msg),
        PagerError::Ranking(e) => AppError::Internal(e.to_string()),
        PagerError::Database(e) => AppError::Database(e),
    }
}

/// Resolve owner logins and shape repos for the response
pub(crate) async fn to_cards(pool: &PgPool, repos: Vec<Repo>) -> Result<Vec<RepoCard>, AppError> {
    let owner_ids: Vec<i64> = repos.iter().map(|r| r.owner_id).collect();

    let logins: Vec<(i64, String)> =
        sqlx::query_as("SELECT user_id, login FROM users WHERE user_id = ANY($1)")
            .bind(&owner_ids)
            .fetch_all(pool)
            .await?;
    let logins: HashMap<i64, String> = logins.into_iter().collect();

    Ok(repos
        .into_iter()
        .map(|r| {
            let owner = logins
                .get(&r.owner_id)
                .cloned()
                .unwrap_or_else(|| r.owner_id.to_string());
            RepoCard {
                id: r.repo_id,
                name: r.name,
                owner,
                description: r.description,
                language: r.language,
                stars: r.star_count,
            }
        })
        .collect())
}

/// Configure recommendation routes
pub fn configure_recommendation_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/recommendations").route(web::get().to(get_recommendations)));
}
