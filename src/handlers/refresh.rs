//! Refresh handlers
//!
//! HTTP surface for the per-user crawl-refresh cycle.

use actix_web::{web, HttpRequest, HttpResponse};
use tracing::warn;

use crate::error::AppError;
use crate::handlers::auth::maybe_session;
use crate::models::{ActionStatus, CrawlDepth, RefreshRequest};
use crate::services::{RefreshError, RefreshService};
use crate::AppState;

/// POST /v1/users/refresh
///
/// Runs the refresh cycle for the session's user: repository re-fetch
/// first, then the graph crawl, each only if stale. Body may carry
/// `{"crawlFurther": true}` to request a depth-2 crawl.
///
/// The response distinguishes three outcomes in the status object:
/// updated (200, "User updated."), already fresh (200, "User
/// up-to-date."), and refresh failure (404, message), which leaves the
/// staleness timestamps untouched.
pub async fn update_user(
    state: web::Data<AppState>,
    req: HttpRequest,
    body: Option<web::Json<RefreshRequest>>,
) -> Result<HttpResponse, AppError> {
    const ACTION: &str = "update_user";

    let session = match maybe_session(&req, &state).await? {
        Some(session) => session,
        None => {
            return Ok(HttpResponse::Ok().json(ActionStatus::new(400, ACTION, "No user_id.")));
        }
    };

    let crawl_further = body.map(|b| b.crawl_further).unwrap_or(false);
    let depth = if crawl_further {
        CrawlDepth::Transitive
    } else {
        CrawlDepth::Direct
    };

    let service = RefreshService::new(
        state.db.clone(),
        state.platform.clone(),
        state.config.crawl_ttl_days,
    );

    match service.refresh_user(session.user_id, depth).await {
        Ok(outcome) => Ok(HttpResponse::Ok().json(ActionStatus::new(200, ACTION, outcome.message))),
        Err(RefreshError::Platform(e)) => {
            warn!(user_id = session.user_id, error = %e, "refresh failed");
            Ok(HttpResponse::Ok().json(ActionStatus::new(
                404,
                ACTION,
                format!("Refresh failed: {e}"),
            )))
        }
        Err(RefreshError::UserNotFound(id)) => {
            Err(AppError::NotFound(format!("No user found with id {id}.")))
        }
        Err(RefreshError::Database(e)) => Err(AppError::Database(e)),
    }
}

/// Configure refresh routes
pub fn configure_refresh_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/users/refresh").route(web::post().to(update_user)));
}
