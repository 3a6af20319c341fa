//! Star and dislike handlers
//!
//! Toggling endpoints for the session user's reactions. Success follows
//! the 204 empty-body convention in the status object; a missing repo or
//! edge reports 404.

use actix_web::{web, HttpRequest, HttpResponse};
use tracing::debug;

use crate::error::AppError;
use crate::handlers::auth::require_session;
use crate::models::RepoActionStatus;
use crate::services::{SocialError, SocialService};
use crate::AppState;

async fn toggle(
    state: &AppState,
    req: &HttpRequest,
    repo_id: i64,
    action: &'static str,
) -> Result<HttpResponse, AppError> {
    let session = require_session(req, state).await?;
    let social = SocialService::new(state.db.clone());

    let result = match action {
        "add_star" => social.add_star(repo_id, session.user_id).await,
        "remove_star" => social.remove_star(repo_id, session.user_id).await,
        "add_dislike" => social.add_dislike(repo_id, session.user_id).await,
        "remove_dislike" => social.remove_dislike(repo_id, session.user_id).await,
        _ => unreachable!("unknown toggle action"),
    };

    match result {
        Ok(()) => {
            debug!(user_id = session.user_id, repo_id, action, "toggle succeeded");
            Ok(HttpResponse::Ok().json(RepoActionStatus::new(204, action, repo_id)))
        }
        Err(SocialError::Database(e)) => Err(AppError::Database(e)),
        Err(e) => {
            debug!(user_id = session.user_id, repo_id, action, error = %e, "toggle rejected");
            Ok(HttpResponse::Ok().json(RepoActionStatus::new(404, action, repo_id)))
        }
    }
}

/// POST /v1/repos/{repo_id}/star
pub async fn add_star(
    state: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    toggle(&state, &req, path.into_inner(), "add_star").await
}

/// POST /v1/repos/{repo_id}/unstar
pub async fn remove_star(
    state: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    toggle(&state, &req, path.into_inner(), "remove_star").await
}

/// POST /v1/repos/{repo_id}/dislike
pub async fn add_dislike(
    state: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    toggle(&state, &req, path.into_inner(), "add_dislike").await
}

/// POST /v1/repos/{repo_id}/undislike
pub async fn remove_dislike(
    state: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    toggle(&state, &req, path.into_inner(), "remove_dislike").await
}

/// Configure star and dislike routes
pub fn configure_star_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/repos/{repo_id}/star").route(web::post().to(add_star)))
        .service(web::resource("/repos/{repo_id}/unstar").route(web::post().to(remove_star)))
        .service(web::resource("/repos/{repo_id}/dislike").route(web::post().to(add_dislike)))
        .service(web::resource("/repos/{repo_id}/undislike").route(web::post().to(remove_dislike)));
}
