//! Session plumbing
//!
//! Authenticated endpoints resolve the `x-session-id` header against the
//! session store before any core logic runs. Login here is by platform
//! user id; the platform's own OAuth exchange happens upstream of this
//! service.

use actix_web::{web, HttpRequest, HttpResponse};
use tracing::info;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::{ActionStatus, LoginRequest, LoginResponse, Session};
use crate::services::{SessionService, UserService};
use crate::AppState;

pub const SESSION_HEADER: &str = "x-session-id";

/// Resolve the request's session, if one is attached and known
pub async fn maybe_session(
    req: &HttpRequest,
    state: &AppState,
) -> Result<Option<Session>, AppError> {
    let header = match req.headers().get(SESSION_HEADER) {
        Some(value) => value,
        None => return Ok(None),
    };

    let session_id = header
        .to_str()
        .ok()
        .and_then(|s| Uuid::parse_str(s).ok())
        .ok_or_else(|| AppError::Validation(format!("Malformed {SESSION_HEADER} header")))?;

    let session = SessionService::new(state.db.clone()).load(session_id).await?;
    Ok(session)
}

/// Resolve the request's session or reject with 401
pub async fn require_session(req: &HttpRequest, state: &AppState) -> Result<Session, AppError> {
    maybe_session(req, state).await?.ok_or_else(|| {
        AppError::Unauthorized("Please log in with your platform account.".to_string())
    })
}

/// POST /v1/auth/login
///
/// Opens a session for a known user and returns its id. Clients send the
/// id back in the `x-session-id` header on authenticated requests.
pub async fn login(
    state: web::Data<AppState>,
    body: web::Json<LoginRequest>,
) -> Result<HttpResponse, AppError> {
    let user_id = body.user_id;

    if !UserService::new(state.db.clone()).exists(user_id).await? {
        return Err(AppError::NotFound(format!("No user found with id {user_id}.")));
    }

    let session = SessionService::new(state.db.clone())
        .create(user_id, None)
        .await?;
    info!(user_id, session_id = %session.session_id, "session opened");

    Ok(HttpResponse::Ok().json(LoginResponse {
        session_id: session.session_id,
        user_id,
    }))
}

/// POST /v1/auth/logout
///
/// Deletes the session row and drops the session's dedup slot.
pub async fn logout(
    state: web::Data<AppState>,
    req: HttpRequest,
) -> Result<HttpResponse, AppError> {
    let session = require_session(&req, &state).await?;

    SessionService::new(state.db.clone())
        .delete(session.session_id)
        .await?;
    state.dedup.remove(session.session_id).await;
    info!(user_id = session.user_id, session_id = %session.session_id, "session closed");

    Ok(HttpResponse::Ok().json(ActionStatus::new(200, "logout", "Logged out.")))
}

/// Configure auth routes
pub fn configure_auth_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/auth/login").route(web::post().to(login)))
        .service(web::resource("/auth/logout").route(web::post().to(logout)));
}
