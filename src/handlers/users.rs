//! User lookup handlers

use actix_web::{web, HttpResponse};
use serde::Serialize;

use crate::error::AppError;
use crate::models::{RepoCard, User, UserQuery};
use crate::services::UserService;
use crate::AppState;

/// User profile with owned repositories
#[derive(Debug, Serialize)]
pub struct UserProfile {
    pub user: User,
    pub repos: Vec<RepoCard>,
}

/// GET /v1/users?user_id=..|login=..
///
/// Looks up a user by id or login (id checked first when both given).
pub async fn get_user(
    state: web::Data<AppState>,
    query: web::Query<UserQuery>,
) -> Result<HttpResponse, AppError> {
    let query = query.into_inner();
    let users = UserService::new(state.db.clone());

    let user = match (query.user_id, query.login.as_deref()) {
        (Some(id), _) => users.find_by_id(id).await?,
        (None, Some(login)) => users.find_by_login(login).await?,
        (None, None) => {
            return Err(AppError::Validation(
                "Either user_id or login is required".to_string(),
            ));
        }
    };

    let user = user.ok_or_else(|| {
        AppError::NotFound(format!(
            "Unable to find user (id:{}, login:{}).",
            query.user_id.map(|i| i.to_string()).unwrap_or_default(),
            query.login.as_deref().unwrap_or_default()
        ))
    })?;

    let repos = users
        .owned_repos(user.user_id)
        .await?
        .into_iter()
        .map(|r| RepoCard {
            id: r.repo_id,
            name: r.name,
            owner: user.login.clone(),
            description: r.description,
            language: r.language,
            stars: r.star_count,
        })
        .collect();

    Ok(HttpResponse::Ok().json(UserProfile { user, repos }))
}

/// Configure user routes
pub fn configure_user_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/users").route(web::get().to(get_user)));
}
