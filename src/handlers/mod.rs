pub mod auth;
pub mod recommendations;
pub mod refresh;
pub mod stars;
pub mod users;

#[cfg(test)]
mod auth_http_tests;

pub use auth::configure_auth_routes;
pub use recommendations::configure_recommendation_routes;
pub use refresh::configure_refresh_routes;
pub use stars::configure_star_routes;
pub use users::configure_user_routes;
