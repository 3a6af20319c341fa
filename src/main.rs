use actix_web::{web, App, HttpResponse, HttpServer};
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use reposcout::handlers::{
    configure_auth_routes, configure_recommendation_routes, configure_refresh_routes,
    configure_star_routes, configure_user_routes,
};
use reposcout::services::{DedupGuard, HttpPlatformClient, SocialRankingOracle};
use reposcout::{AppState, Config};

/// Health check endpoint
async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "healthy",
        "service": "reposcout"
    }))
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "reposcout=debug,actix_web=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env().expect("Failed to load configuration");

    info!("Starting reposcout server on {}:{}", config.host, config.port);

    let db_pool = PgPoolOptions::new()
        .max_connections(config.database_max_connections)
        .connect(&config.database_url)
        .await
        .expect("Failed to create database pool");

    info!("Database connection pool established");

    sqlx::migrate!("./migrations")
        .run(&db_pool)
        .await
        .expect("Failed to run database migrations");

    info!("Database migrations completed");

    let app_state = web::Data::new(AppState {
        oracle: Arc::new(SocialRankingOracle::new(db_pool.clone())),
        platform: Arc::new(HttpPlatformClient::new(config.platform_api_url.clone())),
        dedup: DedupGuard::new(),
        db: db_pool,
        config,
    });

    let server_addr = format!(
        "{}:{}",
        app_state.config.host, app_state.config.port
    );

    HttpServer::new(move || {
        App::new()
            .app_data(app_state.clone())
            .route("/health", web::get().to(health_check))
            .service(
                web::scope("/v1")
                    .configure(configure_auth_routes)
                    .configure(configure_recommendation_routes)
                    .configure(configure_refresh_routes)
                    .configure(configure_user_routes)
                    .configure(configure_star_routes),
            )
    })
    .bind(&server_addr)?
    .run()
    .await
}
