//! HTTP integration tests for the login and logout endpoints
//!
//! DB-requiring tests are marked `#[ignore]`; run with: cargo test -- --ignored

#[cfg(test)]
mod http_integration_tests {
    use actix_web::{test, web, App};
    use serde_json::Value;
    use sqlx::PgPool;
    use std::sync::Arc;
    use uuid::Uuid;

    use crate::handlers::auth::SESSION_HEADER;
    use crate::handlers::configure_auth_routes;
    use crate::services::{DedupGuard, HttpPlatformClient, SocialRankingOracle};
    use crate::{AppState, Config};

    /// Helper to create a test database pool - returns None if connection fails
    async fn try_create_test_pool() -> Option<PgPool> {
        let _ = dotenvy::dotenv();

        let database_url = std::env::var("DATABASE_URL").ok()?;

        sqlx::postgres::PgPoolOptions::new()
            .max_connections(5)
            .connect(&database_url)
            .await
            .ok()
    }

    fn create_test_config() -> Config {
        Config {
            database_url: std::env::var("DATABASE_URL").unwrap_or_default(),
            database_max_connections: 5,
            host: "127.0.0.1".to_string(),
            port: 8080,
            platform_api_url: "http://localhost:9".to_string(),
            crawl_ttl_days: 7,
            default_count: 25,
            overfetch_multiplier: 2,
        }
    }

    fn create_test_app_state(pool: PgPool) -> web::Data<AppState> {
        web::Data::new(AppState {
            oracle: Arc::new(SocialRankingOracle::new(pool.clone())),
            platform: Arc::new(HttpPlatformClient::new("http://localhost:9")),
            dedup: DedupGuard::new(),
            db: pool,
            config: create_test_config(),
        })
    }

    async fn create_test_user(pool: &PgPool) -> i64 {
        let user_id = (Uuid::new_v4().as_u128() as i64).abs();

        sqlx::query("INSERT INTO users (user_id, login) VALUES ($1, $2)")
            .bind(user_id)
            .bind(format!("test-user-{user_id}"))
            .execute(pool)
            .await
            .expect("Failed to create test user");

        user_id
    }

    #[ignore]
    #[tokio::test]
    async fn integration_login_unknown_user_is_not_found() {
        let Some(pool) = try_create_test_pool().await else {
            return;
        };

        let app = test::init_service(
            App::new()
                .app_data(create_test_app_state(pool))
                .configure(configure_auth_routes),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/auth/login")
            .set_json(serde_json::json!({ "user_id": i64::MAX }))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), 404);
    }

    #[ignore]
    #[tokio::test]
    async fn integration_login_then_logout_invalidates_session() {
        let Some(pool) = try_create_test_pool().await else {
            return;
        };

        let user_id = create_test_user(&pool).await;
        let app = test::init_service(
            App::new()
                .app_data(create_test_app_state(pool))
                .configure(configure_auth_routes),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/auth/login")
            .set_json(serde_json::json!({ "user_id": user_id }))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["user_id"], user_id);
        let session_id = body["session_id"].as_str().expect("session id").to_string();

        let req = test::TestRequest::post()
            .uri("/auth/logout")
            .insert_header((SESSION_HEADER, session_id.clone()))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["Status"], 200);
        assert_eq!(body["action"], "logout");

        // The deleted session no longer authenticates.
        let req = test::TestRequest::post()
            .uri("/auth/logout")
            .insert_header((SESSION_HEADER, session_id))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 401);
    }
}
