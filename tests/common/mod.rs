#![allow(dead_code)]

use axum_test::TestServer;
use short_links::application::services::LinkService;
use short_links::infrastructure::cache::{CacheService, NullCache};
use short_links::infrastructure::persistence::PgLinkRepository;
use short_links::routes::router;
use short_links::state::AppState;
use sqlx::PgPool;
use std::sync::Arc;

pub const BASE_URL: &str = "https://s.example.com";

pub fn create_test_service(pool: PgPool) -> LinkService<PgLinkRepository> {
    let cache: Arc<dyn CacheService> = Arc::new(NullCache::new());
    LinkService::new(Arc::new(PgLinkRepository::new(Arc::new(pool))), cache)
}

pub fn create_test_state(pool: PgPool) -> AppState {
    let cache: Arc<dyn CacheService> = Arc::new(NullCache::new());
    let repo = Arc::new(PgLinkRepository::new(Arc::new(pool)));
    let link_service = Arc::new(LinkService::new(repo, cache.clone()));

    AppState::new(link_service, cache, Some(BASE_URL.to_string()))
}

pub fn create_test_server(pool: PgPool) -> TestServer {
    TestServer::new(router(create_test_state(pool))).unwrap()
}

pub async fn create_test_link(pool: &PgPool, code: &str, url: &str) {
    sqlx::query("INSERT INTO urls (short_code, long_url) VALUES ($1, $2)")
        .bind(code)
        .bind(url)
        .execute(pool)
        .await
        .unwrap();
}

pub async fn count_links_with_code(pool: &PgPool, code: &str) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM urls WHERE short_code = $1")
        .bind(code)
        .fetch_one(pool)
        .await
        .unwrap()
}

pub async fn count_links(pool: &PgPool) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM urls")
        .fetch_one(pool)
        .await
        .unwrap()
}

pub async fn clicks_of(pool: &PgPool, code: &str) -> i64 {
    sqlx::query_scalar("SELECT clicks FROM urls WHERE short_code = $1")
        .bind(code)
        .fetch_one(pool)
        .await
        .unwrap()
}
