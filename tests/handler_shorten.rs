mod common;

use serde_json::json;
use sqlx::PgPool;

#[sqlx::test]
async fn test_shorten_generates_code(pool: PgPool) {
    let server = common::create_test_server(pool);

    let response = server
        .post("/api/shorten")
        .json(&json!({ "url": "https://example.com" }))
        .await;

    assert_eq!(response.status_code(), 201);

    let json = response.json::<serde_json::Value>();
    let code = json["code"].as_str().unwrap();
    assert_eq!(code.len(), 8);
    assert_eq!(json["long_url"], "https://example.com");
    assert_eq!(
        json["short_url"],
        format!("{}/{}", common::BASE_URL, code)
    );
}

#[sqlx::test]
async fn test_shorten_with_custom_code(pool: PgPool) {
    let server = common::create_test_server(pool);

    let response = server
        .post("/api/shorten")
        .json(&json!({ "url": "https://a.com", "custom_code": "promo" }))
        .await;

    assert_eq!(response.status_code(), 201);

    let json = response.json::<serde_json::Value>();
    assert_eq!(json["code"], "promo");
    assert_eq!(json["short_url"], "https://s.example.com/promo");
}

#[sqlx::test]
async fn test_shorten_blank_custom_code_generates(pool: PgPool) {
    let server = common::create_test_server(pool);

    let response = server
        .post("/api/shorten")
        .json(&json!({ "url": "https://a.com", "custom_code": "  " }))
        .await;

    assert_eq!(response.status_code(), 201);

    let json = response.json::<serde_json::Value>();
    assert_eq!(json["code"].as_str().unwrap().len(), 8);
}

#[sqlx::test]
async fn test_shorten_custom_code_taken(pool: PgPool) {
    common::create_test_link(&pool, "promo", "https://a.com").await;
    let server = common::create_test_server(pool.clone());

    let response = server
        .post("/api/shorten")
        .json(&json!({ "url": "https://b.com", "custom_code": "promo" }))
        .await;

    response.assert_status(axum::http::StatusCode::CONFLICT);

    let json = response.json::<serde_json::Value>();
    assert_eq!(json["error"]["code"], "code_taken");
    assert_eq!(json["error"]["details"]["long_url"], "https://b.com");
    assert_eq!(json["error"]["details"]["custom_code"], "promo");

    assert_eq!(common::count_links_with_code(&pool, "promo").await, 1);
}

#[sqlx::test]
async fn test_shorten_missing_url(pool: PgPool) {
    let server = common::create_test_server(pool.clone());

    let response = server
        .post("/api/shorten")
        .json(&json!({ "custom_code": "promo" }))
        .await;

    response.assert_status_bad_request();

    let json = response.json::<serde_json::Value>();
    assert_eq!(json["error"]["code"], "validation_error");
    assert_eq!(common::count_links(&pool).await, 0);
}

#[sqlx::test]
async fn test_shorten_invalid_url(pool: PgPool) {
    let server = common::create_test_server(pool);

    let response = server
        .post("/api/shorten")
        .json(&json!({ "url": "not-a-url" }))
        .await;

    response.assert_status_bad_request();
}

#[sqlx::test]
async fn test_shorten_reserved_custom_code(pool: PgPool) {
    let server = common::create_test_server(pool);

    let response = server
        .post("/api/shorten")
        .json(&json!({ "url": "https://a.com", "custom_code": "health" }))
        .await;

    response.assert_status_bad_request();
}

#[sqlx::test]
async fn test_shorten_custom_code_too_long(pool: PgPool) {
    let server = common::create_test_server(pool);

    let response = server
        .post("/api/shorten")
        .json(&json!({ "url": "https://a.com", "custom_code": "x".repeat(65) }))
        .await;

    response.assert_status_bad_request();
}

#[sqlx::test]
async fn test_shorten_long_blank_custom_code_generates(pool: PgPool) {
    let server = common::create_test_server(pool);

    let response = server
        .post("/api/shorten")
        .json(&json!({ "url": "https://a.com", "custom_code": " ".repeat(70) }))
        .await;

    assert_eq!(response.status_code(), 201);

    let json = response.json::<serde_json::Value>();
    assert_eq!(json["code"].as_str().unwrap().len(), 8);
}

#[sqlx::test]
async fn test_shorten_rejects_url_with_newline(pool: PgPool) {
    let server = common::create_test_server(pool.clone());

    let response = server
        .post("/api/shorten")
        .json(&json!({ "url": "https://example.com/a\nb" }))
        .await;

    response.assert_status_bad_request();
    assert_eq!(common::count_links(&pool).await, 0);
}

#[sqlx::test]
async fn test_every_stored_url_redirects(pool: PgPool) {
    let server = common::create_test_server(pool.clone());

    for url in ["https://example.com/a b", "https://example.com/caf\u{e9}"] {
        let created = server
            .post("/api/shorten")
            .json(&json!({ "url": url }))
            .await
            .json::<serde_json::Value>();
        let code = created["code"].as_str().unwrap().to_string();

        let response = server.get(&format!("/{code}")).await;
        assert_eq!(response.status_code(), 307, "{url}");
        assert_eq!(common::clicks_of(&pool, &code).await, 1);
    }
}
