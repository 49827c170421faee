mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use common::{TEST_PASSWORD, create_test_user, generate_unique_username, setup_test_app};
use http_body_util::BodyExt;
use serde_json::json;
use sqlx::PgPool;
use tower::ServiceExt;

async fn post_json(app: axum::Router, uri: &str, body: serde_json::Value) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_string(&body).unwrap()))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
    (status, value)
}

#[sqlx::test(migrations = "./migrations")]
async fn test_obtain_token_pair_success(pool: PgPool) {
    let username = generate_unique_username();
    create_test_user(&pool, &username, "student").await;

    let app = setup_test_app(pool);
    let (status, body) = post_json(
        app,
        "/api/token",
        json!({"username": username, "password": TEST_PASSWORD}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert!(body["access"].as_str().is_some());
    assert!(body["refresh"].as_str().is_some());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_obtain_token_wrong_password(pool: PgPool) {
    let username = generate_unique_username();
    create_test_user(&pool, &username, "student").await;

    let app = setup_test_app(pool);
    let (status, _) = post_json(
        app,
        "/api/token",
        json!({"username": username, "password": "wrongpassword"}),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_obtain_token_unknown_user(pool: PgPool) {
    let app = setup_test_app(pool);
    let (status, _) = post_json(
        app,
        "/api/token",
        json!({"username": "nobody", "password": TEST_PASSWORD}),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_obtain_token_inactive_account(pool: PgPool) {
    let username = generate_unique_username();
    let user = create_test_user(&pool, &username, "student").await;

    sqlx::query("UPDATE users SET is_active = FALSE WHERE id = $1")
        .bind(user.id)
        .execute(&pool)
        .await
        .unwrap();

    let app = setup_test_app(pool);
    let (status, _) = post_json(
        app,
        "/api/token",
        json!({"username": username, "password": TEST_PASSWORD}),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_refresh_token_flow(pool: PgPool) {
    let username = generate_unique_username();
    create_test_user(&pool, &username, "teacher").await;

    let app = setup_test_app(pool);
    let (status, body) = post_json(
        app.clone(),
        "/api/token",
        json!({"username": username, "password": TEST_PASSWORD}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let refresh = body["refresh"].as_str().unwrap();
    let (status, body) = post_json(app, "/api/token/refresh", json!({"refresh": refresh})).await;

    assert_eq!(status, StatusCode::OK);
    assert!(body["access"].as_str().is_some());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_refresh_rejects_access_token(pool: PgPool) {
    let username = generate_unique_username();
    create_test_user(&pool, &username, "teacher").await;

    let app = setup_test_app(pool);
    let (_, body) = post_json(
        app.clone(),
        "/api/token",
        json!({"username": username, "password": TEST_PASSWORD}),
    )
    .await;

    // An access token must not be accepted where a refresh token is expected
    let access = body["access"].as_str().unwrap();
    let (status, _) = post_json(app, "/api/token/refresh", json!({"refresh": access})).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_refresh_rejects_garbage(pool: PgPool) {
    let app = setup_test_app(pool);
    let (status, _) = post_json(
        app,
        "/api/token/refresh",
        json!({"refresh": "not.a.token"}),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_schema_endpoint_is_public(pool: PgPool) {
    let app = setup_test_app(pool);
    let request = Request::builder()
        .method("GET")
        .uri("/schema")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let doc: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert!(doc["paths"]["/api/token"].is_object());
}
