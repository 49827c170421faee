use axum::body::Body;
use axum::http::Request;
use campuskit::config::cors::CorsConfig;
use campuskit::config::jwt::JwtConfig;
use campuskit::router::init_router;
use campuskit::state::AppState;
use campuskit::utils::password::hash_password;
use http_body_util::BodyExt;
use serde_json::json;
use sqlx::PgPool;
use tower::ServiceExt;
use uuid::Uuid;

pub const TEST_PASSWORD: &str = "testpass123";

#[allow(dead_code)]
pub struct TestUser {
    pub id: Uuid,
    pub username: String,
    pub email: String,
}

/// Insert a user row directly, bypassing the service layer.
/// `role` should be one of: "superadmin", "admin", "teacher", "student".
pub async fn create_test_user(pool: &PgPool, username: &str, role: &str) -> TestUser {
    let hashed = hash_password(TEST_PASSWORD).unwrap();
    let email = format!("{}@test.com", username);

    let id: Uuid = sqlx::query_scalar(
        "INSERT INTO users (username, email, password, role)
         VALUES ($1, $2, $3, $4::user_role)
         RETURNING id",
    )
    .bind(username)
    .bind(&email)
    .bind(&hashed)
    .bind(role)
    .fetch_one(pool)
    .await
    .unwrap();

    TestUser {
        id,
        username: username.to_string(),
        email,
    }
}

pub fn setup_test_app(pool: PgPool) -> axum::Router {
    dotenvy::dotenv().ok();
    let state = AppState {
        db: pool,
        jwt_config: JwtConfig::from_env(),
        cors_config: CorsConfig::from_env(),
    };
    init_router(state)
}

/// Obtain an access token through the token endpoint.
#[allow(dead_code)]
pub async fn get_auth_token(app: axum::Router, username: &str, password: &str) -> String {
    let request = Request::builder()
        .method("POST")
        .uri("/api/token")
        .header("content-type", "application/json")
        .body(Body::from(
            serde_json::to_string(&json!({
                "username": username,
                "password": password
            }))
            .unwrap(),
        ))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    let body: serde_json::Value = serde_json::from_slice(&body).unwrap();
    body["access"].as_str().unwrap().to_string()
}

pub fn generate_unique_username() -> String {
    format!("user-{}", Uuid::new_v4())
}
