mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use campuskit::modules::profiles::model::{CreateStudentProfileDto, CreateUserProfileDto};
use campuskit::modules::profiles::service::{ProfileKind, ProfileService};
use campuskit::utils::audit::RowScope;
use campuskit::utils::pagination::PaginationParams;
use common::{TEST_PASSWORD, create_test_user, generate_unique_username, get_auth_token, setup_test_app};
use http_body_util::BodyExt;
use serde_json::json;
use sqlx::PgPool;
use tower::ServiceExt;
use uuid::Uuid;

fn student_profile_dto(user_id: Uuid) -> CreateStudentProfileDto {
    CreateStudentProfileDto {
        user_id,
        enrollment_date: None,
        current_class: Some("JSS 2".to_string()),
        guardian_name: Some("Jane Doe".to_string()),
        guardian_phone: None,
    }
}

#[sqlx::test(migrations = "./migrations")]
async fn test_soft_delete_round_trip(pool: PgPool) {
    let user = create_test_user(&pool, &generate_unique_username(), "student").await;
    ProfileService::create_student_profile(&pool, student_profile_dto(user.id), None)
        .await
        .unwrap();

    ProfileService::soft_delete_profile(&pool, ProfileKind::Student, user.id, None)
        .await
        .unwrap();

    // Gone from the active view
    let err = ProfileService::get_student_profile(&pool, user.id, RowScope::Active)
        .await
        .unwrap_err();
    assert_eq!(err.status, StatusCode::NOT_FOUND);

    // Present in the deleted view, with both fields set
    let deleted = ProfileService::get_student_profile(&pool, user.id, RowScope::Deleted)
        .await
        .unwrap();
    assert!(deleted.deletion.is_deleted);
    assert!(deleted.deletion.deleted_at.is_some());

    // Restore reverses both fields
    ProfileService::restore_profile(&pool, ProfileKind::Student, user.id, None)
        .await
        .unwrap();

    let restored = ProfileService::get_student_profile(&pool, user.id, RowScope::Active)
        .await
        .unwrap();
    assert!(!restored.deletion.is_deleted);
    assert!(restored.deletion.deleted_at.is_none());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_soft_delete_twice_is_not_found(pool: PgPool) {
    let user = create_test_user(&pool, &generate_unique_username(), "student").await;
    ProfileService::create_student_profile(&pool, student_profile_dto(user.id), None)
        .await
        .unwrap();

    ProfileService::soft_delete_profile(&pool, ProfileKind::Student, user.id, None)
        .await
        .unwrap();
    let err = ProfileService::soft_delete_profile(&pool, ProfileKind::Student, user.id, None)
        .await
        .unwrap_err();

    assert_eq!(err.status, StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_restore_requires_deleted_row(pool: PgPool) {
    let user = create_test_user(&pool, &generate_unique_username(), "student").await;
    ProfileService::create_student_profile(&pool, student_profile_dto(user.id), None)
        .await
        .unwrap();

    let err = ProfileService::restore_profile(&pool, ProfileKind::Student, user.id, None)
        .await
        .unwrap_err();

    assert_eq!(err.status, StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_scope_filtering(pool: PgPool) {
    let mut user_ids = Vec::new();
    for _ in 0..3 {
        let user = create_test_user(&pool, &generate_unique_username(), "student").await;
        ProfileService::create_student_profile(&pool, student_profile_dto(user.id), None)
            .await
            .unwrap();
        user_ids.push(user.id);
    }

    ProfileService::soft_delete_profile(&pool, ProfileKind::Student, user_ids[0], None)
        .await
        .unwrap();

    let pagination = PaginationParams::default();

    // Active view excludes the soft-deleted row
    let (active, active_total) =
        ProfileService::get_student_profiles(&pool, RowScope::Active, &pagination)
            .await
            .unwrap();
    assert_eq!(active_total, 2);
    assert!(active.iter().all(|p| p.user_id != user_ids[0]));

    // Deleted view returns exactly the soft-deleted row
    let (deleted, deleted_total) =
        ProfileService::get_student_profiles(&pool, RowScope::Deleted, &pagination)
            .await
            .unwrap();
    assert_eq!(deleted_total, 1);
    assert_eq!(deleted[0].user_id, user_ids[0]);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_duplicate_profile_rejected(pool: PgPool) {
    let user = create_test_user(&pool, &generate_unique_username(), "student").await;

    ProfileService::create_student_profile(&pool, student_profile_dto(user.id), None)
        .await
        .unwrap();
    let err = ProfileService::create_student_profile(&pool, student_profile_dto(user.id), None)
        .await
        .unwrap_err();

    assert_eq!(err.status, StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_profile_for_missing_user_rejected(pool: PgPool) {
    let err = ProfileService::create_student_profile(&pool, student_profile_dto(Uuid::new_v4()), None)
        .await
        .unwrap_err();

    assert_eq!(err.status, StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_update_ignores_deleted_profile(pool: PgPool) {
    let user = create_test_user(&pool, &generate_unique_username(), "student").await;
    ProfileService::create_user_profile(
        &pool,
        CreateUserProfileDto {
            user_id: user.id,
            phone: None,
            address: None,
            date_of_birth: None,
            bio: None,
        },
        None,
    )
    .await
    .unwrap();

    ProfileService::soft_delete_profile(&pool, ProfileKind::User, user.id, None)
        .await
        .unwrap();

    let err = ProfileService::update_user_profile(
        &pool,
        user.id,
        campuskit::modules::profiles::model::UpdateUserProfileDto {
            phone: Some("+15550100".to_string()),
            address: None,
            date_of_birth: None,
            bio: None,
        },
        None,
    )
    .await
    .unwrap_err();

    assert_eq!(err.status, StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_create_profile_stamps_audit_actor(pool: PgPool) {
    let admin_username = generate_unique_username();
    let admin = create_test_user(&pool, &admin_username, "admin").await;
    let student = create_test_user(&pool, &generate_unique_username(), "student").await;

    let app = setup_test_app(pool.clone());
    let token = get_auth_token(app.clone(), &admin_username, TEST_PASSWORD).await;

    let request = Request::builder()
        .method("POST")
        .uri("/api/profiles/students")
        .header("content-type", "application/json")
        .header("authorization", format!("Bearer {}", token))
        .body(Body::from(
            serde_json::to_string(&json!({
                "user_id": student.id,
                "current_class": "JSS 1"
            }))
            .unwrap(),
        ))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["created_by"], admin.id.to_string());
    assert_eq!(body["updated_by"], admin.id.to_string());
    assert_eq!(body["is_deleted"], false);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_student_cannot_touch_other_profiles(pool: PgPool) {
    let student_username = generate_unique_username();
    create_test_user(&pool, &student_username, "student").await;
    let other = create_test_user(&pool, &generate_unique_username(), "student").await;
    ProfileService::create_student_profile(&pool, student_profile_dto(other.id), None)
        .await
        .unwrap();

    let app = setup_test_app(pool);
    let token = get_auth_token(app.clone(), &student_username, TEST_PASSWORD).await;

    // Reading someone else's profile is forbidden
    let request = Request::builder()
        .method("GET")
        .uri(format!("/api/profiles/students/{}", other.id))
        .header("authorization", format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // Listing is admin-only
    let request = Request::builder()
        .method("GET")
        .uri("/api/profiles/students")
        .header("authorization", format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_owner_manages_own_profile_via_api(pool: PgPool) {
    let username = generate_unique_username();
    let user = create_test_user(&pool, &username, "student").await;

    let app = setup_test_app(pool);
    let token = get_auth_token(app.clone(), &username, TEST_PASSWORD).await;

    // Create own profile
    let request = Request::builder()
        .method("POST")
        .uri("/api/profiles/users")
        .header("content-type", "application/json")
        .header("authorization", format!("Bearer {}", token))
        .body(Body::from(
            serde_json::to_string(&json!({
                "user_id": user.id,
                "bio": "hello"
            }))
            .unwrap(),
        ))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    // Soft-delete it
    let request = Request::builder()
        .method("DELETE")
        .uri(format!("/api/profiles/users/{}", user.id))
        .header("authorization", format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // Restore it
    let request = Request::builder()
        .method("POST")
        .uri(format!("/api/profiles/users/{}/restore", user.id))
        .header("authorization", format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["is_deleted"], false);
    assert!(body["deleted_at"].is_null());
}
