use crate::middleware::auth::AuthUser;
use crate::middleware::role::is_admin;
use crate::modules::auth::controller::ErrorResponse;
use crate::modules::profiles::model::{
    CreateStudentProfileDto, CreateTeacherProfileDto, CreateUserProfileDto,
    PaginatedStudentProfilesResponse, PaginatedTeacherProfilesResponse,
    PaginatedUserProfilesResponse, ProfileListParams, StudentProfile, TeacherProfile,
    UpdateStudentProfileDto, UpdateTeacherProfileDto, UpdateUserProfileDto, UserProfile,
};
use crate::modules::profiles::service::{ProfileKind, ProfileService};
use crate::state::AppState;
use crate::utils::audit::RowScope;
use crate::utils::errors::AppError;
use crate::utils::pagination::PaginationMeta;
use crate::validator::ValidatedJson;
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde_json::json;
use tracing::instrument;
use uuid::Uuid;

fn ensure_admin(auth_user: &AuthUser) -> Result<(), AppError> {
    if is_admin(auth_user)? {
        Ok(())
    } else {
        Err(AppError::forbidden("Administrator privileges required"))
    }
}

/// Profiles are managed by their owning user or by an administrator.
fn ensure_owner_or_admin(auth_user: &AuthUser, owner: Uuid) -> Result<(), AppError> {
    if is_admin(auth_user)? || auth_user.user_id()? == owner {
        Ok(())
    } else {
        Err(AppError::forbidden("You can only manage your own profile"))
    }
}

fn paginated_meta(params: &ProfileListParams, total: i64) -> PaginationMeta {
    let limit = params.pagination.limit();
    let offset = params.pagination.offset();
    PaginationMeta {
        total,
        limit,
        offset: Some(offset),
        page: params.pagination.page(),
        has_more: offset + limit < total,
    }
}

// ---- user profiles -----------------------------------------------------

/// Create a user profile
#[utoipa::path(
    post,
    path = "/api/profiles/users",
    request_body = CreateUserProfileDto,
    responses(
        (status = 201, description = "Profile created", body = UserProfile),
        (status = 400, description = "Bad request", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Profiles"
)]
#[instrument(skip(state, auth_user, dto))]
pub async fn create_user_profile(
    State(state): State<AppState>,
    auth_user: AuthUser,
    ValidatedJson(dto): ValidatedJson<CreateUserProfileDto>,
) -> Result<(StatusCode, Json<UserProfile>), AppError> {
    ensure_owner_or_admin(&auth_user, dto.user_id)?;
    let actor = auth_user.user_id().ok();
    let profile = ProfileService::create_user_profile(&state.db, dto, actor).await?;
    Ok((StatusCode::CREATED, Json(profile)))
}

/// List user profiles
#[utoipa::path(
    get,
    path = "/api/profiles/users",
    params(
        ("deleted" = Option<bool>, Query, description = "List soft-deleted profiles instead of active ones"),
        ("limit" = Option<i64>, Query, description = "Page size"),
        ("page" = Option<i64>, Query, description = "Page number"),
    ),
    responses(
        (status = 200, description = "List of user profiles", body = PaginatedUserProfilesResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden - Admin only", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Profiles"
)]
#[instrument(skip(state, auth_user, params))]
pub async fn get_user_profiles(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Query(params): Query<ProfileListParams>,
) -> Result<Json<PaginatedUserProfilesResponse>, AppError> {
    ensure_admin(&auth_user)?;
    let scope = RowScope::from_deleted_flag(params.deleted);
    let (profiles, total) =
        ProfileService::get_user_profiles(&state.db, scope, &params.pagination).await?;
    Ok(Json(PaginatedUserProfilesResponse {
        meta: paginated_meta(&params, total),
        data: profiles,
    }))
}

/// Get a user profile by owning user
#[utoipa::path(
    get,
    path = "/api/profiles/users/{user_id}",
    params(("user_id" = Uuid, Path, description = "Owning user ID")),
    responses(
        (status = 200, description = "Profile details", body = UserProfile),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden", body = ErrorResponse),
        (status = 404, description = "Profile not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Profiles"
)]
#[instrument(skip(state, auth_user))]
pub async fn get_user_profile(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(user_id): Path<Uuid>,
) -> Result<Json<UserProfile>, AppError> {
    ensure_owner_or_admin(&auth_user, user_id)?;
    let profile = ProfileService::get_user_profile(&state.db, user_id, RowScope::Active).await?;
    Ok(Json(profile))
}

/// Update a user profile
#[utoipa::path(
    put,
    path = "/api/profiles/users/{user_id}",
    params(("user_id" = Uuid, Path, description = "Owning user ID")),
    request_body = UpdateUserProfileDto,
    responses(
        (status = 200, description = "Profile updated", body = UserProfile),
        (status = 400, description = "Bad request", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden", body = ErrorResponse),
        (status = 404, description = "Profile not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Profiles"
)]
#[instrument(skip(state, auth_user, dto))]
pub async fn update_user_profile(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(user_id): Path<Uuid>,
    ValidatedJson(dto): ValidatedJson<UpdateUserProfileDto>,
) -> Result<Json<UserProfile>, AppError> {
    ensure_owner_or_admin(&auth_user, user_id)?;
    let actor = auth_user.user_id().ok();
    let profile = ProfileService::update_user_profile(&state.db, user_id, dto, actor).await?;
    Ok(Json(profile))
}

/// Soft-delete a user profile
#[utoipa::path(
    delete,
    path = "/api/profiles/users/{user_id}",
    params(("user_id" = Uuid, Path, description = "Owning user ID")),
    responses(
        (status = 200, description = "Profile soft-deleted"),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden", body = ErrorResponse),
        (status = 404, description = "No active profile", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Profiles"
)]
#[instrument(skip(state, auth_user))]
pub async fn delete_user_profile(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(user_id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, AppError> {
    ensure_owner_or_admin(&auth_user, user_id)?;
    let actor = auth_user.user_id().ok();
    ProfileService::soft_delete_profile(&state.db, ProfileKind::User, user_id, actor).await?;
    Ok(Json(json!({"message": "Profile deleted successfully"})))
}

/// Restore a soft-deleted user profile
#[utoipa::path(
    post,
    path = "/api/profiles/users/{user_id}/restore",
    params(("user_id" = Uuid, Path, description = "Owning user ID")),
    responses(
        (status = 200, description = "Profile restored", body = UserProfile),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden", body = ErrorResponse),
        (status = 404, description = "No soft-deleted profile", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Profiles"
)]
#[instrument(skip(state, auth_user))]
pub async fn restore_user_profile(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(user_id): Path<Uuid>,
) -> Result<Json<UserProfile>, AppError> {
    ensure_owner_or_admin(&auth_user, user_id)?;
    let actor = auth_user.user_id().ok();
    ProfileService::restore_profile(&state.db, ProfileKind::User, user_id, actor).await?;
    let profile = ProfileService::get_user_profile(&state.db, user_id, RowScope::Active).await?;
    Ok(Json(profile))
}

// ---- student profiles --------------------------------------------------

/// Create a student profile
#[utoipa::path(
    post,
    path = "/api/profiles/students",
    request_body = CreateStudentProfileDto,
    responses(
        (status = 201, description = "Profile created", body = StudentProfile),
        (status = 400, description = "Bad request", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Profiles"
)]
#[instrument(skip(state, auth_user, dto))]
pub async fn create_student_profile(
    State(state): State<AppState>,
    auth_user: AuthUser,
    ValidatedJson(dto): ValidatedJson<CreateStudentProfileDto>,
) -> Result<(StatusCode, Json<StudentProfile>), AppError> {
    ensure_owner_or_admin(&auth_user, dto.user_id)?;
    let actor = auth_user.user_id().ok();
    let profile = ProfileService::create_student_profile(&state.db, dto, actor).await?;
    Ok((StatusCode::CREATED, Json(profile)))
}

/// List student profiles
#[utoipa::path(
    get,
    path = "/api/profiles/students",
    params(
        ("deleted" = Option<bool>, Query, description = "List soft-deleted profiles instead of active ones"),
        ("limit" = Option<i64>, Query, description = "Page size"),
        ("page" = Option<i64>, Query, description = "Page number"),
    ),
    responses(
        (status = 200, description = "List of student profiles", body = PaginatedStudentProfilesResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden - Admin only", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Profiles"
)]
#[instrument(skip(state, auth_user, params))]
pub async fn get_student_profiles(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Query(params): Query<ProfileListParams>,
) -> Result<Json<PaginatedStudentProfilesResponse>, AppError> {
    ensure_admin(&auth_user)?;
    let scope = RowScope::from_deleted_flag(params.deleted);
    let (profiles, total) =
        ProfileService::get_student_profiles(&state.db, scope, &params.pagination).await?;
    Ok(Json(PaginatedStudentProfilesResponse {
        meta: paginated_meta(&params, total),
        data: profiles,
    }))
}

/// Get a student profile by owning user
#[utoipa::path(
    get,
    path = "/api/profiles/students/{user_id}",
    params(("user_id" = Uuid, Path, description = "Owning user ID")),
    responses(
        (status = 200, description = "Profile details", body = StudentProfile),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden", body = ErrorResponse),
        (status = 404, description = "Profile not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Profiles"
)]
#[instrument(skip(state, auth_user))]
pub async fn get_student_profile(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(user_id): Path<Uuid>,
) -> Result<Json<StudentProfile>, AppError> {
    ensure_owner_or_admin(&auth_user, user_id)?;
    let profile = ProfileService::get_student_profile(&state.db, user_id, RowScope::Active).await?;
    Ok(Json(profile))
}

/// Update a student profile
#[utoipa::path(
    put,
    path = "/api/profiles/students/{user_id}",
    params(("user_id" = Uuid, Path, description = "Owning user ID")),
    request_body = UpdateStudentProfileDto,
    responses(
        (status = 200, description = "Profile updated", body = StudentProfile),
        (status = 400, description = "Bad request", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden", body = ErrorResponse),
        (status = 404, description = "Profile not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Profiles"
)]
#[instrument(skip(state, auth_user, dto))]
pub async fn update_student_profile(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(user_id): Path<Uuid>,
    ValidatedJson(dto): ValidatedJson<UpdateStudentProfileDto>,
) -> Result<Json<StudentProfile>, AppError> {
    ensure_owner_or_admin(&auth_user, user_id)?;
    let actor = auth_user.user_id().ok();
    let profile = ProfileService::update_student_profile(&state.db, user_id, dto, actor).await?;
    Ok(Json(profile))
}

/// Soft-delete a student profile
#[utoipa::path(
    delete,
    path = "/api/profiles/students/{user_id}",
    params(("user_id" = Uuid, Path, description = "Owning user ID")),
    responses(
        (status = 200, description = "Profile soft-deleted"),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden", body = ErrorResponse),
        (status = 404, description = "No active profile", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Profiles"
)]
#[instrument(skip(state, auth_user))]
pub async fn delete_student_profile(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(user_id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, AppError> {
    ensure_owner_or_admin(&auth_user, user_id)?;
    let actor = auth_user.user_id().ok();
    ProfileService::soft_delete_profile(&state.db, ProfileKind::Student, user_id, actor).await?;
    Ok(Json(json!({"message": "Profile deleted successfully"})))
}

/// Restore a soft-deleted student profile
#[utoipa::path(
    post,
    path = "/api/profiles/students/{user_id}/restore",
    params(("user_id" = Uuid, Path, description = "Owning user ID")),
    responses(
        (status = 200, description = "Profile restored", body = StudentProfile),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden", body = ErrorResponse),
        (status = 404, description = "No soft-deleted profile", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Profiles"
)]
#[instrument(skip(state, auth_user))]
pub async fn restore_student_profile(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(user_id): Path<Uuid>,
) -> Result<Json<StudentProfile>, AppError> {
    ensure_owner_or_admin(&auth_user, user_id)?;
    let actor = auth_user.user_id().ok();
    ProfileService::restore_profile(&state.db, ProfileKind::Student, user_id, actor).await?;
    let profile = ProfileService::get_student_profile(&state.db, user_id, RowScope::Active).await?;
    Ok(Json(profile))
}

// ---- teacher profiles --------------------------------------------------

/// Create a teacher profile
#[utoipa::path(
    post,
    path = "/api/profiles/teachers",
    request_body = CreateTeacherProfileDto,
    responses(
        (status = 201, description = "Profile created", body = TeacherProfile),
        (status = 400, description = "Bad request", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Profiles"
)]
#[instrument(skip(state, auth_user, dto))]
pub async fn create_teacher_profile(
    State(state): State<AppState>,
    auth_user: AuthUser,
    ValidatedJson(dto): ValidatedJson<CreateTeacherProfileDto>,
) -> Result<(StatusCode, Json<TeacherProfile>), AppError> {
    ensure_owner_or_admin(&auth_user, dto.user_id)?;
    let actor = auth_user.user_id().ok();
    let profile = ProfileService::create_teacher_profile(&state.db, dto, actor).await?;
    Ok((StatusCode::CREATED, Json(profile)))
}

/// List teacher profiles
#[utoipa::path(
    get,
    path = "/api/profiles/teachers",
    params(
        ("deleted" = Option<bool>, Query, description = "List soft-deleted profiles instead of active ones"),
        ("limit" = Option<i64>, Query, description = "Page size"),
        ("page" = Option<i64>, Query, description = "Page number"),
    ),
    responses(
        (status = 200, description = "List of teacher profiles", body = PaginatedTeacherProfilesResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden - Admin only", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Profiles"
)]
#[instrument(skip(state, auth_user, params))]
pub async fn get_teacher_profiles(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Query(params): Query<ProfileListParams>,
) -> Result<Json<PaginatedTeacherProfilesResponse>, AppError> {
    ensure_admin(&auth_user)?;
    let scope = RowScope::from_deleted_flag(params.deleted);
    let (profiles, total) =
        ProfileService::get_teacher_profiles(&state.db, scope, &params.pagination).await?;
    Ok(Json(PaginatedTeacherProfilesResponse {
        meta: paginated_meta(&params, total),
        data: profiles,
    }))
}

/// Get a teacher profile by owning user
#[utoipa::path(
    get,
    path = "/api/profiles/teachers/{user_id}",
    params(("user_id" = Uuid, Path, description = "Owning user ID")),
    responses(
        (status = 200, description = "Profile details", body = TeacherProfile),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden", body = ErrorResponse),
        (status = 404, description = "Profile not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Profiles"
)]
#[instrument(skip(state, auth_user))]
pub async fn get_teacher_profile(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(user_id): Path<Uuid>,
) -> Result<Json<TeacherProfile>, AppError> {
    ensure_owner_or_admin(&auth_user, user_id)?;
    let profile = ProfileService::get_teacher_profile(&state.db, user_id, RowScope::Active).await?;
    Ok(Json(profile))
}

/// Update a teacher profile
#[utoipa::path(
    put,
    path = "/api/profiles/teachers/{user_id}",
    params(("user_id" = Uuid, Path, description = "Owning user ID")),
    request_body = UpdateTeacherProfileDto,
    responses(
        (status = 200, description = "Profile updated", body = TeacherProfile),
        (status = 400, description = "Bad request", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden", body = ErrorResponse),
        (status = 404, description = "Profile not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Profiles"
)]
#[instrument(skip(state, auth_user, dto))]
pub async fn update_teacher_profile(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(user_id): Path<Uuid>,
    ValidatedJson(dto): ValidatedJson<UpdateTeacherProfileDto>,
) -> Result<Json<TeacherProfile>, AppError> {
    ensure_owner_or_admin(&auth_user, user_id)?;
    let actor = auth_user.user_id().ok();
    let profile = ProfileService::update_teacher_profile(&state.db, user_id, dto, actor).await?;
    Ok(Json(profile))
}

/// Soft-delete a teacher profile
#[utoipa::path(
    delete,
    path = "/api/profiles/teachers/{user_id}",
    params(("user_id" = Uuid, Path, description = "Owning user ID")),
    responses(
        (status = 200, description = "Profile soft-deleted"),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden", body = ErrorResponse),
        (status = 404, description = "No active profile", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Profiles"
)]
#[instrument(skip(state, auth_user))]
pub async fn delete_teacher_profile(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(user_id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, AppError> {
    ensure_owner_or_admin(&auth_user, user_id)?;
    let actor = auth_user.user_id().ok();
    ProfileService::soft_delete_profile(&state.db, ProfileKind::Teacher, user_id, actor).await?;
    Ok(Json(json!({"message": "Profile deleted successfully"})))
}

/// Restore a soft-deleted teacher profile
#[utoipa::path(
    post,
    path = "/api/profiles/teachers/{user_id}/restore",
    params(("user_id" = Uuid, Path, description = "Owning user ID")),
    responses(
        (status = 200, description = "Profile restored", body = TeacherProfile),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden", body = ErrorResponse),
        (status = 404, description = "No soft-deleted profile", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Profiles"
)]
#[instrument(skip(state, auth_user))]
pub async fn restore_teacher_profile(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(user_id): Path<Uuid>,
) -> Result<Json<TeacherProfile>, AppError> {
    ensure_owner_or_admin(&auth_user, user_id)?;
    let actor = auth_user.user_id().ok();
    ProfileService::restore_profile(&state.db, ProfileKind::Teacher, user_id, actor).await?;
    let profile = ProfileService::get_teacher_profile(&state.db, user_id, RowScope::Active).await?;
    Ok(Json(profile))
}
