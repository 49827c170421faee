use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::modules::auth::controller::ErrorResponse;
use crate::modules::auth::model::{
    AccessTokenResponse, TokenObtainRequest, TokenPairResponse, TokenRefreshRequest,
};
use crate::modules::profiles::model::{
    CreateStudentProfileDto, CreateTeacherProfileDto, CreateUserProfileDto,
    PaginatedStudentProfilesResponse, PaginatedTeacherProfilesResponse,
    PaginatedUserProfilesResponse, ProfileListParams, StudentProfile, TeacherProfile,
    UpdateStudentProfileDto, UpdateTeacherProfileDto, UpdateUserProfileDto, UserProfile,
};
use crate::modules::users::model::{
    CreateUserDto, PaginatedUsersResponse, UpdateUserDto, User, UserFilterParams, UserRole,
};
use crate::utils::audit::{AuditStamp, SoftDeleteState};
use crate::utils::pagination::{PaginationMeta, PaginationParams};

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::modules::auth::controller::obtain_token,
        crate::modules::auth::controller::refresh_token,
        crate::modules::users::controller::create_user,
        crate::modules::users::controller::get_users,
        crate::modules::users::controller::get_me,
        crate::modules::users::controller::get_user,
        crate::modules::users::controller::update_user,
        crate::modules::users::controller::delete_user,
        crate::modules::profiles::controller::create_user_profile,
        crate::modules::profiles::controller::get_user_profiles,
        crate::modules::profiles::controller::get_user_profile,
        crate::modules::profiles::controller::update_user_profile,
        crate::modules::profiles::controller::delete_user_profile,
        crate::modules::profiles::controller::restore_user_profile,
        crate::modules::profiles::controller::create_student_profile,
        crate::modules::profiles::controller::get_student_profiles,
        crate::modules::profiles::controller::get_student_profile,
        crate::modules::profiles::controller::update_student_profile,
        crate::modules::profiles::controller::delete_student_profile,
        crate::modules::profiles::controller::restore_student_profile,
        crate::modules::profiles::controller::create_teacher_profile,
        crate::modules::profiles::controller::get_teacher_profiles,
        crate::modules::profiles::controller::get_teacher_profile,
        crate::modules::profiles::controller::update_teacher_profile,
        crate::modules::profiles::controller::delete_teacher_profile,
        crate::modules::profiles::controller::restore_teacher_profile,
    ),
    components(
        schemas(
            User,
            UserRole,
            CreateUserDto,
            UpdateUserDto,
            UserFilterParams,
            PaginatedUsersResponse,
            TokenObtainRequest,
            TokenPairResponse,
            TokenRefreshRequest,
            AccessTokenResponse,
            ErrorResponse,
            UserProfile,
            StudentProfile,
            TeacherProfile,
            CreateUserProfileDto,
            UpdateUserProfileDto,
            CreateStudentProfileDto,
            UpdateStudentProfileDto,
            CreateTeacherProfileDto,
            UpdateTeacherProfileDto,
            ProfileListParams,
            PaginatedUserProfilesResponse,
            PaginatedStudentProfilesResponse,
            PaginatedTeacherProfilesResponse,
            AuditStamp,
            SoftDeleteState,
            PaginationMeta,
            PaginationParams,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Authentication", description = "Token issuance and refresh"),
        (name = "Users", description = "User account management"),
        (name = "Profiles", description = "User, student, and teacher profile records")
    ),
    info(
        title = "Campuskit API",
        version = "0.1.0",
        description = "A school-management REST API built with Rust, Axum, and PostgreSQL featuring JWT-based authentication.",
        contact(
            name = "API Support",
            email = "support@campuskit.dev"
        ),
        license(
            name = "MIT"
        )
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            )
        }
    }
}
