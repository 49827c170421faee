//! Profile data models and DTOs.
//!
//! Each profile record is owned 1:1 by a user and carries the shared audit
//! block ([`AuditStamp`] + [`SoftDeleteState`]):
//!
//! - [`UserProfile`] - descriptive/contact attributes, any role
//! - [`StudentProfile`] - academic attributes
//! - [`TeacherProfile`] - employment attributes
//!
//! The role ↔ profile-kind correspondence is a convention, not a data-layer
//! constraint: nothing stops an admin from attaching a teacher profile to a
//! student account.

use crate::utils::audit::{AuditStamp, SoftDeleteState};
use crate::utils::pagination::{PaginationMeta, PaginationParams};
use crate::utils::serde::deserialize_optional_bool;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// Descriptive/contact record, one per user.
#[derive(Serialize, Deserialize, FromRow, Debug, Clone, PartialEq, Eq, ToSchema)]
pub struct UserProfile {
    pub id: Uuid,
    pub user_id: Uuid,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub bio: Option<String>,
    #[serde(flatten)]
    #[sqlx(flatten)]
    pub audit: AuditStamp,
    #[serde(flatten)]
    #[sqlx(flatten)]
    pub deletion: SoftDeleteState,
}

/// Academic record, one per student.
#[derive(Serialize, Deserialize, FromRow, Debug, Clone, PartialEq, Eq, ToSchema)]
pub struct StudentProfile {
    pub id: Uuid,
    pub user_id: Uuid,
    pub enrollment_date: Option<NaiveDate>,
    pub current_class: Option<String>,
    pub guardian_name: Option<String>,
    pub guardian_phone: Option<String>,
    #[serde(flatten)]
    #[sqlx(flatten)]
    pub audit: AuditStamp,
    #[serde(flatten)]
    #[sqlx(flatten)]
    pub deletion: SoftDeleteState,
}

/// Employment record, one per teacher.
#[derive(Serialize, Deserialize, FromRow, Debug, Clone, PartialEq, Eq, ToSchema)]
pub struct TeacherProfile {
    pub id: Uuid,
    pub user_id: Uuid,
    pub hire_date: Option<NaiveDate>,
    pub department: Option<String>,
    pub qualification: Option<String>,
    #[serde(flatten)]
    #[sqlx(flatten)]
    pub audit: AuditStamp,
    #[serde(flatten)]
    #[sqlx(flatten)]
    pub deletion: SoftDeleteState,
}

#[derive(Deserialize, Debug, Clone, Validate, ToSchema)]
pub struct CreateUserProfileDto {
    pub user_id: Uuid,
    #[validate(length(max = 32))]
    pub phone: Option<String>,
    pub address: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub bio: Option<String>,
}

#[derive(Deserialize, Debug, Clone, Validate, ToSchema)]
pub struct UpdateUserProfileDto {
    #[validate(length(max = 32))]
    pub phone: Option<String>,
    pub address: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub bio: Option<String>,
}

#[derive(Deserialize, Debug, Clone, Validate, ToSchema)]
pub struct CreateStudentProfileDto {
    pub user_id: Uuid,
    pub enrollment_date: Option<NaiveDate>,
    #[validate(length(max = 100))]
    pub current_class: Option<String>,
    #[validate(length(max = 255))]
    pub guardian_name: Option<String>,
    #[validate(length(max = 32))]
    pub guardian_phone: Option<String>,
}

#[derive(Deserialize, Debug, Clone, Validate, ToSchema)]
pub struct UpdateStudentProfileDto {
    pub enrollment_date: Option<NaiveDate>,
    #[validate(length(max = 100))]
    pub current_class: Option<String>,
    #[validate(length(max = 255))]
    pub guardian_name: Option<String>,
    #[validate(length(max = 32))]
    pub guardian_phone: Option<String>,
}

#[derive(Deserialize, Debug, Clone, Validate, ToSchema)]
pub struct CreateTeacherProfileDto {
    pub user_id: Uuid,
    pub hire_date: Option<NaiveDate>,
    #[validate(length(max = 100))]
    pub department: Option<String>,
    #[validate(length(max = 255))]
    pub qualification: Option<String>,
}

#[derive(Deserialize, Debug, Clone, Validate, ToSchema)]
pub struct UpdateTeacherProfileDto {
    pub hire_date: Option<NaiveDate>,
    #[validate(length(max = 100))]
    pub department: Option<String>,
    #[validate(length(max = 255))]
    pub qualification: Option<String>,
}

/// Query parameters for profile listings.
///
/// `deleted=true` switches to the deleted-only view; anything else lists
/// active rows.
#[derive(Debug, Deserialize, ToSchema)]
pub struct ProfileListParams {
    #[serde(default, deserialize_with = "deserialize_optional_bool")]
    pub deleted: Option<bool>,
    #[serde(flatten)]
    pub pagination: PaginationParams,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PaginatedUserProfilesResponse {
    pub data: Vec<UserProfile>,
    pub meta: PaginationMeta,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PaginatedStudentProfilesResponse {
    pub data: Vec<StudentProfile>,
    pub meta: PaginationMeta,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PaginatedTeacherProfilesResponse {
    pub data: Vec<TeacherProfile>,
    pub meta: PaginationMeta,
}
