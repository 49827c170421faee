//! User data models and DTOs.
//!
//! This module contains all data structures related to account management:
//! the user entity, the role enumeration, and request/response DTOs.
//!
//! # Core Types
//!
//! - [`User`] - Base user entity from the database
//! - [`UserRole`] - The closed set of account roles
//!
//! # Request DTOs
//!
//! - [`CreateUserDto`] - Create a new user
//! - [`UpdateUserDto`] - Update an existing user
//! - [`UserFilterParams`] - Query parameters for filtering users

use crate::utils::pagination::{PaginationMeta, PaginationParams};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// Account role. The set is closed; the database enforces it through the
/// `user_role` Postgres enum.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema,
)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "user_role", rename_all = "lowercase")]
pub enum UserRole {
    Superadmin,
    Admin,
    Teacher,
    #[default]
    Student,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Superadmin => "superadmin",
            UserRole::Admin => "admin",
            UserRole::Teacher => "teacher",
            UserRole::Student => "student",
        }
    }

    pub fn all() -> [UserRole; 4] {
        [
            UserRole::Superadmin,
            UserRole::Admin,
            UserRole::Teacher,
            UserRole::Student,
        ]
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for UserRole {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "superadmin" => Ok(UserRole::Superadmin),
            "admin" => Ok(UserRole::Admin),
            "teacher" => Ok(UserRole::Teacher),
            "student" => Ok(UserRole::Student),
            other => Err(anyhow::anyhow!("Invalid role: {}", other)),
        }
    }
}

/// A user account.
///
/// Depending on role, exactly one of `employee_id`/`student_id` is assigned
/// when the row is first inserted and never changes afterwards. The password
/// hash is intentionally not part of this struct.
#[derive(Serialize, Deserialize, FromRow, Debug, Clone, PartialEq, Eq, ToSchema)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub role: UserRole,
    pub is_super: bool,
    pub employee_id: Option<String>,
    pub student_id: Option<String>,
    pub is_active: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl User {
    pub fn is_superadmin_role(&self) -> bool {
        self.role == UserRole::Superadmin
    }

    pub fn is_admin_role(&self) -> bool {
        self.role == UserRole::Admin
    }

    pub fn is_teacher_role(&self) -> bool {
        self.role == UserRole::Teacher
    }

    pub fn is_student_role(&self) -> bool {
        self.role == UserRole::Student
    }

    /// Whichever generated identifier this account carries.
    pub fn identifier(&self) -> Option<&str> {
        self.employee_id.as_deref().or(self.student_id.as_deref())
    }

    /// Display form used in logs: `username (role)`.
    pub fn display_name(&self) -> String {
        format!("{} ({})", self.username, self.role)
    }
}

/// DTO for creating a new user.
///
/// Role defaults to `student` when omitted. The matching identifier is
/// generated server-side; it cannot be supplied by the caller.
#[derive(Deserialize, Debug, Clone, Validate, ToSchema)]
pub struct CreateUserDto {
    #[validate(length(min = 1, max = 150))]
    pub username: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 8))]
    pub password: String,
    #[serde(default)]
    #[validate(length(max = 150))]
    pub first_name: String,
    #[serde(default)]
    #[validate(length(max = 150))]
    pub last_name: String,
    pub role: Option<UserRole>,
}

/// DTO for updating a user.
///
/// Absent fields keep their current values. The generated identifiers are
/// not updatable, by design — a role change does not regenerate them.
#[derive(Deserialize, Debug, Clone, Validate, ToSchema)]
pub struct UpdateUserDto {
    #[validate(email)]
    pub email: Option<String>,
    #[validate(length(max = 150))]
    pub first_name: Option<String>,
    #[validate(length(max = 150))]
    pub last_name: Option<String>,
    pub role: Option<UserRole>,
    pub is_active: Option<bool>,
}

/// Query parameters for filtering users.
///
/// All filters are optional and can be combined.
#[derive(Debug, Deserialize, ToSchema)]
pub struct UserFilterParams {
    pub role: Option<UserRole>,
    pub username: Option<String>,
    pub email: Option<String>,
    #[serde(flatten)]
    pub pagination: PaginationParams,
}

/// Paginated response containing users.
#[derive(Debug, Serialize, ToSchema)]
pub struct PaginatedUsersResponse {
    pub data: Vec<User>,
    pub meta: PaginationMeta,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn sample_user(role: UserRole) -> User {
        User {
            id: Uuid::new_v4(),
            username: "jdoe".to_string(),
            email: "jdoe@example.com".to_string(),
            first_name: "John".to_string(),
            last_name: "Doe".to_string(),
            role,
            is_super: false,
            employee_id: None,
            student_id: None,
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_role_default_is_student() {
        assert_eq!(UserRole::default(), UserRole::Student);
    }

    #[test]
    fn test_role_serde_round_trip() {
        for role in UserRole::all() {
            let json = serde_json::to_string(&role).unwrap();
            assert_eq!(json, format!("\"{}\"", role.as_str()));
            let back: UserRole = serde_json::from_str(&json).unwrap();
            assert_eq!(back, role);
        }
    }

    #[test]
    fn test_role_from_str() {
        assert_eq!("superadmin".parse::<UserRole>().unwrap(), UserRole::Superadmin);
        assert_eq!("admin".parse::<UserRole>().unwrap(), UserRole::Admin);
        assert_eq!("teacher".parse::<UserRole>().unwrap(), UserRole::Teacher);
        assert_eq!("student".parse::<UserRole>().unwrap(), UserRole::Student);
        assert!("superuser".parse::<UserRole>().is_err());
        assert!("".parse::<UserRole>().is_err());
    }

    #[test]
    fn test_role_predicates() {
        assert!(sample_user(UserRole::Superadmin).is_superadmin_role());
        assert!(sample_user(UserRole::Admin).is_admin_role());
        assert!(sample_user(UserRole::Teacher).is_teacher_role());
        assert!(sample_user(UserRole::Student).is_student_role());

        let student = sample_user(UserRole::Student);
        assert!(!student.is_superadmin_role());
        assert!(!student.is_admin_role());
        assert!(!student.is_teacher_role());
    }

    #[test]
    fn test_identifier_prefers_employee_id() {
        let mut user = sample_user(UserRole::Teacher);
        assert_eq!(user.identifier(), None);

        user.employee_id = Some("EMP00042".to_string());
        assert_eq!(user.identifier(), Some("EMP00042"));

        let mut student = sample_user(UserRole::Student);
        student.student_id = Some("STD00007".to_string());
        assert_eq!(student.identifier(), Some("STD00007"));
    }

    #[test]
    fn test_display_name() {
        let user = sample_user(UserRole::Teacher);
        assert_eq!(user.display_name(), "jdoe (teacher)");
    }

    #[test]
    fn test_create_user_dto_validation() {
        let dto = CreateUserDto {
            username: "jdoe".to_string(),
            email: "jdoe@example.com".to_string(),
            password: "password123".to_string(),
            first_name: "John".to_string(),
            last_name: "Doe".to_string(),
            role: Some(UserRole::Teacher),
        };
        assert!(dto.validate().is_ok());

        let dto_short_password = CreateUserDto {
            password: "short".to_string(),
            ..dto.clone()
        };
        assert!(dto_short_password.validate().is_err());

        let dto_bad_email = CreateUserDto {
            email: "not-an-email".to_string(),
            ..dto.clone()
        };
        assert!(dto_bad_email.validate().is_err());

        let dto_empty_username = CreateUserDto {
            username: "".to_string(),
            ..dto
        };
        assert!(dto_empty_username.validate().is_err());
    }

    #[test]
    fn test_create_user_dto_defaults() {
        let json = r#"{"username":"jdoe","email":"jdoe@example.com","password":"password123"}"#;
        let dto: CreateUserDto = serde_json::from_str(json).unwrap();
        assert_eq!(dto.first_name, "");
        assert_eq!(dto.last_name, "");
        assert!(dto.role.is_none());
    }

    #[test]
    fn test_user_serialization_has_no_password_field() {
        let user = sample_user(UserRole::Student);
        let serialized = serde_json::to_string(&user).unwrap();
        assert!(!serialized.contains("password"));
        assert!(serialized.contains("jdoe@example.com"));
    }
}
