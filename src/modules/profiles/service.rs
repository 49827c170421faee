use crate::{
    modules::profiles::model::{
        CreateStudentProfileDto, CreateTeacherProfileDto, CreateUserProfileDto, StudentProfile,
        TeacherProfile, UpdateStudentProfileDto, UpdateTeacherProfileDto, UpdateUserProfileDto,
        UserProfile,
    },
    utils::{audit::RowScope, errors::AppError, pagination::PaginationParams},
};
use anyhow::Context;
use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

const USER_PROFILE_COLUMNS: &str = "id, user_id, phone, address, date_of_birth, bio, \
     created_at, updated_at, created_by, updated_by, is_deleted, deleted_at";

const STUDENT_PROFILE_COLUMNS: &str =
    "id, user_id, enrollment_date, current_class, guardian_name, guardian_phone, \
     created_at, updated_at, created_by, updated_by, is_deleted, deleted_at";

const TEACHER_PROFILE_COLUMNS: &str = "id, user_id, hire_date, department, qualification, \
     created_at, updated_at, created_by, updated_by, is_deleted, deleted_at";

/// The three profile tables share their audit and soft-delete columns, so
/// the flag-flip operations are written once and dispatched by kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileKind {
    User,
    Student,
    Teacher,
}

impl ProfileKind {
    pub fn table(&self) -> &'static str {
        match self {
            ProfileKind::User => "user_profiles",
            ProfileKind::Student => "student_profiles",
            ProfileKind::Teacher => "teacher_profiles",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ProfileKind::User => "user profile",
            ProfileKind::Student => "student profile",
            ProfileKind::Teacher => "teacher profile",
        }
    }
}

fn map_insert_error(e: sqlx::Error, kind: ProfileKind, user_id: Uuid) -> AppError {
    if let sqlx::Error::Database(db_err) = &e {
        if db_err.is_unique_violation() {
            return AppError::bad_request(anyhow::anyhow!(
                "A {} already exists for user {}",
                kind.label(),
                user_id
            ));
        }
        if db_err.is_foreign_key_violation() {
            return AppError::bad_request(anyhow::anyhow!("User {} does not exist", user_id));
        }
    }
    AppError::database(anyhow::Error::from(e))
}

pub struct ProfileService;

impl ProfileService {
    // ---- user profiles -------------------------------------------------

    #[instrument(skip(db, dto))]
    pub async fn create_user_profile(
        db: &PgPool,
        dto: CreateUserProfileDto,
        actor: Option<Uuid>,
    ) -> Result<UserProfile, AppError> {
        let profile = sqlx::query_as::<_, UserProfile>(&format!(
            "INSERT INTO user_profiles (user_id, phone, address, date_of_birth, bio, created_by, updated_by)
             VALUES ($1, $2, $3, $4, $5, $6, $6)
             RETURNING {USER_PROFILE_COLUMNS}"
        ))
        .bind(dto.user_id)
        .bind(&dto.phone)
        .bind(&dto.address)
        .bind(dto.date_of_birth)
        .bind(&dto.bio)
        .bind(actor)
        .fetch_one(db)
        .await
        .map_err(|e| map_insert_error(e, ProfileKind::User, dto.user_id))?;

        Ok(profile)
    }

    #[instrument(skip(db))]
    pub async fn get_user_profile(
        db: &PgPool,
        user_id: Uuid,
        scope: RowScope,
    ) -> Result<UserProfile, AppError> {
        let profile = sqlx::query_as::<_, UserProfile>(&format!(
            "SELECT {USER_PROFILE_COLUMNS} FROM user_profiles WHERE user_id = $1 AND {}",
            scope.sql_predicate()
        ))
        .bind(user_id)
        .fetch_optional(db)
        .await
        .context("Failed to fetch user profile")
        .map_err(AppError::database)?
        .ok_or_else(|| {
            AppError::not_found(anyhow::anyhow!("User profile for user {} not found", user_id))
        })?;

        Ok(profile)
    }

    #[instrument(skip(db, dto))]
    pub async fn update_user_profile(
        db: &PgPool,
        user_id: Uuid,
        dto: UpdateUserProfileDto,
        actor: Option<Uuid>,
    ) -> Result<UserProfile, AppError> {
        let existing = Self::get_user_profile(db, user_id, RowScope::Active).await?;

        let phone = dto.phone.or(existing.phone);
        let address = dto.address.or(existing.address);
        let date_of_birth = dto.date_of_birth.or(existing.date_of_birth);
        let bio = dto.bio.or(existing.bio);

        let profile = sqlx::query_as::<_, UserProfile>(&format!(
            "UPDATE user_profiles
             SET phone = $1, address = $2, date_of_birth = $3, bio = $4,
                 updated_at = NOW(), updated_by = $5
             WHERE user_id = $6 AND is_deleted = FALSE
             RETURNING {USER_PROFILE_COLUMNS}"
        ))
        .bind(&phone)
        .bind(&address)
        .bind(date_of_birth)
        .bind(&bio)
        .bind(actor)
        .bind(user_id)
        .fetch_one(db)
        .await
        .context("Failed to update user profile")
        .map_err(AppError::database)?;

        Ok(profile)
    }

    #[instrument(skip(db, pagination))]
    pub async fn get_user_profiles(
        db: &PgPool,
        scope: RowScope,
        pagination: &PaginationParams,
    ) -> Result<(Vec<UserProfile>, i64), AppError> {
        let profiles = sqlx::query_as::<_, UserProfile>(&format!(
            "SELECT {USER_PROFILE_COLUMNS} FROM user_profiles WHERE {}
             ORDER BY created_at DESC LIMIT $1 OFFSET $2",
            scope.sql_predicate()
        ))
        .bind(pagination.limit())
        .bind(pagination.offset())
        .fetch_all(db)
        .await
        .context("Failed to fetch user profiles")
        .map_err(AppError::database)?;

        let total = Self::count_rows(db, ProfileKind::User, scope).await?;

        Ok((profiles, total))
    }

    // ---- student profiles ----------------------------------------------

    #[instrument(skip(db, dto))]
    pub async fn create_student_profile(
        db: &PgPool,
        dto: CreateStudentProfileDto,
        actor: Option<Uuid>,
    ) -> Result<StudentProfile, AppError> {
        let profile = sqlx::query_as::<_, StudentProfile>(&format!(
            "INSERT INTO student_profiles
                 (user_id, enrollment_date, current_class, guardian_name, guardian_phone,
                  created_by, updated_by)
             VALUES ($1, $2, $3, $4, $5, $6, $6)
             RETURNING {STUDENT_PROFILE_COLUMNS}"
        ))
        .bind(dto.user_id)
        .bind(dto.enrollment_date)
        .bind(&dto.current_class)
        .bind(&dto.guardian_name)
        .bind(&dto.guardian_phone)
        .bind(actor)
        .fetch_one(db)
        .await
        .map_err(|e| map_insert_error(e, ProfileKind::Student, dto.user_id))?;

        Ok(profile)
    }

    #[instrument(skip(db))]
    pub async fn get_student_profile(
        db: &PgPool,
        user_id: Uuid,
        scope: RowScope,
    ) -> Result<StudentProfile, AppError> {
        let profile = sqlx::query_as::<_, StudentProfile>(&format!(
            "SELECT {STUDENT_PROFILE_COLUMNS} FROM student_profiles WHERE user_id = $1 AND {}",
            scope.sql_predicate()
        ))
        .bind(user_id)
        .fetch_optional(db)
        .await
        .context("Failed to fetch student profile")
        .map_err(AppError::database)?
        .ok_or_else(|| {
            AppError::not_found(anyhow::anyhow!(
                "Student profile for user {} not found",
                user_id
            ))
        })?;

        Ok(profile)
    }

    #[instrument(skip(db, dto))]
    pub async fn update_student_profile(
        db: &PgPool,
        user_id: Uuid,
        dto: UpdateStudentProfileDto,
        actor: Option<Uuid>,
    ) -> Result<StudentProfile, AppError> {
        let existing = Self::get_student_profile(db, user_id, RowScope::Active).await?;

        let enrollment_date = dto.enrollment_date.or(existing.enrollment_date);
        let current_class = dto.current_class.or(existing.current_class);
        let guardian_name = dto.guardian_name.or(existing.guardian_name);
        let guardian_phone = dto.guardian_phone.or(existing.guardian_phone);

        let profile = sqlx::query_as::<_, StudentProfile>(&format!(
            "UPDATE student_profiles
             SET enrollment_date = $1, current_class = $2, guardian_name = $3,
                 guardian_phone = $4, updated_at = NOW(), updated_by = $5
             WHERE user_id = $6 AND is_deleted = FALSE
             RETURNING {STUDENT_PROFILE_COLUMNS}"
        ))
        .bind(enrollment_date)
        .bind(&current_class)
        .bind(&guardian_name)
        .bind(&guardian_phone)
        .bind(actor)
        .bind(user_id)
        .fetch_one(db)
        .await
        .context("Failed to update student profile")
        .map_err(AppError::database)?;

        Ok(profile)
    }

    #[instrument(skip(db, pagination))]
    pub async fn get_student_profiles(
        db: &PgPool,
        scope: RowScope,
        pagination: &PaginationParams,
    ) -> Result<(Vec<StudentProfile>, i64), AppError> {
        let profiles = sqlx::query_as::<_, StudentProfile>(&format!(
            "SELECT {STUDENT_PROFILE_COLUMNS} FROM student_profiles WHERE {}
             ORDER BY created_at DESC LIMIT $1 OFFSET $2",
            scope.sql_predicate()
        ))
        .bind(pagination.limit())
        .bind(pagination.offset())
        .fetch_all(db)
        .await
        .context("Failed to fetch student profiles")
        .map_err(AppError::database)?;

        let total = Self::count_rows(db, ProfileKind::Student, scope).await?;

        Ok((profiles, total))
    }

    // ---- teacher profiles ----------------------------------------------

    #[instrument(skip(db, dto))]
    pub async fn create_teacher_profile(
        db: &PgPool,
        dto: CreateTeacherProfileDto,
        actor: Option<Uuid>,
    ) -> Result<TeacherProfile, AppError> {
        let profile = sqlx::query_as::<_, TeacherProfile>(&format!(
            "INSERT INTO teacher_profiles
                 (user_id, hire_date, department, qualification, created_by, updated_by)
             VALUES ($1, $2, $3, $4, $5, $5)
             RETURNING {TEACHER_PROFILE_COLUMNS}"
        ))
        .bind(dto.user_id)
        .bind(dto.hire_date)
        .bind(&dto.department)
        .bind(&dto.qualification)
        .bind(actor)
        .fetch_one(db)
        .await
        .map_err(|e| map_insert_error(e, ProfileKind::Teacher, dto.user_id))?;

        Ok(profile)
    }

    #[instrument(skip(db))]
    pub async fn get_teacher_profile(
        db: &PgPool,
        user_id: Uuid,
        scope: RowScope,
    ) -> Result<TeacherProfile, AppError> {
        let profile = sqlx::query_as::<_, TeacherProfile>(&format!(
            "SELECT {TEACHER_PROFILE_COLUMNS} FROM teacher_profiles WHERE user_id = $1 AND {}",
            scope.sql_predicate()
        ))
        .bind(user_id)
        .fetch_optional(db)
        .await
        .context("Failed to fetch teacher profile")
        .map_err(AppError::database)?
        .ok_or_else(|| {
            AppError::not_found(anyhow::anyhow!(
                "Teacher profile for user {} not found",
                user_id
            ))
        })?;

        Ok(profile)
    }

    #[instrument(skip(db, dto))]
    pub async fn update_teacher_profile(
        db: &PgPool,
        user_id: Uuid,
        dto: UpdateTeacherProfileDto,
        actor: Option<Uuid>,
    ) -> Result<TeacherProfile, AppError> {
        let existing = Self::get_teacher_profile(db, user_id, RowScope::Active).await?;

        let hire_date = dto.hire_date.or(existing.hire_date);
        let department = dto.department.or(existing.department);
        let qualification = dto.qualification.or(existing.qualification);

        let profile = sqlx::query_as::<_, TeacherProfile>(&format!(
            "UPDATE teacher_profiles
             SET hire_date = $1, department = $2, qualification = $3,
                 updated_at = NOW(), updated_by = $4
             WHERE user_id = $5 AND is_deleted = FALSE
             RETURNING {TEACHER_PROFILE_COLUMNS}"
        ))
        .bind(hire_date)
        .bind(&department)
        .bind(&qualification)
        .bind(actor)
        .bind(user_id)
        .fetch_one(db)
        .await
        .context("Failed to update teacher profile")
        .map_err(AppError::database)?;

        Ok(profile)
    }

    #[instrument(skip(db, pagination))]
    pub async fn get_teacher_profiles(
        db: &PgPool,
        scope: RowScope,
        pagination: &PaginationParams,
    ) -> Result<(Vec<TeacherProfile>, i64), AppError> {
        let profiles = sqlx::query_as::<_, TeacherProfile>(&format!(
            "SELECT {TEACHER_PROFILE_COLUMNS} FROM teacher_profiles WHERE {}
             ORDER BY created_at DESC LIMIT $1 OFFSET $2",
            scope.sql_predicate()
        ))
        .bind(pagination.limit())
        .bind(pagination.offset())
        .fetch_all(db)
        .await
        .context("Failed to fetch teacher profiles")
        .map_err(AppError::database)?;

        let total = Self::count_rows(db, ProfileKind::Teacher, scope).await?;

        Ok((profiles, total))
    }

    // ---- shared soft-delete operations ---------------------------------

    /// Flip the soft-delete flag, capturing the deletion time.
    ///
    /// Already-deleted rows are left untouched; deleting one again is a 404,
    /// same as a row that never existed.
    #[instrument(skip(db))]
    pub async fn soft_delete_profile(
        db: &PgPool,
        kind: ProfileKind,
        user_id: Uuid,
        actor: Option<Uuid>,
    ) -> Result<(), AppError> {
        let result = sqlx::query(&format!(
            "UPDATE {} SET is_deleted = TRUE, deleted_at = NOW(),
                 updated_at = NOW(), updated_by = $2
             WHERE user_id = $1 AND is_deleted = FALSE",
            kind.table()
        ))
        .bind(user_id)
        .bind(actor)
        .execute(db)
        .await
        .context("Failed to soft-delete profile")
        .map_err(AppError::database)?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow::anyhow!(
                "No active {} for user {}",
                kind.label(),
                user_id
            )));
        }

        Ok(())
    }

    /// Reverse a soft delete, clearing both flag and timestamp.
    #[instrument(skip(db))]
    pub async fn restore_profile(
        db: &PgPool,
        kind: ProfileKind,
        user_id: Uuid,
        actor: Option<Uuid>,
    ) -> Result<(), AppError> {
        let result = sqlx::query(&format!(
            "UPDATE {} SET is_deleted = FALSE, deleted_at = NULL,
                 updated_at = NOW(), updated_by = $2
             WHERE user_id = $1 AND is_deleted = TRUE",
            kind.table()
        ))
        .bind(user_id)
        .bind(actor)
        .execute(db)
        .await
        .context("Failed to restore profile")
        .map_err(AppError::database)?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow::anyhow!(
                "No soft-deleted {} for user {}",
                kind.label(),
                user_id
            )));
        }

        Ok(())
    }

    async fn count_rows(db: &PgPool, kind: ProfileKind, scope: RowScope) -> Result<i64, AppError> {
        sqlx::query_scalar(&format!(
            "SELECT COUNT(*) FROM {} WHERE {}",
            kind.table(),
            scope.sql_predicate()
        ))
        .fetch_one(db)
        .await
        .context("Failed to count profiles")
        .map_err(AppError::database)
    }
}
