use crate::{
    modules::users::model::{CreateUserDto, UpdateUserDto, User, UserFilterParams, UserRole},
    utils::{errors::AppError, password::hash_password},
};
use anyhow::Context;
use rand::Rng;
use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

const USER_COLUMNS: &str = "id, username, email, first_name, last_name, role, is_super, \
     employee_id, student_id, is_active, created_at, updated_at";

/// Identifier suffixes are five decimal digits, zero-padded.
const ID_SUFFIX_MODULUS: u32 = 100_000;

/// Prefix of the generated identifier for a role. Students get student
/// numbers; every staff role gets an employee number.
pub(crate) fn identifier_prefix(role: &UserRole) -> &'static str {
    match role {
        UserRole::Student => "STD",
        _ => "EMP",
    }
}

pub(crate) fn format_identifier(prefix: &str, suffix: u32) -> String {
    format!("{}{:05}", prefix, suffix)
}

pub struct UserService;

impl UserService {
    /// Generate an identifier no existing user holds.
    ///
    /// Plain collision-avoidance loop: roll a suffix, check both identifier
    /// columns, retry on collision. Unbounded, the suffix space (100k per
    /// prefix) dwarfs any realistic row count.
    #[instrument(skip(db))]
    pub async fn generate_unique_identifier(
        db: &PgPool,
        role: &UserRole,
    ) -> Result<String, AppError> {
        let prefix = identifier_prefix(role);

        loop {
            let suffix = rand::thread_rng().gen_range(0..ID_SUFFIX_MODULUS);
            let candidate = format_identifier(prefix, suffix);

            let exists: bool = sqlx::query_scalar(
                "SELECT EXISTS(SELECT 1 FROM users WHERE employee_id = $1 OR student_id = $1)",
            )
            .bind(&candidate)
            .fetch_one(db)
            .await
            .context("Failed to check identifier availability")
            .map_err(AppError::database)?;

            if !exists {
                return Ok(candidate);
            }
        }
    }

    /// Create a user, assigning the role-appropriate identifier.
    ///
    /// The identifier is assigned here, exactly once; no update path ever
    /// regenerates it.
    #[instrument(skip(db, dto))]
    pub async fn create_user(db: &PgPool, dto: CreateUserDto) -> Result<User, AppError> {
        let role = dto.role.unwrap_or_default();
        let hashed_password = hash_password(&dto.password)?;

        let identifier = Self::generate_unique_identifier(db, &role).await?;
        let (employee_id, student_id) = match role {
            UserRole::Student => (None, Some(identifier)),
            _ => (Some(identifier), None),
        };

        let user = sqlx::query_as::<_, User>(&format!(
            "INSERT INTO users (username, email, password, first_name, last_name, role, employee_id, student_id)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             RETURNING {USER_COLUMNS}"
        ))
        .bind(&dto.username)
        .bind(&dto.email)
        .bind(&hashed_password)
        .bind(&dto.first_name)
        .bind(&dto.last_name)
        .bind(role)
        .bind(employee_id)
        .bind(student_id)
        .fetch_one(db)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.is_unique_violation() {
                    return AppError::bad_request(anyhow::anyhow!(
                        "User with username {} or email {} already exists",
                        dto.username,
                        dto.email
                    ));
                }
            }
            AppError::database(anyhow::Error::from(e))
        })?;

        Ok(user)
    }

    #[instrument(skip(db, params))]
    pub async fn get_users(
        db: &PgPool,
        params: &UserFilterParams,
    ) -> Result<(Vec<User>, i64), AppError> {
        let limit = params.pagination.limit();
        let offset = params.pagination.offset();

        let users = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS}
             FROM users
             WHERE ($1::user_role IS NULL OR role = $1)
               AND ($2::text IS NULL OR username ILIKE '%' || $2 || '%')
               AND ($3::text IS NULL OR email ILIKE '%' || $3 || '%')
             ORDER BY created_at DESC
             LIMIT $4 OFFSET $5"
        ))
        .bind(params.role)
        .bind(&params.username)
        .bind(&params.email)
        .bind(limit)
        .bind(offset)
        .fetch_all(db)
        .await
        .context("Failed to fetch users")
        .map_err(AppError::database)?;

        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*)
             FROM users
             WHERE ($1::user_role IS NULL OR role = $1)
               AND ($2::text IS NULL OR username ILIKE '%' || $2 || '%')
               AND ($3::text IS NULL OR email ILIKE '%' || $3 || '%')",
        )
        .bind(params.role)
        .bind(&params.username)
        .bind(&params.email)
        .fetch_one(db)
        .await
        .context("Failed to count users")
        .map_err(AppError::database)?;

        Ok((users, total))
    }

    #[instrument(skip(db))]
    pub async fn get_user(db: &PgPool, id: Uuid) -> Result<User, AppError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(db)
        .await
        .context("Failed to fetch user by ID")
        .map_err(AppError::database)?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("User with id {} not found", id)))?;

        Ok(user)
    }

    /// Update a user. The identifier columns are deliberately not part of
    /// the statement: once assigned they never change, even across role
    /// changes.
    #[instrument(skip(db, dto))]
    pub async fn update_user(db: &PgPool, id: Uuid, dto: UpdateUserDto) -> Result<User, AppError> {
        let existing = Self::get_user(db, id).await?;

        let email = dto.email.unwrap_or(existing.email);
        let first_name = dto.first_name.unwrap_or(existing.first_name);
        let last_name = dto.last_name.unwrap_or(existing.last_name);
        let role = dto.role.unwrap_or(existing.role);
        let is_active = dto.is_active.unwrap_or(existing.is_active);

        let user = sqlx::query_as::<_, User>(&format!(
            "UPDATE users
             SET email = $1, first_name = $2, last_name = $3, role = $4, is_active = $5,
                 updated_at = NOW()
             WHERE id = $6
             RETURNING {USER_COLUMNS}"
        ))
        .bind(&email)
        .bind(&first_name)
        .bind(&last_name)
        .bind(role)
        .bind(is_active)
        .bind(id)
        .fetch_one(db)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.is_unique_violation() {
                    return AppError::bad_request(anyhow::anyhow!(
                        "User with email {} already exists",
                        email
                    ));
                }
            }
            AppError::database(anyhow::Error::from(e))
        })?;

        Ok(user)
    }

    /// Hard delete. The user row carries no soft-delete fields; profile rows
    /// referencing it go with it via ON DELETE CASCADE.
    #[instrument(skip(db))]
    pub async fn delete_user(db: &PgPool, id: Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(db)
            .await
            .context("Failed to delete user")
            .map_err(AppError::database)?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow::anyhow!(
                "User with id {} not found",
                id
            )));
        }

        Ok(())
    }
}
