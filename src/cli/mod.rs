use sqlx::PgPool;

use crate::modules::users::model::{CreateUserDto, UserRole};
use crate::modules::users::service::UserService;

/// Bootstrap a superadmin account outside the API.
///
/// Superadmins cannot be created through HTTP, so the first account comes
/// from here. Returns the generated employee identifier.
pub async fn create_superadmin(
    db: &PgPool,
    username: &str,
    email: &str,
    password: &str,
) -> Result<String, Box<dyn std::error::Error>> {
    let dto = CreateUserDto {
        username: username.to_string(),
        email: email.to_string(),
        password: password.to_string(),
        first_name: String::new(),
        last_name: String::new(),
        role: Some(UserRole::Superadmin),
    };

    let user = UserService::create_user(db, dto)
        .await
        .map_err(|e| e.error.to_string())?;

    sqlx::query("UPDATE users SET is_super = TRUE WHERE id = $1")
        .bind(user.id)
        .execute(db)
        .await?;

    Ok(user.employee_id.unwrap_or_default())
}
