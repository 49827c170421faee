use chrono::Utc;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use uuid::Uuid;

use crate::config::jwt::JwtConfig;
use crate::modules::auth::model::Claims;
use crate::modules::users::model::UserRole;
use crate::utils::errors::AppError;

pub const TOKEN_TYPE_ACCESS: &str = "access";
pub const TOKEN_TYPE_REFRESH: &str = "refresh";

pub fn create_access_token(
    user_id: Uuid,
    username: &str,
    role: &UserRole,
    jwt_config: &JwtConfig,
) -> Result<String, AppError> {
    create_token(
        user_id,
        username,
        role,
        TOKEN_TYPE_ACCESS,
        jwt_config.access_token_expiry,
        jwt_config,
    )
}

pub fn create_refresh_token(
    user_id: Uuid,
    username: &str,
    role: &UserRole,
    jwt_config: &JwtConfig,
) -> Result<String, AppError> {
    create_token(
        user_id,
        username,
        role,
        TOKEN_TYPE_REFRESH,
        jwt_config.refresh_token_expiry,
        jwt_config,
    )
}

fn create_token(
    user_id: Uuid,
    username: &str,
    role: &UserRole,
    token_type: &str,
    expiry: i64,
    jwt_config: &JwtConfig,
) -> Result<String, AppError> {
    let now = Utc::now().timestamp() as usize;
    let exp = now + expiry as usize;

    let claims = Claims {
        sub: user_id.to_string(),
        username: username.to_string(),
        role: role.as_str().to_string(),
        token_type: token_type.to_string(),
        exp,
        iat: now,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(jwt_config.secret.as_bytes()),
    )
    .map_err(|e| AppError::internal(anyhow::anyhow!("Failed to create token: {}", e)))
}

pub fn verify_token(token: &str, jwt_config: &JwtConfig) -> Result<Claims, AppError> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(jwt_config.secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|_| AppError::unauthorized("Invalid or expired token"))
}

/// Verify a token and require it to be a refresh token.
///
/// Access tokens are rejected here so a leaked short-lived access token
/// cannot be used to mint new credentials.
pub fn verify_refresh_token(token: &str, jwt_config: &JwtConfig) -> Result<Claims, AppError> {
    let claims = verify_token(token, jwt_config)?;

    if claims.token_type != TOKEN_TYPE_REFRESH {
        return Err(AppError::unauthorized("Token is not a refresh token"));
    }

    Ok(claims)
}
