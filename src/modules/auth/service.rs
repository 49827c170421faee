use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use crate::config::jwt::JwtConfig;
use crate::modules::users::model::UserRole;
use crate::utils::errors::AppError;
use crate::utils::jwt::{create_access_token, create_refresh_token, verify_refresh_token};
use crate::utils::password::verify_password;

use super::model::{
    AccessTokenResponse, TokenObtainRequest, TokenPairResponse, TokenRefreshRequest,
};

#[derive(sqlx::FromRow)]
struct AccountRow {
    id: Uuid,
    username: String,
    password: String,
    role: UserRole,
    is_active: bool,
}

pub struct AuthService;

impl AuthService {
    /// Verify credentials and mint an access/refresh token pair.
    #[instrument(skip(db, dto, jwt_config))]
    pub async fn obtain_token_pair(
        db: &PgPool,
        dto: TokenObtainRequest,
        jwt_config: &JwtConfig,
    ) -> Result<TokenPairResponse, AppError> {
        let account = sqlx::query_as::<_, AccountRow>(
            "SELECT id, username, password, role, is_active FROM users WHERE username = $1",
        )
        .bind(&dto.username)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::unauthorized("Invalid username or password"))?;

        let is_valid = verify_password(&dto.password, &account.password)?;
        if !is_valid {
            return Err(AppError::unauthorized("Invalid username or password"));
        }

        if !account.is_active {
            return Err(AppError::unauthorized("Account is inactive"));
        }

        let access =
            create_access_token(account.id, &account.username, &account.role, jwt_config)?;
        let refresh =
            create_refresh_token(account.id, &account.username, &account.role, jwt_config)?;

        Ok(TokenPairResponse { access, refresh })
    }

    /// Exchange a valid refresh token for a new access token.
    ///
    /// The account is re-read so a deactivated or deleted user stops being
    /// able to refresh, even with a still-valid refresh token.
    #[instrument(skip(db, dto, jwt_config))]
    pub async fn refresh_access_token(
        db: &PgPool,
        dto: TokenRefreshRequest,
        jwt_config: &JwtConfig,
    ) -> Result<AccessTokenResponse, AppError> {
        let claims = verify_refresh_token(&dto.refresh, jwt_config)?;

        let user_id = Uuid::parse_str(&claims.sub)
            .map_err(|_| AppError::unauthorized("Invalid token subject"))?;

        let account = sqlx::query_as::<_, AccountRow>(
            "SELECT id, username, password, role, is_active FROM users WHERE id = $1",
        )
        .bind(user_id)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::unauthorized("Account no longer exists"))?;

        if !account.is_active {
            return Err(AppError::unauthorized("Account is inactive"));
        }

        let access =
            create_access_token(account.id, &account.username, &account.role, jwt_config)?;

        Ok(AccessTokenResponse { access })
    }
}
