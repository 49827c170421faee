use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts},
};

use crate::modules::auth::model::Claims;
use crate::modules::users::model::UserRole;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::utils::jwt::{TOKEN_TYPE_ACCESS, verify_token};

/// Extractor that validates the bearer JWT and provides the authenticated
/// user's claims. Refresh tokens are rejected; only access tokens
/// authenticate API requests.
#[derive(Debug, Clone)]
pub struct AuthUser(pub Claims);

impl AuthUser {
    /// Get the user ID as UUID
    pub fn user_id(&self) -> Result<uuid::Uuid, AppError> {
        uuid::Uuid::parse_str(&self.0.sub)
            .map_err(|_| AppError::unauthorized("Invalid user ID in token"))
    }

    /// Get the user's username
    pub fn username(&self) -> &str {
        &self.0.username
    }

    /// Parse the role carried in the claims
    pub fn role(&self) -> Result<UserRole, AppError> {
        self.0
            .role
            .parse::<UserRole>()
            .map_err(|_| AppError::unauthorized("Invalid role in token"))
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| AppError::unauthorized("Missing authorization header"))?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or_else(|| AppError::unauthorized("Invalid authorization header format"))?;

        let claims = verify_token(token, &state.jwt_config)?;

        if claims.token_type != TOKEN_TYPE_ACCESS {
            return Err(AppError::unauthorized(
                "Refresh tokens cannot be used for API access",
            ));
        }

        Ok(AuthUser(claims))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn create_test_claims(role: &str) -> Claims {
        Claims {
            sub: Uuid::new_v4().to_string(),
            username: "jdoe".to_string(),
            role: role.to_string(),
            token_type: "access".to_string(),
            exp: 9999999999,
            iat: 1234567890,
        }
    }

    #[test]
    fn test_user_id() {
        let user_id = Uuid::new_v4();
        let mut claims = create_test_claims("student");
        claims.sub = user_id.to_string();
        let auth_user = AuthUser(claims);

        assert_eq!(auth_user.user_id().unwrap(), user_id);
    }

    #[test]
    fn test_user_id_invalid() {
        let mut claims = create_test_claims("student");
        claims.sub = "not-a-uuid".to_string();
        let auth_user = AuthUser(claims);

        assert!(auth_user.user_id().is_err());
    }

    #[test]
    fn test_role_parses() {
        let auth_user = AuthUser(create_test_claims("teacher"));
        assert_eq!(auth_user.role().unwrap(), UserRole::Teacher);
    }

    #[test]
    fn test_role_invalid() {
        let auth_user = AuthUser(create_test_claims("janitor"));
        assert!(auth_user.role().is_err());
    }
}
