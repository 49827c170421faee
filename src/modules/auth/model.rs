use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

/// JWT claims carried by both access and refresh tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User ID
    pub sub: String,
    pub username: String,
    pub role: String,
    /// Either "access" or "refresh"
    pub token_type: String,
    pub exp: usize,
    pub iat: usize,
}

/// Credentials for obtaining a token pair.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct TokenObtainRequest {
    #[validate(length(min = 1))]
    pub username: String,
    #[validate(length(min = 1))]
    pub password: String,
}

/// An access/refresh token pair.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TokenPairResponse {
    pub access: String,
    pub refresh: String,
}

/// Request body for refreshing an access token.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct TokenRefreshRequest {
    #[validate(length(min = 1))]
    pub refresh: String,
}

/// A freshly minted access token.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AccessTokenResponse {
    pub access: String,
}
