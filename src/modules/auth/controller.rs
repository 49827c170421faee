use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::validator::ValidatedJson;
use axum::Json;
use axum::extract::State;
use tracing::instrument;
use utoipa::ToSchema;

use super::model::{
    AccessTokenResponse, TokenObtainRequest, TokenPairResponse, TokenRefreshRequest,
};
use super::service::AuthService;

#[derive(serde::Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

/// Obtain an access/refresh token pair
#[utoipa::path(
    post,
    path = "/api/token",
    request_body = TokenObtainRequest,
    responses(
        (status = 200, description = "Token pair issued", body = TokenPairResponse),
        (status = 401, description = "Invalid credentials or inactive account", body = ErrorResponse),
        (status = 400, description = "Bad request - validation error", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "Authentication"
)]
#[instrument(skip(state, dto))]
pub async fn obtain_token(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<TokenObtainRequest>,
) -> Result<Json<TokenPairResponse>, AppError> {
    let response = AuthService::obtain_token_pair(&state.db, dto, &state.jwt_config).await?;
    Ok(Json(response))
}

/// Refresh an access token
#[utoipa::path(
    post,
    path = "/api/token/refresh",
    request_body = TokenRefreshRequest,
    responses(
        (status = 200, description = "New access token issued", body = AccessTokenResponse),
        (status = 401, description = "Invalid or expired refresh token", body = ErrorResponse),
        (status = 400, description = "Bad request - validation error", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "Authentication"
)]
#[instrument(skip(state, dto))]
pub async fn refresh_token(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<TokenRefreshRequest>,
) -> Result<Json<AccessTokenResponse>, AppError> {
    let response = AuthService::refresh_access_token(&state.db, dto, &state.jwt_config).await?;
    Ok(Json(response))
}
