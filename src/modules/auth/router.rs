use crate::state::AppState;
use axum::{Router, routing::post};

use super::controller::{obtain_token, refresh_token};

pub fn init_token_router() -> Router<AppState> {
    Router::new()
        .route("/", post(obtain_token))
        .route("/refresh", post(refresh_token))
}
