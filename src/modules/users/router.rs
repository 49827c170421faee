use crate::middleware::role::require_admin;
use crate::modules::users::controller::{
    create_user, delete_user, get_me, get_user, get_users, update_user,
};
use crate::state::AppState;
use axum::{
    Router, middleware,
    routing::{get, post},
};

pub fn init_users_router(state: AppState) -> Router<AppState> {
    let admin_routes = Router::new()
        .route("/", post(create_user).get(get_users))
        .route(
            "/{id}",
            get(get_user).put(update_user).delete(delete_user),
        )
        .route_layer(middleware::from_fn_with_state(state, require_admin));

    // `/me` only needs a valid token; the static segment wins over `/{id}`.
    Router::new().route("/me", get(get_me)).merge(admin_routes)
}
