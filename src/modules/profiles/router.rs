use crate::modules::profiles::controller::{
    create_student_profile, create_teacher_profile, create_user_profile, delete_student_profile,
    delete_teacher_profile, delete_user_profile, get_student_profile, get_student_profiles,
    get_teacher_profile, get_teacher_profiles, get_user_profile, get_user_profiles,
    restore_student_profile, restore_teacher_profile, restore_user_profile,
    update_student_profile, update_teacher_profile, update_user_profile,
};
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, post},
};

pub fn init_profiles_router() -> Router<AppState> {
    Router::new()
        .nest(
            "/users",
            Router::new()
                .route("/", post(create_user_profile).get(get_user_profiles))
                .route(
                    "/{user_id}",
                    get(get_user_profile)
                        .put(update_user_profile)
                        .delete(delete_user_profile),
                )
                .route("/{user_id}/restore", post(restore_user_profile)),
        )
        .nest(
            "/students",
            Router::new()
                .route("/", post(create_student_profile).get(get_student_profiles))
                .route(
                    "/{user_id}",
                    get(get_student_profile)
                        .put(update_student_profile)
                        .delete(delete_student_profile),
                )
                .route("/{user_id}/restore", post(restore_student_profile)),
        )
        .nest(
            "/teachers",
            Router::new()
                .route("/", post(create_teacher_profile).get(get_teacher_profiles))
                .route(
                    "/{user_id}",
                    get(get_teacher_profile)
                        .put(update_teacher_profile)
                        .delete(delete_teacher_profile),
                )
                .route("/{user_id}/restore", post(restore_teacher_profile)),
        )
}
