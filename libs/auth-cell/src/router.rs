use axum::{routing::post, Router};

use shared_database::AppState;

use crate::handlers;

/// Public signup/login routes for all three principal kinds.
pub fn auth_routes(state: AppState) -> Router {
    Router::new()
        .route("/user/signup", post(handlers::user_signup))
        .route("/user/login", post(handlers::user_login))
        .route("/admin/signup", post(handlers::admin_signup))
        .route("/admin/login", post(handlers::admin_login))
        .route("/hospital/signup", post(handlers::hospital_signup))
        .route("/hospital/login", post(handlers::hospital_login))
        .with_state(state)
}
