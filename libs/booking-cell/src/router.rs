use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use shared_database::AppState;
use shared_utils::extractor::{auth_middleware, require_user};

use crate::handlers;

/// End-user search and booking routes, mounted under `/users`.
pub fn booking_routes(state: AppState) -> Router {
    Router::new()
        .route("/search-hospitals", get(handlers::search_hospitals))
        .route("/search-non-surgery", get(handlers::search_non_surgery))
        .route("/hospitals/{hospital_id}", get(handlers::get_hospital))
        .route("/book-appointment", post(handlers::book_appointment))
        .route("/my-appointments", get(handlers::my_appointments))
        .route_layer(middleware::from_fn(require_user))
        .route_layer(middleware::from_fn_with_state(state.config.clone(), auth_middleware))
        .with_state(state)
}
