use axum::{middleware, routing::get, Router};

use shared_database::AppState;
use shared_utils::extractor::{auth_middleware, require_admin};

use crate::handlers;

pub fn admin_routes(state: AppState) -> Router {
    Router::new()
        .route(
            "/hospitals",
            get(handlers::list_hospitals).post(handlers::create_hospital),
        )
        .route(
            "/hospitals/{hospital_id}",
            get(handlers::get_hospital)
                .put(handlers::update_hospital)
                .delete(handlers::delete_hospital),
        )
        .route("/patients", get(handlers::list_patients))
        .route("/patients/{patient_id}", get(handlers::get_patient))
        .route("/users", get(handlers::list_users))
        .route("/stats/dashboard", get(handlers::dashboard))
        .route_layer(middleware::from_fn(require_admin))
        .route_layer(middleware::from_fn_with_state(state.config.clone(), auth_middleware))
        .with_state(state)
}
